use std::env;
use std::sync::Arc;

use catalog_admin::core::ChannelSink;
use catalog_admin::infrastructure::{load_config, FileTokenStore, HttpTransport, Logger};
use catalog_admin::{Dashboard, DraftForm, Notice, ProductStore, SessionContext, SessionController};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let _guard = Logger::init(&config.logging)?;
    debug!("API 地址: {}", config.api.base_url);

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    let session = SessionContext::new(Arc::new(FileTokenStore::new(&config.session.token_path)));
    let transport = HttpTransport::new(&config.api, session.clone())?;
    let (sink, mut notices) = ChannelSink::channel();
    let store = Arc::new(ProductStore::new(Arc::new(transport), Arc::new(sink)));
    let dashboard = Dashboard::new(store, SessionController::new(session));

    let ok = match command.as_str() {
        "list" => {
            let mounted = dashboard.mount().await.is_ok();
            if let Some(search) = args.get(1) {
                dashboard.set_search(search.as_str());
            }
            print_products(&dashboard);
            mounted
        }
        "add" => {
            if args.len() < 6 {
                print_usage();
                return Ok(());
            }
            let mut draft = DraftForm {
                product_name: args[1].clone(),
                price: args[2].clone(),
                rating: args[3].clone(),
                category: args[4].clone(),
                company: args[5].clone(),
                discount: args.get(6).cloned().unwrap_or_default(),
                availability: args.get(7).cloned().unwrap_or_default(),
            };
            match dashboard.submit(&mut draft).await {
                Ok(()) => {
                    print_products(&dashboard);
                    true
                }
                Err(err) => {
                    println!("⚠️  {}", err);
                    false
                }
            }
        }
        "delete" => {
            let Some(id) = args.get(1) else {
                print_usage();
                return Ok(());
            };
            let removed = dashboard.delete(id).await.is_ok();
            if removed {
                print_products(&dashboard);
            }
            removed
        }
        "login" => {
            let Some(token) = args.get(1) else {
                print_usage();
                return Ok(());
            };
            dashboard.session().context().set_token(token)?;
            println!("🔑 令牌已保存");
            true
        }
        "logout" => {
            let navigation = dashboard.logout();
            println!("👋 已退出登录，跳转到 {}", navigation.path());
            true
        }
        "status" => {
            println!("会话状态: {:?}", dashboard.session().state());
            true
        }
        _ => {
            print_usage();
            return Ok(());
        }
    };

    drain_notices(&mut notices);

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn drain_notices(notices: &mut UnboundedReceiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        println!("{}", notice);
    }
}

fn print_products(dashboard: &Dashboard) {
    let products = dashboard.visible_products();
    if products.is_empty() {
        println!("No products found.");
        return;
    }

    println!("📦 共 {} 个商品:", products.len());
    for product in products {
        println!(
            "  [{}] {} - ₹ {} - ⭐ {} - Discount: {}% - {} / {} ({})",
            product.id,
            product.product_name,
            product.price,
            product.rating,
            product.discount,
            product.company,
            product.category,
            product.availability,
        );
    }
}

fn print_usage() {
    println!("用法: catalog_admin <命令> [参数]");
    println!();
    println!("可用的命令:");
    println!("  list [搜索词]                                         - 列出商品（按名称过滤）");
    println!("  add <名称> <价格> <评分> <分类> <公司> [折扣] [库存状态] - 新建商品");
    println!("  delete <id>                                           - 删除商品");
    println!("  login <token>                                         - 保存会话令牌");
    println!("  logout                                                - 退出登录");
    println!("  status                                                - 查看会话状态");
    println!();
    println!("示例:");
    println!("  catalog_admin list pen");
    println!("  catalog_admin add Cup 5 4 Kitchen Acme");
}
