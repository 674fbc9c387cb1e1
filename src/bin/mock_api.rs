//! 商品 API 模拟服务
//! 在本地提供 GET/POST /api/products 与 DELETE /api/products/:id

use catalog_admin::infrastructure::{load_config, Logger};
use catalog_admin::server::{self, ServerState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let _guard = Logger::init(&config.logging)?;

    let mock = &config.mock_server;
    let listener = TcpListener::bind((mock.bind_address.as_str(), mock.port)).await?;

    info!("📖 API 端点:");
    info!("   GET    /api/products     - 获取所有商品");
    info!("   POST   /api/products     - 创建新商品");
    info!("   DELETE /api/products/:id - 删除商品");
    info!("   GET    /health           - 健康检查");
    if mock.required_token.is_some() {
        info!("   需要在 header 中添加 'Authorization: Bearer <token>'");
    }

    server::serve(listener, ServerState::from_config(mock)).await?;
    Ok(())
}
