//! 商品管理面板
//!
//! 组合商品仓库、搜索词与会话控制器：挂载时拉取一次商品，登出时退出仓库的
//! 请求上下文，避免迟到的响应写回已经离开的视图。

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use super::product::{DraftForm, Product, ProductStore};
use super::session::{Navigation, SessionController};
use crate::core::error::Result;

pub struct Dashboard {
    store: Arc<ProductStore>,
    session: SessionController,
    search: Mutex<String>,
}

impl Dashboard {
    pub fn new(store: Arc<ProductStore>, session: SessionController) -> Self {
        Self {
            store,
            session,
            search: Mutex::new(String::new()),
        }
    }

    pub fn store(&self) -> &Arc<ProductStore> {
        &self.store
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// 挂载时的首次拉取
    pub async fn mount(&self) -> Result<()> {
        info!("商品面板挂载");
        self.store.fetch_all().await
    }

    /// 更新搜索词，同步生效
    pub fn set_search(&self, search: impl Into<String>) {
        *self.search.lock() = search.into();
    }

    pub fn search(&self) -> String {
        self.search.lock().clone()
    }

    /// 当前搜索词下可见的商品
    pub fn visible_products(&self) -> Vec<Product> {
        let search = self.search();
        self.store.filtered(&search)
    }

    pub async fn submit(&self, draft: &mut DraftForm) -> Result<()> {
        self.store.create(draft).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.remove(id).await
    }

    /// 登出并退出当前请求上下文
    pub fn logout(&self) -> Navigation {
        self.store.retire();
        self.session.logout()
    }
}
