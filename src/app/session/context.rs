//! 进程级会话上下文
//!
//! 显式创建后注入到传输层和会话控制器中，不使用全局变量。

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::error::Result;
use crate::infrastructure::token_store::{MemoryTokenStore, TokenStore};

#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// 空的内存会话
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// 当前令牌；读取失败按无令牌处理
    pub fn token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(err) => {
                warn!("读取会话令牌失败: {}", err);
                None
            }
        }
    }

    /// 由外部登录流程写入令牌
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.save(token)?;
        info!("会话令牌已写入");
        Ok(())
    }

    /// 清除令牌，令牌不存在时同样成功
    pub fn clear(&self) -> Result<()> {
        self.store.remove()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::in_memory()
    }
}
