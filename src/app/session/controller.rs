//! 会话控制器

use tracing::{info, warn};

use super::context::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// 导航信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// 回到未登录入口
    EntryPoint,
}

impl Navigation {
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::EntryPoint => "/",
        }
    }
}

#[derive(Clone)]
pub struct SessionController {
    context: SessionContext,
}

impl SessionController {
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn check_authenticated(&self) -> bool {
        self.context.token().is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.check_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// 清除令牌并通知调用方跳转到入口页
    ///
    /// 幂等：没有令牌时同样返回跳转信号。
    pub fn logout(&self) -> Navigation {
        if let Err(err) = self.context.clear() {
            warn!("清除会话令牌失败: {}", err);
        }
        info!("已退出登录");
        Navigation::EntryPoint
    }
}
