//! 会话管理：令牌上下文与登出跳转

pub mod context;
pub mod controller;

pub use context::SessionContext;
pub use controller::{Navigation, SessionController, SessionState};
