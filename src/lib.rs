//! # 商品目录管理客户端
//!
//! 通过远程 HTTP API 管理商品目录：列表、客户端搜索过滤、新建与删除。
//! - 应用层：商品状态仓库、表单草稿、搜索过滤、会话控制、管理面板
//! - 核心层：错误类型、用户通知、列表响应归一化
//! - 基础设施层：配置、日志、令牌存储、HTTP 传输
//! - 模拟服务：本地开发与集成测试使用的商品 API

pub mod app;
pub mod core;
pub mod infrastructure;
pub mod server;

pub use app::product::{
    filter_products, DraftForm, Product, ProductApi, ProductPayload, ProductStore,
};
pub use app::session::{Navigation, SessionContext, SessionController, SessionState};
pub use app::Dashboard;
pub use crate::core::{CoreError, Notice, NoticeKind, NoticeSink, Result};
