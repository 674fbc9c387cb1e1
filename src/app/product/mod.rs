//! 商品管理：模型、表单草稿、搜索过滤、商品状态仓库

pub mod draft;
pub mod filter;
pub mod model;
pub mod store;

pub use draft::DraftForm;
pub use filter::filter_products;
pub use model::{Product, ProductPayload, DEFAULT_AVAILABILITY};
pub use store::{ProductApi, ProductStore};
