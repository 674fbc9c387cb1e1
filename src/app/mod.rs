//! 应用层

pub mod dashboard;
pub mod product;
pub mod session;

pub use dashboard::Dashboard;
