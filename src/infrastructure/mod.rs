//! 基础设施层：配置、日志、令牌存储、HTTP 传输

pub mod config;
pub mod logger;
pub mod token_store;
pub mod transport;

pub use config::{load_config, Config, ConfigError};
pub use logger::Logger;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::HttpTransport;
