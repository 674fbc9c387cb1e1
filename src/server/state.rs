//! 模拟服务共享状态

use super::service::ProductService;
use crate::infrastructure::config::MockServerConfig;

#[derive(Clone, Default)]
pub struct ServerState {
    pub product_service: ProductService,
    envelope: bool,
    required_token: Option<String>,
}

impl ServerState {
    pub fn new(envelope: bool, required_token: Option<String>) -> Self {
        Self {
            product_service: ProductService::new(),
            envelope,
            required_token: required_token.filter(|t| !t.is_empty()),
        }
    }

    pub fn from_config(config: &MockServerConfig) -> Self {
        Self::new(config.envelope, config.required_token.clone())
    }

    pub fn envelope(&self) -> bool {
        self.envelope
    }

    pub fn required_token(&self) -> Option<&str> {
        self.required_token.as_deref()
    }
}
