//! 模拟服务响应结构

use serde::Serialize;
use uuid::Uuid;

/// API 响应信封，失败时不带 `data`，改为携带 `message`
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub request_id: String,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    fn new(success: bool, data: Option<T>, message: Option<String>) -> Self {
        Self {
            success,
            data,
            message,
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(true, Some(data), None)
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, None, Some(message.into()))
    }
}
