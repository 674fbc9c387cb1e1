//! 模拟服务错误
//!
//! 失败响应与成功响应共用信封结构，`success` 为 false，
//! 客户端从 `message` 中读取提示文案。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::warn;

use super::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Product {0} not found")]
    ProductNotFound(String),
    #[error("Invalid or missing token")]
    Unauthorized,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("请求被拒绝 ({}): {}", status.as_u16(), self);
        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}
