//! 模拟服务中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info};

use super::error::ApiError;
use super::state::ServerState;

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    info!(
        "{} {} - {} - {}ms",
        method,
        uri,
        response.status(),
        start.elapsed().as_millis()
    );

    response
}

/// Bearer 令牌校验，未配置令牌时放行
pub async fn auth_middleware(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.required_token() else {
        return Ok(next.run(req).await);
    };

    let token = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => {
            debug!("令牌校验通过");
            Ok(next.run(req).await)
        }
        _ => Err(ApiError::Unauthorized),
    }
}
