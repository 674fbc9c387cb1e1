//! 本地开发用的商品 API 模拟服务
//!
//! 实现客户端依赖的 `/api/products` 接口，数据只保存在内存中。

pub mod error;
pub mod handler;
pub mod middleware;
pub mod response;
pub mod service;
pub mod state;

use std::time::Duration;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub use state::ServerState;

/// 构建路由
pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route(
            "/api/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route("/api/products/:id", delete(handler::delete_product))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handler::health_check))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(from_fn(middleware::request_logging_middleware)),
        )
        .with_state(state)
}

/// 在给定监听器上运行服务，直到进程退出
pub async fn serve(listener: TcpListener, state: ServerState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("🚀 商品 API 模拟服务运行在 http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}
