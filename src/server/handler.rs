//! 模拟服务处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::info;

use super::error::ApiError;
use super::response::ApiResponse;
use super::service::CreateProductRequest;
use super::state::ServerState;
use crate::app::product::Product;

/// 获取全部商品，按配置决定是否包一层 data 信封
pub async fn list_products(State(state): State<ServerState>) -> Response {
    let products = state.product_service.list();
    if state.envelope() {
        Json(ApiResponse::success(products)).into_response()
    } else {
        Json(products).into_response()
    }
}

pub async fn create_product(
    State(state): State<ServerState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let product = state.product_service.create(payload)?;
    info!("商品创建成功: {} ({})", product.product_name, product.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.product_service.delete(&id)?;
    info!("商品删除成功: {}", id);
    Ok(Json(ApiResponse::success(())))
}

/// 健康检查
pub async fn health_check(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "products_count": state.product_service.count(),
    }))
}
