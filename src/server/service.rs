//! 内存中的商品服务

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use uuid::Uuid;

use super::error::ApiError;
use crate::app::product::{Product, ProductPayload, DEFAULT_AVAILABILITY};

/// 创建商品请求，字段缺失时返回 400 而不是解析失败
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub discount: Option<f64>,
    pub availability: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
}

/// 按插入顺序保存商品
#[derive(Clone, Default)]
pub struct ProductService {
    products: Arc<Mutex<Vec<Product>>>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingField(field))
}

impl ProductService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> Vec<Product> {
        self.products.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.products.lock().len()
    }

    pub fn create(&self, request: CreateProductRequest) -> Result<Product, ApiError> {
        let payload = ProductPayload {
            product_name: required(request.product_name, "productName")?,
            price: request.price.ok_or(ApiError::MissingField("price"))?,
            rating: request.rating.ok_or(ApiError::MissingField("rating"))?,
            discount: request.discount.unwrap_or(0.0),
            availability: request
                .availability
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AVAILABILITY.to_string()),
            category: required(request.category, "category")?,
            company: required(request.company, "company")?,
        };

        let product = Product::from_payload(Uuid::new_v4().simple().to_string(), payload);
        self.products.lock().push(product.clone());
        Ok(product)
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut products = self.products.lock();
        match products.iter().position(|p| p.id == id) {
            Some(index) => {
                products.remove(index);
                Ok(())
            }
            None => Err(ApiError::ProductNotFound(id.to_string())),
        }
    }
}
