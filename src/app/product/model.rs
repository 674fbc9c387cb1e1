//! 商品数据模型

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_AVAILABILITY: &str = "In Stock";

/// 商品记录，标识符由服务端分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub product_name: String,
    pub price: f64,
    pub rating: f64,
    #[serde(default, deserialize_with = "discount_or_zero")]
    pub discount: f64,
    #[serde(default = "default_availability", deserialize_with = "availability_or_default")]
    pub availability: String,
    pub category: String,
    pub company: String,
}

/// 创建商品的请求体：去掉标识符、数值已转换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub product_name: String,
    pub price: f64,
    pub rating: f64,
    pub discount: f64,
    pub availability: String,
    pub category: String,
    pub company: String,
}

impl Product {
    pub fn from_payload(id: impl Into<String>, payload: ProductPayload) -> Self {
        Self {
            id: id.into(),
            product_name: payload.product_name,
            price: payload.price,
            rating: payload.rating,
            discount: payload.discount,
            availability: payload.availability,
            category: payload.category,
            company: payload.company,
        }
    }
}

fn default_availability() -> String {
    DEFAULT_AVAILABILITY.to_string()
}

/// `null` 与缺省同样按 0 处理
fn discount_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

fn availability_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(default_availability))
}
