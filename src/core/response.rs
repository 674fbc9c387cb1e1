//! 核心响应处理模块
//!
//! 商品列表接口可能返回裸数组，也可能返回 `{ "data": [...] }` 信封，
//! 在传输边界处统一归一化为 `Vec<Product>`。

use serde_json::Value;

use super::error::{CoreError, Result};
use crate::app::product::Product;

/// 解析商品列表响应体
///
/// 空响应体与 `null` 视为空列表；其他形态返回 [`CoreError::Decode`]。
/// 记录本身解析失败时，错误信息保留具体字段。
pub fn parse_product_list(body: &str) -> Result<Vec<Product>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(body)?;
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        Value::Object(mut fields) => match fields.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CoreError::Decode(
                    "商品列表既不是数组也不是 data 信封".to_string(),
                ))
            }
        },
        other => {
            return Err(CoreError::Decode(format!(
                "商品列表形态不受支持: {}",
                other
            )))
        }
    };

    serde_json::from_value(Value::Array(items))
        .map_err(|e| CoreError::Decode(format!("商品记录解析失败: {e}")))
}
