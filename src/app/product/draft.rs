//! 新建商品表单草稿

use std::borrow::Cow;

use validator::{Validate, ValidationError};

use super::model::{ProductPayload, DEFAULT_AVAILABILITY};
use crate::core::error::{CoreError, Result};

/// 未提交的商品表单，所有字段保存原始输入文本
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct DraftForm {
    #[validate(custom(function = "non_blank"))]
    pub product_name: String,
    #[validate(custom(function = "numeric"))]
    pub price: String,
    #[validate(custom(function = "numeric"))]
    pub rating: String,
    #[validate(custom(function = "numeric_or_blank"))]
    pub discount: String,
    pub availability: String,
    #[validate(custom(function = "non_blank"))]
    pub category: String,
    #[validate(custom(function = "non_blank"))]
    pub company: String,
}

impl DraftForm {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 必填字段是否齐全，界面据此启用提交按钮
    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }

    /// 清空为初始状态
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 校验并转换为请求体
    ///
    /// 折扣为空时取 0，库存状态为空时取 "In Stock"。
    pub fn to_payload(&self) -> Result<ProductPayload> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let availability = match self.availability.trim() {
            "" => DEFAULT_AVAILABILITY.to_string(),
            value => value.to_string(),
        };

        Ok(ProductPayload {
            product_name: self.product_name.trim().to_string(),
            price: parse_number(&self.price)?,
            rating: parse_number(&self.rating)?,
            discount: match self.discount.trim() {
                "" => 0.0,
                value => parse_number(value)?,
            },
            availability,
            category: self.category.trim().to_string(),
            company: self.company.trim().to_string(),
        })
    }
}

fn parse_number(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CoreError::Validation(format!("不是有效数字: {raw:?}")))
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn non_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "不能为空"));
    }
    Ok(())
}

fn numeric(value: &str) -> std::result::Result<(), ValidationError> {
    non_blank(value)?;
    numeric_or_blank(value)
}

fn numeric_or_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() || parse_number(value).is_ok() {
        Ok(())
    } else {
        Err(invalid("numeric", "必须是数字"))
    }
}
