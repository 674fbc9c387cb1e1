//! 商品搜索过滤

use super::model::Product;

/// 按商品名称做大小写不敏感的子串过滤，保持原有顺序
///
/// 搜索词为空时返回全部商品。
pub fn filter_products<'a>(products: &'a [Product], search: &str) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|p| p.product_name.to_lowercase().contains(&needle))
        .collect()
}
