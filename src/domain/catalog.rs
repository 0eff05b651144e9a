// ==========================================
// 鲜奶订送系统 - 产品目录
// ==========================================
// 职责: 固定产品目录（进程启动时确定，运行期不增删）
// 说明: 目录顺序稳定，调用方可依赖同一进程内的一致排序
// ==========================================

use serde::{Deserialize, Serialize};

use crate::i18n::t;

// ==========================================
// Product - 奶品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,   // 产品ID
    pub name: String,         // 显示名称
    pub price_per_liter: f64, // 单价（元/升）
}

impl Product {
    pub fn new(product_id: &str, name: String, price_per_liter: f64) -> Self {
        Self {
            product_id: product_id.to_string(),
            name,
            price_per_liter,
        }
    }
}

/// 内置产品目录
///
/// 显示名称按当前语言环境解析，产品ID与单价固定。
pub fn builtin_catalog() -> Vec<Product> {
    vec![
        Product::new("cow", t("catalog.cow"), 50.0),
        Product::new("buffalo", t("catalog.buffalo"), 60.0),
        Product::new("goat", t("catalog.goat"), 80.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_order_stable() {
        let a = builtin_catalog();
        let b = builtin_catalog();
        let ids_a: Vec<&str> = a.iter().map(|p| p.product_id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids_a, vec!["cow", "buffalo", "goat"]);
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_builtin_catalog_prices() {
        let catalog = builtin_catalog();
        assert_eq!(catalog[0].price_per_liter, 50.0);
        assert_eq!(catalog[1].price_per_liter, 60.0);
        assert_eq!(catalog[2].price_per_liter, 80.0);
    }
}
