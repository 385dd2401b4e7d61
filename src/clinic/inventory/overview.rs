//! 库存页顶部统计

use crate::clinic::inventory::models::{Product, Sale};

pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryOverview {
    pub product_count: usize,
    /// 库存不高于阈值的商品数
    pub low_stock_count: usize,
    /// 所有销售总额之和
    pub total_revenue: f64,
}

impl InventoryOverview {
    pub fn compute(products: &[Product], sales: &[Sale], low_stock_threshold: i64) -> Self {
        Self {
            product_count: products.len(),
            low_stock_count: products
                .iter()
                .filter(|p| p.stock <= low_stock_threshold)
                .count(),
            total_revenue: sales.iter().map(|s| s.total).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_low_stock_inclusively() {
        let product = |id, stock| Product {
            id,
            name: format!("P{}", id),
            description: String::new(),
            price: 1.0,
            stock,
        };
        let sale = |id, total| Sale {
            id,
            items: Vec::new(),
            total,
            date: "2025-01-01T00:00:00.000Z".into(),
        };

        let overview = InventoryOverview::compute(
            &[product(1, 0), product(2, 5), product(3, 6)],
            &[sale(1, 10.0), sale(2, 32.5)],
            DEFAULT_LOW_STOCK_THRESHOLD,
        );
        assert_eq!(overview.product_count, 3);
        assert_eq!(overview.low_stock_count, 2);
        assert_eq!(overview.total_revenue, 42.5);

        let empty = InventoryOverview::compute(&[], &[], DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(empty.total_revenue, 0.0);
    }
}
