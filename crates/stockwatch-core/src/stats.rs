//! Read-side rollups over a product snapshot.

use serde::{Deserialize, Serialize};

use crate::{Category, Product, CATEGORIES};

/// Inventory strictly below this (and above zero) counts as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// `0 < inventory < threshold`.
#[must_use]
pub fn is_low_stock(inventory: i64, threshold: i64) -> bool {
    inventory > 0 && inventory < threshold
}

#[must_use]
pub fn is_out_of_stock(inventory: i64) -> bool {
    inventory == 0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: Category,
    pub total_products: usize,
    pub total_inventory: i64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_inventory: i64,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
    pub category_breakdown: Vec<CategoryStats>,
}

/// Rolls up the products belonging to `category`; products from other
/// categories in `products` are ignored.
#[must_use]
pub fn category_stats(category: Category, products: &[Product]) -> CategoryStats {
    let mut stats = CategoryStats {
        category,
        total_products: 0,
        total_inventory: 0,
        low_stock_count: 0,
        out_of_stock_count: 0,
    };

    for product in products.iter().filter(|p| p.category == category) {
        stats.total_products += 1;
        stats.total_inventory += product.inventory;
        if is_low_stock(product.inventory, DEFAULT_LOW_STOCK_THRESHOLD) {
            stats.low_stock_count += 1;
        }
        if is_out_of_stock(product.inventory) {
            stats.out_of_stock_count += 1;
        }
    }

    stats
}

/// Global rollup plus one [`CategoryStats`] per taxonomy category, all
/// computed from the same snapshot.
#[must_use]
pub fn dashboard_stats(products: &[Product]) -> DashboardStats {
    let category_breakdown: Vec<CategoryStats> = CATEGORIES
        .into_iter()
        .map(|category| category_stats(category, products))
        .collect();

    DashboardStats {
        total_products: products.len(),
        total_inventory: products.iter().map(|p| p.inventory).sum(),
        low_stock_items: products
            .iter()
            .filter(|p| is_low_stock(p.inventory, DEFAULT_LOW_STOCK_THRESHOLD))
            .count(),
        out_of_stock_items: products
            .iter()
            .filter(|p| is_out_of_stock(p.inventory))
            .count(),
        category_breakdown,
    }
}
