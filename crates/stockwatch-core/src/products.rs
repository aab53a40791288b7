use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Category;

/// Publication status reported by the upstream catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
    Archived,
}

impl ProductStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
            ProductStatus::Archived => "archived",
        }
    }

    /// Parses a status label case-insensitively. Returns `None` for anything
    /// outside `active`, `draft` and `archived`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(ProductStatus::Active),
            "draft" => Some(ProductStatus::Draft),
            "archived" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product in canonical form, keyed by the platform-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Upstream product id, stringified. Stable across syncs.
    pub id: String,
    pub title: String,
    /// SKU of the first variant; empty when the upstream has none.
    pub sku: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    /// Units on hand for the first variant. Upstream negatives are kept as-is.
    pub inventory: i64,
    pub category: Category,
    pub image_url: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field-level merge applied on every product upsert.
///
/// Required fields always come from `incoming`. Optional fields
/// (`compare_at_price`, `image_url`, `vendor`, `product_type`, `tags`) that are
/// absent from `incoming` keep the value from `stored`.
#[must_use]
pub fn merge_product(stored: Option<&Product>, incoming: Product) -> Product {
    let Some(stored) = stored else {
        return incoming;
    };

    Product {
        compare_at_price: incoming.compare_at_price.or(stored.compare_at_price),
        image_url: incoming.image_url.or_else(|| stored.image_url.clone()),
        vendor: incoming.vendor.or_else(|| stored.vendor.clone()),
        product_type: incoming
            .product_type
            .or_else(|| stored.product_type.clone()),
        tags: incoming.tags.or_else(|| stored.tags.clone()),
        ..incoming
    }
}

/// Append-only change-log entry written when a sync observes a stock change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdate {
    pub product_id: String,
    pub sku: String,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub timestamp: DateTime<Utc>,
}

impl InventoryUpdate {
    /// Builds the change-log entry for `incoming` against the stored record.
    ///
    /// Returns `None` for first-seen products and for unchanged inventory.
    #[must_use]
    pub fn between(
        stored: Option<&Product>,
        incoming: &Product,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        let stored = stored?;
        if stored.inventory == incoming.inventory {
            return None;
        }
        Some(Self {
            product_id: incoming.id.clone(),
            sku: incoming.sku.clone(),
            previous_quantity: stored.inventory,
            new_quantity: incoming.inventory,
            timestamp,
        })
    }
}
