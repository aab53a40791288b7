#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use stockwatch_catalog::CatalogError;
use stockwatch_core::{classify, Product, ProductStatus};
use stockwatch_engine::CatalogSource;

pub fn make_product(id: &str, title: &str, inventory: i64) -> Product {
    let ts = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
    Product {
        id: id.to_string(),
        title: title.to_string(),
        sku: format!("SKU-{id}"),
        price: Decimal::new(9_900, 2),
        compare_at_price: None,
        inventory,
        category: classify("", "", title),
        image_url: None,
        vendor: None,
        product_type: None,
        tags: None,
        status: ProductStatus::Active,
        created_at: ts,
        updated_at: ts,
    }
}

/// Catalog source returning a fixed product list.
pub struct StubSource(pub Vec<Product>);

impl CatalogSource for StubSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.0.clone())
    }
}

/// Catalog source that always fails as an unavailable upstream would.
pub struct FailingSource;

impl CatalogSource for FailingSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Err(CatalogError::UnexpectedStatus {
            status: 503,
            url: "https://catalog.test/products".to_string(),
        })
    }
}
