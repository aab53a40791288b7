use super::*;
use chrono::TimeZone;
use serde_json::json;
use stockwatch_core::Category;

use crate::types::CatalogProduct;

fn fetched_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn raw(value: serde_json::Value) -> CatalogProduct {
    serde_json::from_value(value).expect("valid raw product")
}

fn full_product_json() -> serde_json::Value {
    json!({
        "id": 8_001_234,
        "title": "Ergo Mesh Chair",
        "vendor": "Acme Office",
        "product_type": "Office Chair",
        "tags": "seating, ergonomic , ,office",
        "status": "active",
        "created_at": "2025-11-02T08:30:00Z",
        "updated_at": "2026-02-20T16:45:10+01:00",
        "image": {"src": "https://cdn.example.com/chair.jpg"},
        "variants": [
            {
                "sku": "CH-001",
                "price": "249.00",
                "compare_at_price": "299.00",
                "inventory_quantity": 7
            },
            {
                "sku": "CH-001-XL",
                "price": "279.00",
                "inventory_quantity": 50
            }
        ]
    })
}

// -----------------------------------------------------------------------
// normalize_product
// -----------------------------------------------------------------------

#[test]
fn normalize_reads_first_variant() {
    let product = normalize_product(raw(full_product_json()), fetched_at());
    assert_eq!(product.id, "8001234");
    assert_eq!(product.sku, "CH-001");
    assert_eq!(product.price, Decimal::new(24_900, 2));
    assert_eq!(product.compare_at_price, Some(Decimal::new(29_900, 2)));
    assert_eq!(product.inventory, 7);
}

#[test]
fn normalize_classifies_and_splits_tags() {
    let product = normalize_product(raw(full_product_json()), fetched_at());
    assert_eq!(product.category, Category::Seating);
    assert_eq!(
        product.tags,
        Some(vec![
            "seating".to_string(),
            "ergonomic".to_string(),
            "office".to_string()
        ])
    );
}

#[test]
fn normalize_parses_timestamps_to_utc() {
    let product = normalize_product(raw(full_product_json()), fetched_at());
    assert_eq!(
        product.created_at,
        Utc.with_ymd_and_hms(2025, 11, 2, 8, 30, 0).unwrap()
    );
    assert_eq!(
        product.updated_at,
        Utc.with_ymd_and_hms(2026, 2, 20, 15, 45, 10).unwrap()
    );
}

#[test]
fn normalize_minimal_product_uses_defaults() {
    let product = normalize_product(raw(json!({"id": "abc", "title": "Mystery Box"})), fetched_at());
    assert_eq!(product.id, "abc");
    assert_eq!(product.sku, "");
    assert_eq!(product.price, Decimal::ZERO);
    assert_eq!(product.compare_at_price, None);
    assert_eq!(product.inventory, 0);
    assert_eq!(product.tags, None);
    assert_eq!(product.image_url, None);
    assert_eq!(product.status, ProductStatus::Active);
    assert_eq!(product.category, Category::Other);
    assert_eq!(product.created_at, fetched_at());
    assert_eq!(product.updated_at, fetched_at());
}

#[test]
fn normalize_accepts_numeric_prices() {
    let product = normalize_product(
        raw(json!({
            "id": 1,
            "title": "Side Table",
            "variants": [{"price": 89.5, "compare_at_price": 120, "inventory_quantity": 3}]
        })),
        fetched_at(),
    );
    assert_eq!(product.price, Decimal::new(895, 1));
    assert_eq!(product.compare_at_price, Some(Decimal::new(120, 0)));
    assert_eq!(product.category, Category::Tables);
}

#[test]
fn normalize_unparseable_prices() {
    let product = normalize_product(
        raw(json!({
            "id": 1,
            "title": "Thing",
            "variants": [{"price": "call us", "compare_at_price": ""}]
        })),
        fetched_at(),
    );
    assert_eq!(product.price, Decimal::ZERO);
    assert_eq!(product.compare_at_price, None);
}

#[test]
fn normalize_keeps_negative_inventory() {
    let product = normalize_product(
        raw(json!({"id": 1, "title": "Oversold Lamp", "variants": [{"inventory_quantity": -4}]})),
        fetched_at(),
    );
    assert_eq!(product.inventory, -4);
    assert_eq!(product.category, Category::Lighting);
}

#[test]
fn normalize_tolerates_loose_inventory_quantities() {
    let inventory_of = |quantity: serde_json::Value| {
        normalize_product(
            raw(json!({"id": 1, "title": "Oak Desk", "variants": [{"inventory_quantity": quantity}]})),
            fetched_at(),
        )
        .inventory
    };

    assert_eq!(inventory_of(json!(5.0)), 5);
    assert_eq!(inventory_of(json!("7")), 7);
    assert_eq!(inventory_of(json!(" -2 ")), -2);
    assert_eq!(inventory_of(json!("12.0")), 12);
    assert_eq!(inventory_of(json!(4.5)), 0);
    assert_eq!(inventory_of(json!("abc")), 0);
    assert_eq!(inventory_of(json!(null)), 0);
}

#[test]
fn parse_quantity_rejects_out_of_range_floats() {
    let huge: RawQuantity = serde_json::from_value(json!(1e30)).expect("number");
    assert_eq!(parse_quantity(&huge), None);
}

#[test]
fn normalize_falls_back_to_first_gallery_image() {
    let product = normalize_product(
        raw(json!({
            "id": 1,
            "title": "Desk Mat",
            "images": [{"src": "https://cdn.example.com/a.jpg"}, {"src": "https://cdn.example.com/b.jpg"}]
        })),
        fetched_at(),
    );
    assert_eq!(
        product.image_url.as_deref(),
        Some("https://cdn.example.com/a.jpg")
    );
}

#[test]
fn normalize_unknown_status_becomes_active() {
    let draft = normalize_product(
        raw(json!({"id": 1, "title": "X", "status": "draft"})),
        fetched_at(),
    );
    assert_eq!(draft.status, ProductStatus::Draft);

    let unknown = normalize_product(
        raw(json!({"id": 1, "title": "X", "status": "unlisted"})),
        fetched_at(),
    );
    assert_eq!(unknown.status, ProductStatus::Active);
}

#[test]
fn normalize_unparseable_timestamp_falls_back_to_fetch_time() {
    let product = normalize_product(
        raw(json!({"id": 1, "title": "X", "created_at": "last tuesday"})),
        fetched_at(),
    );
    assert_eq!(product.created_at, fetched_at());
}

#[test]
fn normalize_blank_product_type_and_vendor_are_absent() {
    let product = normalize_product(
        raw(json!({"id": 1, "title": "X", "product_type": "", "vendor": "  "})),
        fetched_at(),
    );
    assert_eq!(product.product_type, None);
    assert_eq!(product.vendor, None);
}

#[test]
fn normalize_tag_list_is_used_for_classification() {
    let product = normalize_product(
        raw(json!({"id": 1, "title": "Organizer", "tags": ["Storage", " home "]})),
        fetched_at(),
    );
    assert_eq!(product.category, Category::Storage);
    assert_eq!(
        product.tags,
        Some(vec!["Storage".to_string(), "home".to_string()])
    );
}

#[test]
fn empty_tag_string_yields_empty_list() {
    let product = normalize_product(raw(json!({"id": 1, "title": "X", "tags": ""})), fetched_at());
    assert_eq!(product.tags, Some(Vec::new()));
}
