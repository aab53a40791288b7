mod common;

use std::sync::Arc;

use common::make_product;
use stockwatch_core::{Category, CATEGORIES};
use stockwatch_db::MemoryStore;
use stockwatch_engine::{EngineError, StatsService};

fn seeded() -> StatsService<MemoryStore> {
    let store = MemoryStore::new();
    for product in [
        make_product("1", "Mesh Chair", 3),
        make_product("2", "Stool Chair", 0),
        make_product("3", "Oak Desk", 12),
        make_product("4", "Filing Cabinet", 9),
        make_product("5", "Gift Card", 100),
    ] {
        store.insert_product(product);
    }
    StatsService::new(Arc::new(store))
}

#[tokio::test]
async fn category_stats_for_one_category() {
    let stats = seeded()
        .get_category_stats(Category::Seating)
        .await
        .expect("stats");
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.total_inventory, 3);
    assert_eq!(stats.low_stock_count, 1);
    assert_eq!(stats.out_of_stock_count, 1);
}

#[tokio::test]
async fn empty_category_has_zero_counts() {
    let stats = seeded()
        .get_category_stats(Category::Lighting)
        .await
        .expect("stats");
    assert_eq!(stats.total_products, 0);
    assert_eq!(stats.total_inventory, 0);
}

#[tokio::test]
async fn all_category_stats_in_taxonomy_order() {
    let all = seeded().get_all_category_stats().await.expect("stats");
    let order: Vec<Category> = all.iter().map(|s| s.category).collect();
    assert_eq!(order, CATEGORIES.to_vec());
}

#[tokio::test]
async fn dashboard_totals_match_breakdown() {
    let dashboard = seeded().get_dashboard_stats().await.expect("dashboard");

    assert_eq!(dashboard.total_products, 5);
    assert_eq!(dashboard.total_inventory, 124);
    assert_eq!(dashboard.low_stock_items, 2);
    assert_eq!(dashboard.out_of_stock_items, 1);

    let summed: i64 = dashboard
        .category_breakdown
        .iter()
        .map(|c| c.total_inventory)
        .sum();
    assert_eq!(summed, dashboard.total_inventory);
}

#[tokio::test]
async fn unavailable_store_fails_stats() {
    let store = Arc::new(MemoryStore::new());
    store.set_unavailable(true);
    let err = StatsService::new(store)
        .get_dashboard_stats()
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Store(_)));
}
