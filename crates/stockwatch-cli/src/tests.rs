use super::*;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use stockwatch_core::{category_stats, dashboard_stats, InventoryUpdate, Product, ProductStatus};
use stockwatch_db::MemoryStore;

fn make_product(id: &str, title: &str, inventory: i64) -> Product {
    let ts = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    Product {
        id: id.to_string(),
        title: title.to_string(),
        sku: format!("SKU-{id}"),
        price: Decimal::new(4_999, 2),
        compare_at_price: None,
        inventory,
        category: stockwatch_core::classify("", "", title),
        image_url: None,
        vendor: None,
        product_type: None,
        tags: None,
        status: ProductStatus::Active,
        created_at: ts,
        updated_at: ts,
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["stockwatch"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_sync_and_migrate() {
    let cli = Cli::try_parse_from(["stockwatch", "sync"]).expect("valid");
    assert!(matches!(cli.command, Some(Commands::Sync)));

    let cli = Cli::try_parse_from(["stockwatch", "migrate"]).expect("valid");
    assert!(matches!(cli.command, Some(Commands::Migrate)));
}

#[test]
fn products_accepts_category_filter() {
    let cli = Cli::try_parse_from(["stockwatch", "products", "--category", "SEATING"])
        .expect("valid");
    assert!(matches!(
        cli.command,
        Some(Commands::Products {
            category: Some(Category::Seating),
            grouped: false
        })
    ));
}

#[test]
fn products_rejects_unknown_category() {
    let result = Cli::try_parse_from(["stockwatch", "products", "--category", "sofas"]);
    assert!(result.is_err());
}

#[test]
fn products_category_conflicts_with_grouped() {
    let result = Cli::try_parse_from([
        "stockwatch",
        "products",
        "--category",
        "DESKS",
        "--grouped",
    ]);
    assert!(result.is_err());
}

#[test]
fn low_stock_and_updates_use_defaults() {
    let cli = Cli::try_parse_from(["stockwatch", "low-stock"]).expect("valid");
    assert!(matches!(
        cli.command,
        Some(Commands::LowStock { threshold: 10 })
    ));

    let cli = Cli::try_parse_from(["stockwatch", "updates"]).expect("valid");
    assert!(matches!(cli.command, Some(Commands::Updates { limit: 50 })));

    let cli = Cli::try_parse_from(["stockwatch", "low-stock", "--threshold", "3"]).expect("valid");
    assert!(matches!(cli.command, Some(Commands::LowStock { threshold: 3 })));
}

#[test]
fn alerts_resolve_requires_uuid() {
    let id = Uuid::new_v4();
    let cli = Cli::try_parse_from(["stockwatch", "alerts", "resolve", &id.to_string()])
        .expect("valid");
    match cli.command {
        Some(Commands::Alerts {
            command: AlertCommands::Resolve { alert_id },
        }) => assert_eq!(alert_id, id),
        other => panic!("unexpected command: {other:?}"),
    }

    assert!(Cli::try_parse_from(["stockwatch", "alerts", "resolve", "nope"]).is_err());
    assert!(Cli::try_parse_from(["stockwatch", "alerts", "resolve"]).is_err());
}

#[test]
fn render_products_truncates_long_titles() {
    let long = "An Extremely Long Ergonomic Mesh Office Chair With Headrest";
    let out = inventory::render_products(&[make_product("7", long, 3)]);
    let mut lines = out.lines();
    assert!(lines.next().expect("header").starts_with("ID"));
    let row = lines.next().expect("row");
    assert!(row.contains("SEATING"));
    assert!(row.contains("49.99"));
    assert!(row.ends_with("..."));
    assert!(!row.contains("Headrest"));
}

#[test]
fn render_dashboard_lists_every_category() {
    let products = [make_product("1", "Oak Desk", 4), make_product("2", "Mesh Chair", 0)];
    let out = inventory::render_dashboard(&dashboard_stats(&products));
    assert!(out.contains("Products:      2"));
    assert!(out.contains("Low stock:     1"));
    for category in stockwatch_core::CATEGORIES {
        assert!(out.contains(category.as_str()), "{category}");
    }
}

#[test]
fn render_category_table_has_one_row_per_entry() {
    let products = [make_product("1", "Oak Desk", 4)];
    let out = inventory::render_category_table(&[category_stats(Category::Desks, &products)]);
    assert_eq!(out.lines().count(), 2);
}

#[test]
fn render_updates_shows_before_and_after() {
    let update = InventoryUpdate {
        product_id: "42".to_string(),
        sku: "DK-42".to_string(),
        previous_quantity: 12,
        new_quantity: 7,
        timestamp: Utc.with_ymd_and_hms(2026, 3, 2, 8, 15, 0).unwrap(),
    };
    let out = inventory::render_updates(&[update]);
    let row = out.lines().nth(1).expect("row");
    assert!(row.starts_with("2026-03-02 08:15:00"));
    assert!(row.contains("DK-42"));
    assert!(row.trim_end().ends_with('7'));
}

#[tokio::test]
async fn check_alerts_then_render_detail() {
    let store = Arc::new(MemoryStore::new());
    store.insert_product(make_product("1", "Floor Lamp", 0));
    alerts::run_check_alerts(Arc::clone(&store))
        .await
        .expect("check alerts");

    let opened = store.alerts();
    assert_eq!(opened.len(), 1);

    alerts::run_resolve_alert(Arc::clone(&store), opened[0].id)
        .await
        .expect("resolve");
    let resolved = store.alerts().remove(0);
    let detail = alerts::render_alert_detail(&resolved);
    assert!(detail.contains("Type:      out_of_stock"));
    assert!(detail.contains("Status:    resolved at"));
}

#[tokio::test]
async fn resolving_unknown_alert_fails() {
    let store = Arc::new(MemoryStore::new());
    let err = alerts::run_resolve_alert(store, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("alert not found"));
}

#[tokio::test]
async fn low_stock_rejects_non_positive_threshold() {
    let store = Arc::new(MemoryStore::new());
    assert!(inventory::run_low_stock(store, 0).await.is_err());
}
