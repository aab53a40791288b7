//! Read-only inventory queries: products, stock levels, stats and the
//! inventory change log.

use std::fmt::Write as _;
use std::sync::Arc;

use stockwatch_core::{Category, CategoryStats, DashboardStats, InventoryUpdate, Product};
use stockwatch_db::ProductStore;
use stockwatch_engine::{InventoryService, StatsService};

const TITLE_WIDTH: usize = 40;

pub(crate) async fn run_products<S: ProductStore>(
    store: Arc<S>,
    category: Option<Category>,
    grouped: bool,
) -> anyhow::Result<()> {
    let inventory = InventoryService::new(store);

    if grouped {
        let groups = inventory.get_products_grouped_by_category().await?;
        for (category, products) in &groups {
            println!("== {category} ({})", products.len());
            if !products.is_empty() {
                print!("{}", render_products(products));
            }
        }
        return Ok(());
    }

    let products = match category {
        Some(category) => inventory.get_products_by_category(category).await?,
        None => inventory.get_all_products().await?,
    };

    if products.is_empty() {
        println!("no products found; run `stockwatch sync` first");
        return Ok(());
    }
    print!("{}", render_products(&products));
    Ok(())
}

pub(crate) async fn run_low_stock<S: ProductStore>(
    store: Arc<S>,
    threshold: i64,
) -> anyhow::Result<()> {
    anyhow::ensure!(threshold > 0, "--threshold must be positive, got {threshold}");

    let products = InventoryService::new(store)
        .get_low_stock_products(threshold)
        .await?;
    if products.is_empty() {
        println!("no products below {threshold} units");
        return Ok(());
    }
    print!("{}", render_products(&products));
    Ok(())
}

pub(crate) async fn run_out_of_stock<S: ProductStore>(store: Arc<S>) -> anyhow::Result<()> {
    let products = InventoryService::new(store)
        .get_out_of_stock_products()
        .await?;
    if products.is_empty() {
        println!("nothing is out of stock");
        return Ok(());
    }
    print!("{}", render_products(&products));
    Ok(())
}

pub(crate) async fn run_stats<S: ProductStore>(
    store: Arc<S>,
    category: Option<Category>,
) -> anyhow::Result<()> {
    let stats = StatsService::new(store);
    match category {
        Some(category) => {
            let row = stats.get_category_stats(category).await?;
            print!("{}", render_category_table(std::slice::from_ref(&row)));
        }
        None => print!("{}", render_dashboard(&stats.get_dashboard_stats().await?)),
    }
    Ok(())
}

pub(crate) async fn run_updates<S: ProductStore>(store: Arc<S>, limit: i64) -> anyhow::Result<()> {
    anyhow::ensure!(limit > 0, "--limit must be positive, got {limit}");

    let updates = InventoryService::new(store)
        .get_recent_inventory_updates(limit)
        .await?;
    if updates.is_empty() {
        println!("no inventory changes recorded yet");
        return Ok(());
    }
    print!("{}", render_updates(&updates));
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) fn render_products(products: &[Product]) -> String {
    let mut out = format!(
        "{:<16}{:<14}{:<13}{:>10}{:>11}  TITLE\n",
        "ID", "SKU", "CATEGORY", "INVENTORY", "PRICE"
    );
    for p in products {
        let _ = writeln!(
            out,
            "{:<16}{:<14}{:<13}{:>10}{:>11}  {}",
            p.id,
            p.sku,
            p.category.as_str(),
            p.inventory,
            p.price.to_string(),
            truncate(&p.title, TITLE_WIDTH)
        );
    }
    out
}

pub(crate) fn render_category_table(rows: &[CategoryStats]) -> String {
    let mut out = format!(
        "{:<13}{:>10}{:>11}{:>11}{:>14}\n",
        "CATEGORY", "PRODUCTS", "INVENTORY", "LOW STOCK", "OUT OF STOCK"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<13}{:>10}{:>11}{:>11}{:>14}",
            row.category.as_str(),
            row.total_products,
            row.total_inventory,
            row.low_stock_count,
            row.out_of_stock_count
        );
    }
    out
}

pub(crate) fn render_dashboard(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Products:      {}", stats.total_products);
    let _ = writeln!(out, "Inventory:     {}", stats.total_inventory);
    let _ = writeln!(out, "Low stock:     {}", stats.low_stock_items);
    let _ = writeln!(out, "Out of stock:  {}", stats.out_of_stock_items);
    out.push('\n');
    out.push_str(&render_category_table(&stats.category_breakdown));
    out
}

pub(crate) fn render_updates(updates: &[InventoryUpdate]) -> String {
    let mut out = format!(
        "{:<22}{:<16}{:<14}{:>10}{:>10}\n",
        "RECORDED", "PRODUCT", "SKU", "FROM", "TO"
    );
    for u in updates {
        let _ = writeln!(
            out,
            "{:<22}{:<16}{:<14}{:>10}{:>10}",
            u.timestamp.format("%Y-%m-%d %H:%M:%S"),
            u.product_id,
            u.sku,
            u.previous_quantity,
            u.new_quantity
        );
    }
    out
}
