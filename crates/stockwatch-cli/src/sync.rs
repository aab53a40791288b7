use std::sync::Arc;

use stockwatch_catalog::CatalogClient;
use stockwatch_core::AppConfig;
use stockwatch_db::{AlertStore, ProductStore};
use stockwatch_engine::{SyncRunner, SyncTrigger};

/// Runs one full catalog sync against `store`.
///
/// # Errors
///
/// Returns an error if the catalog API is not configured, the catalog cannot
/// be fetched, or any write batch fails. A fetch failure leaves the store
/// untouched.
pub(crate) async fn run_sync<S>(config: &AppConfig, store: Arc<S>) -> anyhow::Result<()>
where
    S: ProductStore + AlertStore,
{
    let client = CatalogClient::from_app_config(config)?;
    let report = SyncRunner::new(client, store)
        .run_sync(SyncTrigger::Cli)
        .await?;

    println!(
        "synced {} products: {} inventory changes, {} alerts active, {} auto-resolved",
        report.products_count,
        report.inventory_updates,
        report.alerts_count,
        report.resolved_alerts
    );
    Ok(())
}
