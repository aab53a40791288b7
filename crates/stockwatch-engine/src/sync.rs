//! The end-to-end sync pipeline: fetch, persist, auto-resolve, check.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use stockwatch_catalog::{CatalogClient, CatalogError};
use stockwatch_core::Product;
use stockwatch_db::{AlertStore, ProductStore};

use crate::alerts::AlertService;
use crate::error::EngineError;
use crate::inventory::InventoryService;

/// Where the canonical product list comes from.
pub trait CatalogSource: Send + Sync {
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

impl CatalogSource for CatalogClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        CatalogClient::fetch_products(self).await
    }
}

impl<T: CatalogSource> CatalogSource for Arc<T> {
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
        T::fetch_products(self)
    }
}

/// What started a sync run; recorded in logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    Api,
    Cli,
}

impl SyncTrigger {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SyncTrigger::Api => "api",
            SyncTrigger::Cli => "cli",
        }
    }
}

impl std::fmt::Display for SyncTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Products fetched from the catalog and written.
    pub products_count: usize,
    /// Alerts opened or refreshed by the post-sync check.
    pub alerts_count: usize,
    pub inventory_updates: usize,
    pub resolved_alerts: u64,
}

pub struct SyncRunner<C, S> {
    source: C,
    inventory: InventoryService<S>,
    alerts: AlertService<S>,
}

impl<C, S> SyncRunner<C, S>
where
    C: CatalogSource,
    S: ProductStore + AlertStore,
{
    #[must_use]
    pub fn new(source: C, store: Arc<S>) -> Self {
        Self {
            source,
            inventory: InventoryService::new(Arc::clone(&store)),
            alerts: AlertService::new(store),
        }
    }

    /// Runs one full sync.
    ///
    /// A fetch failure aborts before anything is written. After products are
    /// persisted, alerts whose condition cleared are resolved, then every
    /// low-stock and out-of-stock product is checked.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Fetch`]: the catalog could not be read.
    /// - [`EngineError::Sync`]: a write batch failed; earlier batches remain.
    /// - [`EngineError::Store`]: any other store failure.
    pub async fn run_sync(&self, trigger: SyncTrigger) -> Result<SyncReport, EngineError> {
        tracing::info!(%trigger, "sync started");

        let products = self.source.fetch_products().await.map_err(|e| {
            tracing::error!(%trigger, error = %e, "catalog fetch failed; nothing persisted");
            EngineError::Fetch(e)
        })?;

        let summary = self.inventory.sync_products(products.clone()).await?;

        let mut resolved_alerts = 0;
        for product in &products {
            resolved_alerts += self.alerts.auto_resolve_alerts(product).await?;
        }

        let alerts = self.alerts.check_inventory_levels().await?;

        let report = SyncReport {
            products_count: products.len(),
            alerts_count: alerts.len(),
            inventory_updates: summary.inventory_updates,
            resolved_alerts,
        };
        tracing::info!(
            %trigger,
            products = report.products_count,
            alerts = report.alerts_count,
            inventory_updates = report.inventory_updates,
            resolved_alerts = report.resolved_alerts,
            batches = summary.batches_committed,
            "sync completed"
        );
        Ok(report)
    }
}
