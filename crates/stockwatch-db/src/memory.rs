//! In-process store with the same contract as [`PgStore`](crate::PgStore).
//!
//! Used by the engine and server tests, and handy for local runs without a
//! database. Failure injection lets callers exercise the batch-failure and
//! store-unavailable paths.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use stockwatch_core::{Alert, AlertType, Category, InventoryUpdate, NewAlert, Product};
use uuid::Uuid;

use crate::store::{AlertStore, AlertUpsert, ProductStore, WriteBatch, WriteOp};
use crate::DbError;

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<String, Product>,
    inventory_updates: Vec<InventoryUpdate>,
    alerts: Vec<Alert>,
    commit_attempts: usize,
    committed_batches: Vec<usize>,
    fail_commit_at: Option<usize>,
    unavailable: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DbError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| DbError::Unavailable("memory store mutex poisoned".to_string()))?;
        if guard.unavailable {
            return Err(DbError::Unavailable("memory store marked unavailable".to_string()));
        }
        Ok(guard)
    }

    fn lock_unchecked(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Seeds a product directly, bypassing batching and the change log.
    pub fn insert_product(&self, product: Product) {
        self.lock_unchecked()
            .products
            .insert(product.id.clone(), product);
    }

    /// Makes the commit attempt with this zero-based index fail. Earlier and
    /// later attempts behave normally.
    pub fn fail_commit_at(&self, batch_index: usize) {
        self.lock_unchecked().fail_commit_at = Some(batch_index);
    }

    /// While set, every store operation fails with [`DbError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock_unchecked().unavailable = unavailable;
    }

    /// Operation counts of every successfully committed batch, in order.
    #[must_use]
    pub fn committed_batches(&self) -> Vec<usize> {
        self.lock_unchecked().committed_batches.clone()
    }

    /// Every change-log entry in insertion order.
    #[must_use]
    pub fn inventory_updates(&self) -> Vec<InventoryUpdate> {
        self.lock_unchecked().inventory_updates.clone()
    }

    /// Every alert, open or resolved, in creation order.
    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.lock_unchecked().alerts.clone()
    }
}

fn sort_by_title(products: &mut [Product]) {
    products.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
}

impl ProductStore for MemoryStore {
    async fn ping(&self) -> Result<(), DbError> {
        self.lock().map(|_| ())
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, DbError> {
        Ok(self.lock()?.products.get(id).cloned())
    }

    async fn commit_batch(&self, batch: &WriteBatch) -> Result<(), DbError> {
        let mut state = self.lock()?;
        let attempt = state.commit_attempts;
        state.commit_attempts += 1;
        if state.fail_commit_at == Some(attempt) {
            return Err(DbError::Unavailable(format!(
                "injected failure committing batch {attempt}"
            )));
        }

        for op in batch.ops() {
            match op {
                WriteOp::UpsertProduct(product) => {
                    state.products.insert(product.id.clone(), product.clone());
                }
                WriteOp::AppendInventoryUpdate(update) => {
                    state.inventory_updates.push(update.clone());
                }
            }
        }
        state.committed_batches.push(batch.len());
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        let mut products: Vec<Product> = self.lock()?.products.values().cloned().collect();
        sort_by_title(&mut products);
        Ok(products)
    }

    async fn list_products_by_category(&self, category: Category) -> Result<Vec<Product>, DbError> {
        let mut products: Vec<Product> = self
            .lock()?
            .products
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        sort_by_title(&mut products);
        Ok(products)
    }

    async fn list_low_stock_products(&self, threshold: i64) -> Result<Vec<Product>, DbError> {
        let mut products: Vec<Product> = self
            .lock()?
            .products
            .values()
            .filter(|p| p.inventory > 0 && p.inventory < threshold)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.inventory.cmp(&b.inventory).then_with(|| a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn list_out_of_stock_products(&self) -> Result<Vec<Product>, DbError> {
        let mut products: Vec<Product> = self
            .lock()?
            .products
            .values()
            .filter(|p| p.inventory == 0)
            .cloned()
            .collect();
        sort_by_title(&mut products);
        Ok(products)
    }

    async fn list_recent_inventory_updates(
        &self,
        limit: i64,
    ) -> Result<Vec<InventoryUpdate>, DbError> {
        let state = self.lock()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        // Insertion order breaks timestamp ties, newest insert first.
        let mut indexed: Vec<(usize, &InventoryUpdate)> =
            state.inventory_updates.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then_with(|| ib.cmp(ia)));
        Ok(indexed
            .into_iter()
            .take(limit)
            .map(|(_, update)| update.clone())
            .collect())
    }
}

impl AlertStore for MemoryStore {
    async fn upsert_open_alert(
        &self,
        alert: &NewAlert,
        now: DateTime<Utc>,
    ) -> Result<AlertUpsert, DbError> {
        let mut state = self.lock()?;

        if let Some(open) = state.alerts.iter_mut().find(|a| {
            !a.resolved && a.product_id == alert.product_id && a.alert_type == alert.alert_type
        }) {
            open.current_inventory = alert.current_inventory;
            open.message.clone_from(&alert.message);
            open.severity = alert.severity;
            return Ok(AlertUpsert {
                alert: open.clone(),
                created: false,
            });
        }

        let created = Alert {
            id: Uuid::new_v4(),
            alert_type: alert.alert_type,
            product_id: alert.product_id.clone(),
            product_title: alert.product_title.clone(),
            sku: alert.sku.clone(),
            current_inventory: alert.current_inventory,
            message: alert.message.clone(),
            severity: alert.severity,
            created_at: now,
            resolved: false,
            resolved_at: None,
        };
        state.alerts.push(created.clone());
        Ok(AlertUpsert {
            alert: created,
            created: true,
        })
    }

    async fn get_alert(&self, id: Uuid) -> Result<Option<Alert>, DbError> {
        Ok(self.lock()?.alerts.iter().find(|a| a.id == id).cloned())
    }

    async fn resolve_alert(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<Alert>, DbError> {
        let mut state = self.lock()?;
        let Some(alert) = state.alerts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if !alert.resolved {
            alert.resolved = true;
            alert.resolved_at = Some(now);
        }
        Ok(Some(alert.clone()))
    }

    async fn resolve_open_alerts(
        &self,
        product_id: &str,
        alert_type: AlertType,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let mut state = self.lock()?;
        let mut resolved = 0;
        for alert in state
            .alerts
            .iter_mut()
            .filter(|a| !a.resolved && a.product_id == product_id && a.alert_type == alert_type)
        {
            alert.resolved = true;
            alert.resolved_at = Some(now);
            resolved += 1;
        }
        Ok(resolved)
    }

    async fn list_open_alerts(&self) -> Result<Vec<Alert>, DbError> {
        let mut open: Vec<Alert> = self
            .lock()?
            .alerts
            .iter()
            .filter(|a| !a.resolved)
            .cloned()
            .collect();
        open.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(open)
    }
}
