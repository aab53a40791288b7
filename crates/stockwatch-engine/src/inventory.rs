//! Product persistence with merge-on-write and the inventory change log.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use stockwatch_core::{merge_product, Category, InventoryUpdate, Product, CATEGORIES};
use stockwatch_db::{ProductStore, WriteBatch, WriteOp};

use crate::error::EngineError;

/// Default number of change-log entries returned by
/// [`InventoryService::get_recent_inventory_updates`].
pub const DEFAULT_INVENTORY_UPDATES_LIMIT: i64 = 50;

/// Counts from one [`InventoryService::sync_products`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub products_written: usize,
    pub inventory_updates: usize,
    pub batches_committed: usize,
}

#[derive(Debug)]
pub struct InventoryService<S> {
    store: Arc<S>,
}

impl<S> Clone for InventoryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ProductStore> InventoryService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Upserts every product and records an [`InventoryUpdate`] for each
    /// previously known product whose inventory changed.
    ///
    /// Writes are grouped into batches of at most
    /// [`MAX_BATCH_OPERATIONS`](stockwatch_db::MAX_BATCH_OPERATIONS). A
    /// product upsert and its change-log entry always land in the same batch.
    /// If the same id appears more than once in `products`, later occurrences
    /// are compared and merged against the earlier queued value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Sync`] with the failing batch's index when a
    /// commit fails; earlier batches remain committed. Read failures while
    /// looking up stored records surface as [`EngineError::Store`].
    pub async fn sync_products(&self, products: Vec<Product>) -> Result<SyncSummary, EngineError> {
        let now = Utc::now();
        let mut summary = SyncSummary::default();
        let mut batch = WriteBatch::new();
        let mut queued: HashMap<String, Product> = HashMap::new();

        for incoming in products {
            let stored = match queued.get(&incoming.id) {
                Some(product) => Some(product.clone()),
                None => self.store.get_product(&incoming.id).await?,
            };

            let update = InventoryUpdate::between(stored.as_ref(), &incoming, now);
            let merged = merge_product(stored.as_ref(), incoming);

            let needed = 1 + usize::from(update.is_some());
            if !batch.has_room_for(needed) {
                self.flush(&mut batch, &mut summary).await?;
            }

            batch.push(WriteOp::UpsertProduct(merged.clone()));
            summary.products_written += 1;
            if let Some(update) = update {
                tracing::debug!(
                    product_id = %update.product_id,
                    previous = update.previous_quantity,
                    new = update.new_quantity,
                    "inventory changed"
                );
                batch.push(WriteOp::AppendInventoryUpdate(update));
                summary.inventory_updates += 1;
            }
            queued.insert(merged.id.clone(), merged);
        }

        if !batch.is_empty() {
            self.flush(&mut batch, &mut summary).await?;
        }

        tracing::info!(
            products = summary.products_written,
            inventory_updates = summary.inventory_updates,
            batches = summary.batches_committed,
            "products synced"
        );
        Ok(summary)
    }

    async fn flush(
        &self,
        batch: &mut WriteBatch,
        summary: &mut SyncSummary,
    ) -> Result<(), EngineError> {
        let batch_index = summary.batches_committed;
        let pending = batch.take();
        self.store
            .commit_batch(&pending)
            .await
            .map_err(|source| {
                tracing::error!(batch_index, error = %source, "batch commit failed");
                EngineError::Sync {
                    batch_index,
                    source,
                }
            })?;
        tracing::debug!(batch_index, operations = pending.len(), "batch committed");
        summary.batches_committed += 1;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_product(&self, id: &str) -> Result<Option<Product>, EngineError> {
        Ok(self.store.get_product(id).await?)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_all_products(&self) -> Result<Vec<Product>, EngineError> {
        Ok(self.store.list_products().await?)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_products_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Product>, EngineError> {
        Ok(self.store.list_products_by_category(category).await?)
    }

    /// Every taxonomy category mapped to its products, including empty ones,
    /// built from a single snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_products_grouped_by_category(
        &self,
    ) -> Result<BTreeMap<Category, Vec<Product>>, EngineError> {
        let mut grouped: BTreeMap<Category, Vec<Product>> =
            CATEGORIES.into_iter().map(|c| (c, Vec::new())).collect();
        for product in self.store.list_products().await? {
            grouped.entry(product.category).or_default().push(product);
        }
        Ok(grouped)
    }

    /// Products with `0 < inventory < threshold`, lowest stock first. Callers
    /// without an explicit threshold pass
    /// [`DEFAULT_LOW_STOCK_THRESHOLD`](stockwatch_core::DEFAULT_LOW_STOCK_THRESHOLD).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_low_stock_products(&self, threshold: i64) -> Result<Vec<Product>, EngineError> {
        Ok(self.store.list_low_stock_products(threshold).await?)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_out_of_stock_products(&self) -> Result<Vec<Product>, EngineError> {
        Ok(self.store.list_out_of_stock_products().await?)
    }

    /// Newest change-log entries first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_recent_inventory_updates(
        &self,
        limit: i64,
    ) -> Result<Vec<InventoryUpdate>, EngineError> {
        Ok(self.store.list_recent_inventory_updates(limit).await?)
    }
}
