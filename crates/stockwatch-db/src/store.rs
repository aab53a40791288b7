//! Storage ports used by the engine, plus the Postgres-backed implementation.
//!
//! Services are generic over [`ProductStore`] and [`AlertStore`] so the same
//! logic runs against [`PgStore`] in production and
//! [`MemoryStore`](crate::MemoryStore) in tests.

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use stockwatch_core::{Alert, AlertType, Category, InventoryUpdate, NewAlert, Product};
use uuid::Uuid;

use crate::DbError;

/// Upper bound on the number of write operations committed atomically.
pub const MAX_BATCH_OPERATIONS: usize = 500;

/// One queued write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    UpsertProduct(Product),
    AppendInventoryUpdate(InventoryUpdate),
}

/// An ordered group of writes committed as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether `additional` more operations fit under [`MAX_BATCH_OPERATIONS`].
    #[must_use]
    pub fn has_room_for(&self, additional: usize) -> bool {
        self.ops.len() + additional <= MAX_BATCH_OPERATIONS
    }

    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Moves the queued operations out, leaving the batch empty.
    pub fn take(&mut self) -> WriteBatch {
        std::mem::take(self)
    }
}

/// Result of [`AlertStore::upsert_open_alert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertUpsert {
    pub alert: Alert,
    /// `true` when a new alert was opened, `false` when an open one was refreshed.
    pub created: bool,
}

pub trait ProductStore: Send + Sync {
    /// Cheap round trip proving the backing store is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    fn get_product(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Product>, DbError>> + Send;

    /// Applies every operation in `batch` atomically: all of them or none.
    fn commit_batch(&self, batch: &WriteBatch) -> impl Future<Output = Result<(), DbError>> + Send;

    /// All products ordered by title, then id.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, DbError>> + Send;

    fn list_products_by_category(
        &self,
        category: Category,
    ) -> impl Future<Output = Result<Vec<Product>, DbError>> + Send;

    /// Products with `0 < inventory < threshold`, ascending by inventory.
    fn list_low_stock_products(
        &self,
        threshold: i64,
    ) -> impl Future<Output = Result<Vec<Product>, DbError>> + Send;

    fn list_out_of_stock_products(
        &self,
    ) -> impl Future<Output = Result<Vec<Product>, DbError>> + Send;

    /// Newest change-log entries first.
    fn list_recent_inventory_updates(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<InventoryUpdate>, DbError>> + Send;
}

pub trait AlertStore: Send + Sync {
    /// Refreshes the open alert for `(product_id, alert_type)` or opens a new
    /// one. Check-and-write is a single atomic step so concurrent runs cannot
    /// open two alerts for the same pair.
    fn upsert_open_alert(
        &self,
        alert: &NewAlert,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<AlertUpsert, DbError>> + Send;

    fn get_alert(&self, id: Uuid)
        -> impl Future<Output = Result<Option<Alert>, DbError>> + Send;

    /// Marks an alert resolved. An already-resolved alert is returned as-is
    /// with its original `resolved_at`. Returns `None` for an unknown id.
    fn resolve_alert(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Alert>, DbError>> + Send;

    /// Resolves every open alert of `alert_type` for `product_id`, returning
    /// how many were resolved.
    fn resolve_open_alerts(
        &self,
        product_id: &str,
        alert_type: AlertType,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<u64, DbError>> + Send;

    /// Unresolved alerts, highest severity first, then newest first.
    fn list_open_alerts(&self) -> impl Future<Output = Result<Vec<Alert>, DbError>> + Send;
}

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
