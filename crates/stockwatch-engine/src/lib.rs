//! Inventory sync, alerting and reporting services.
//!
//! Every service receives its store handle at construction and is generic over
//! the [`ProductStore`](stockwatch_db::ProductStore) /
//! [`AlertStore`](stockwatch_db::AlertStore) ports, so the same code runs
//! against Postgres and the in-memory store.

pub mod alerts;
pub mod error;
pub mod inventory;
pub mod stats;
pub mod sync;

pub use alerts::AlertService;
pub use error::EngineError;
pub use inventory::{InventoryService, SyncSummary, DEFAULT_INVENTORY_UPDATES_LIMIT};
pub use stats::StatsService;
pub use sync::{CatalogSource, SyncReport, SyncRunner, SyncTrigger};
