use stockwatch_catalog::CatalogError;
use stockwatch_db::DbError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The upstream catalog could not be read. Nothing was persisted.
    #[error("catalog fetch failed: {0}")]
    Fetch(#[from] CatalogError),

    /// A write batch failed to commit. Batches before `batch_index` are
    /// durable; this one and any after it were not written.
    #[error("sync failed committing batch {batch_index}: {source}")]
    Sync {
        batch_index: usize,
        #[source]
        source: DbError,
    },

    #[error("store failure: {0}")]
    Store(#[from] DbError),

    #[error("alert not found: {0}")]
    AlertNotFound(Uuid),
}
