use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use stockwatch_db::{AlertStore, ProductStore};
use stockwatch_engine::{CatalogSource, EngineError, SyncRunner, SyncTrigger};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SyncResponse {
    success: bool,
    message: String,
    products_count: usize,
    alerts_count: usize,
}

/// Runs one full sync inline and reports its counts.
///
/// Upstream failures map to `502 upstream_unavailable`; anything that fails
/// after the fetch maps to `500 sync_failed`.
pub(super) async fn trigger_sync<S, C>(
    State(state): State<AppState<S, C>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<SyncResponse>, ApiError>
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    let Some(catalog) = state.catalog.as_ref() else {
        tracing::error!("sync requested but the catalog API is not configured");
        return Err(ApiError::new(
            req_id.0,
            "sync_failed",
            "catalog API is not configured",
        ));
    };

    let runner = SyncRunner::new(Arc::clone(catalog), Arc::clone(&state.store));
    let report = runner
        .run_sync(SyncTrigger::Api)
        .await
        .map_err(|e| map_sync_error(req_id.0, &e))?;

    Ok(Json(SyncResponse {
        success: true,
        message: format!(
            "Synced {} products, {} active alerts",
            report.products_count, report.alerts_count
        ),
        products_count: report.products_count,
        alerts_count: report.alerts_count,
    }))
}

fn map_sync_error(request_id: String, error: &EngineError) -> ApiError {
    match error {
        EngineError::Fetch(_) => {
            tracing::warn!(error = %error, "sync aborted: catalog unavailable");
            ApiError::new(request_id, "upstream_unavailable", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "sync failed");
            ApiError::new(request_id, "sync_failed", error.to_string())
        }
    }
}
