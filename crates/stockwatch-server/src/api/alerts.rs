use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use stockwatch_core::Alert;
use stockwatch_db::{AlertStore, ProductStore};
use stockwatch_engine::CatalogSource;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_engine_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResolveAlertRequest {
    pub alert_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ResolveAlertResponse {
    success: bool,
    message: String,
}

pub(super) async fn list_active_alerts<S, C>(
    State(state): State<AppState<S, C>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<Alert>>, ApiError>
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    state
        .alerts
        .get_active_alerts()
        .await
        .map(Json)
        .map_err(|e| map_engine_error(req_id.0, &e))
}

/// `POST /api/v1/alerts/resolve` with body `{"alertId": "<uuid>"}`.
///
/// An id that is not a UUID cannot name a stored alert and is reported as
/// not found, the same as an unknown UUID.
pub(super) async fn resolve_alert<S, C>(
    State(state): State<AppState<S, C>>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ResolveAlertRequest>, JsonRejection>,
) -> Result<Json<ResolveAlertResponse>, ApiError>
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    let Json(body) = body.map_err(|rejection| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("invalid request body: {}", rejection.body_text()),
        )
    })?;

    let raw_id = body
        .alert_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "bad_request", "alertId is required"))?;

    let alert_id = Uuid::parse_str(raw_id).map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("alert {raw_id} not found"),
        )
    })?;

    let alert = state
        .alerts
        .resolve_alert(alert_id)
        .await
        .map_err(|e| map_engine_error(req_id.0, &e))?;

    tracing::info!(alert_id = %alert.id, product_id = %alert.product_id, "alert resolved");
    Ok(Json(ResolveAlertResponse {
        success: true,
        message: format!("Alert {alert_id} resolved"),
    }))
}
