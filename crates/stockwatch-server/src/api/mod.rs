mod alerts;
mod products;
mod stats;
mod sync;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use stockwatch_core::DEFAULT_LOW_STOCK_THRESHOLD;
use stockwatch_db::{AlertStore, ProductStore};
use stockwatch_engine::{
    AlertService, CatalogSource, EngineError, InventoryService, StatsService,
    DEFAULT_INVENTORY_UPDATES_LIMIT,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

/// Upper bound on `?limit=` for list endpoints.
const MAX_LIST_LIMIT: i64 = 200;

/// Shared handler state. Services are built once over one store handle.
///
/// `catalog` is `None` when the catalog API is not configured; read endpoints
/// keep working and only `POST /api/v1/sync` fails.
pub struct AppState<S, C> {
    pub store: Arc<S>,
    pub catalog: Option<Arc<C>>,
    pub inventory: InventoryService<S>,
    pub alerts: AlertService<S>,
    pub stats: StatsService<S>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            catalog: self.catalog.clone(),
            inventory: self.inventory.clone(),
            alerts: self.alerts.clone(),
            stats: self.stats.clone(),
        }
    }
}

impl<S: ProductStore + AlertStore, C> AppState<S, C> {
    pub fn new(store: Arc<S>, catalog: Option<C>) -> Self {
        Self {
            inventory: InventoryService::new(Arc::clone(&store)),
            alerts: AlertService::new(Arc::clone(&store)),
            stats: StatsService::new(Arc::clone(&store)),
            catalog: catalog.map(Arc::new),
            store,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "upstream_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Parses a positive integer query value, falling back to `default` when the
/// value is missing, unparseable, or not positive.
fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub(super) fn normalize_threshold(raw: Option<&str>) -> i64 {
    positive_or(raw, DEFAULT_LOW_STOCK_THRESHOLD)
}

pub(super) fn normalize_limit(raw: Option<&str>) -> i64 {
    positive_or(raw, DEFAULT_INVENTORY_UPDATES_LIMIT).min(MAX_LIST_LIMIT)
}

/// Maps a failure from a read or alert endpoint onto the error envelope.
pub(super) fn map_engine_error(request_id: String, error: &EngineError) -> ApiError {
    match error {
        EngineError::AlertNotFound(id) => {
            ApiError::new(request_id, "not_found", format!("alert {id} not found"))
        }
        EngineError::Fetch(_) => {
            tracing::warn!(error = %error, "catalog unavailable");
            ApiError::new(request_id, "upstream_unavailable", "catalog API unavailable")
        }
        EngineError::Sync { .. } | EngineError::Store(_) => {
            tracing::error!(error = %error, "store operation failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app<S, C>(state: AppState<S, C>) -> Router
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    Router::new()
        .route("/api/v1/health", get(health::<S, C>))
        .route("/api/v1/sync", post(sync::trigger_sync::<S, C>))
        .route("/api/v1/stats", get(stats::dashboard_stats::<S, C>))
        .route("/api/v1/products", get(products::list_products::<S, C>))
        .route(
            "/api/v1/products/low-stock",
            get(products::list_low_stock_products::<S, C>),
        )
        .route(
            "/api/v1/inventory-updates",
            get(products::list_inventory_updates::<S, C>),
        )
        .route("/api/v1/alerts", get(alerts::list_active_alerts::<S, C>))
        .route(
            "/api/v1/alerts/resolve",
            post(alerts::resolve_alert::<S, C>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<S, C>(State(state): State<AppState<S, C>>) -> impl IntoResponse
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
