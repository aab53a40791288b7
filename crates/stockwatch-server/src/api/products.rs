use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use stockwatch_core::{Category, InventoryUpdate, Product};
use stockwatch_db::{AlertStore, ProductStore};
use stockwatch_engine::CatalogSource;

use crate::middleware::RequestId;

use super::{map_engine_error, normalize_limit, normalize_threshold, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub category: Option<String>,
}

// Numeric parameters are taken as strings so that bad input falls back to the
// default instead of being rejected by the extractor.
#[derive(Debug, Deserialize)]
pub(super) struct LowStockQuery {
    pub threshold: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LimitQuery {
    pub limit: Option<String>,
}

pub(super) async fn list_products<S, C>(
    State(state): State<AppState<S, C>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, ApiError>
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<Category>()
                .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?,
        ),
    };

    let products = match category {
        Some(category) => state.inventory.get_products_by_category(category).await,
        None => state.inventory.get_all_products().await,
    }
    .map_err(|e| map_engine_error(req_id.0, &e))?;

    Ok(Json(products))
}

pub(super) async fn list_low_stock_products<S, C>(
    State(state): State<AppState<S, C>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LowStockQuery>,
) -> Result<Json<Vec<Product>>, ApiError>
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    let threshold = normalize_threshold(query.threshold.as_deref());
    let products = state
        .inventory
        .get_low_stock_products(threshold)
        .await
        .map_err(|e| map_engine_error(req_id.0, &e))?;
    Ok(Json(products))
}

pub(super) async fn list_inventory_updates<S, C>(
    State(state): State<AppState<S, C>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<InventoryUpdate>>, ApiError>
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    let updates = state
        .inventory
        .get_recent_inventory_updates(normalize_limit(query.limit.as_deref()))
        .await
        .map_err(|e| map_engine_error(req_id.0, &e))?;
    Ok(Json(updates))
}
