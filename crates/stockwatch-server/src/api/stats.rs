use axum::{extract::State, Extension, Json};
use stockwatch_core::DashboardStats;
use stockwatch_db::{AlertStore, ProductStore};
use stockwatch_engine::CatalogSource;

use crate::middleware::RequestId;

use super::{map_engine_error, ApiError, AppState};

pub(super) async fn dashboard_stats<S, C>(
    State(state): State<AppState<S, C>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<DashboardStats>, ApiError>
where
    S: ProductStore + AlertStore + 'static,
    C: CatalogSource + 'static,
{
    state
        .stats
        .get_dashboard_stats()
        .await
        .map(Json)
        .map_err(|e| map_engine_error(req_id.0, &e))
}
