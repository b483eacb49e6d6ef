//! Handlers for the `/masters` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::pagination::Paged;
use stockroom_db::models::master::{AssetMaster, CreateAssetMaster, MasterFilter, UpdateAssetMaster};
use stockroom_db::models::summary::InventorySummary;
use stockroom_ledger::catalog::DeletionReport;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/v1/masters
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateAssetMaster>,
) -> AppResult<(StatusCode, Json<AssetMaster>)> {
    let master = state.ledger.catalog.create_master(input).await?;
    Ok((StatusCode::CREATED, Json(master)))
}

/// GET /api/v1/masters
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<MasterFilter>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Paged<AssetMaster>>> {
    let masters = state.ledger.catalog.list(filter, params.page()).await?;
    Ok(Json(masters))
}

/// GET /api/v1/masters/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<InventorySummary>> {
    Ok(Json(state.ledger.catalog.summary().await?))
}

/// GET /api/v1/masters/{management_number}
pub async fn get_by_management_number(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
) -> AppResult<Json<AssetMaster>> {
    let master = state
        .ledger
        .catalog
        .get_by_management_number(&management_number)
        .await?;
    Ok(Json(master))
}

/// PATCH /api/v1/masters/{management_number}
pub async fn update(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
    AppJson(input): AppJson<UpdateAssetMaster>,
) -> AppResult<Json<AssetMaster>> {
    let master = state
        .ledger
        .catalog
        .update(&management_number, input)
        .await?;
    Ok(Json(master))
}

/// DELETE /api/v1/masters/{management_number}
///
/// Removes the master with its stock row and event history, returning what
/// was deleted.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
) -> AppResult<Json<DeletionReport>> {
    let report = state.ledger.catalog.delete_master(&management_number).await?;
    Ok(Json(report))
}
