//! Handlers for disposals.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::pagination::Paged;
use stockroom_db::models::disposal::{CreateDisposal, Disposal, DisposalFilter};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/v1/masters/{management_number}/disposals
pub async fn create(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
    AppJson(input): AppJson<CreateDisposal>,
) -> AppResult<(StatusCode, Json<Disposal>)> {
    let disposal = state
        .ledger
        .disposal
        .create_disposal(&management_number, input)
        .await?;
    Ok((StatusCode::CREATED, Json(disposal)))
}

/// POST /api/v1/masters/{management_number}/disposals/undo
///
/// Reverses the most recent disposal and returns the removed record.
pub async fn undo(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
) -> AppResult<Json<Disposal>> {
    Ok(Json(
        state.ledger.disposal.undo_disposal(&management_number).await?,
    ))
}

/// GET /api/v1/disposals
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<DisposalFilter>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Paged<Disposal>>> {
    let disposals = state
        .ledger
        .disposal
        .list_disposals(filter, params.page())
        .await?;
    Ok(Json(disposals))
}

/// GET /api/v1/disposals/{disposal_uid}
pub async fn get_by_uid(
    State(state): State<AppState>,
    AppPath(disposal_uid): AppPath<Uuid>,
) -> AppResult<Json<Disposal>> {
    Ok(Json(state.ledger.disposal.get_disposal(disposal_uid).await?))
}
