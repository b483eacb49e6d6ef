//! Handlers for lends and their returns.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::pagination::Paged;
use stockroom_db::models::lend::{CreateLend, CreateLendReturn, LendFilter, LendReturn};
use stockroom_ledger::lending::{LendView, ReturnReceipt};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/v1/masters/{management_number}/lends
pub async fn create(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
    AppJson(input): AppJson<CreateLend>,
) -> AppResult<(StatusCode, Json<LendView>)> {
    let lend = state
        .ledger
        .lending
        .create_lend(&management_number, input)
        .await?;
    Ok((StatusCode::CREATED, Json(lend)))
}

/// GET /api/v1/lends
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<LendFilter>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Paged<LendView>>> {
    Ok(Json(state.ledger.lending.list_lends(filter, params.page()).await?))
}

/// GET /api/v1/lends/{lend_uid}
pub async fn get_by_uid(
    State(state): State<AppState>,
    AppPath(lend_uid): AppPath<Uuid>,
) -> AppResult<Json<LendView>> {
    Ok(Json(state.ledger.lending.get_lend(lend_uid).await?))
}

/// POST /api/v1/lends/{lend_uid}/returns
pub async fn create_return(
    State(state): State<AppState>,
    AppPath(lend_uid): AppPath<Uuid>,
    AppJson(input): AppJson<CreateLendReturn>,
) -> AppResult<(StatusCode, Json<ReturnReceipt>)> {
    let receipt = state.ledger.lending.create_return(lend_uid, input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/v1/lends/{lend_uid}/returns
pub async fn list_returns(
    State(state): State<AppState>,
    AppPath(lend_uid): AppPath<Uuid>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Paged<LendReturn>>> {
    let returns = state
        .ledger
        .lending
        .list_returns_by_lend(lend_uid, params.page())
        .await?;
    Ok(Json(returns))
}
