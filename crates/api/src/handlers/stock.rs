//! Handlers for stock rows.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::pagination::Paged;
use stockroom_db::models::stock::{CreateStockItem, StockFilter, StockItem, UpdateStockItem};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/v1/masters/{management_number}/stock
pub async fn register(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
    AppJson(input): AppJson<CreateStockItem>,
) -> AppResult<(StatusCode, Json<StockItem>)> {
    let item = state
        .ledger
        .stock
        .register_stock(&management_number, input)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/masters/{management_number}/stock
pub async fn get_for_master(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
) -> AppResult<Json<StockItem>> {
    Ok(Json(state.ledger.stock.get_stock(&management_number).await?))
}

/// PATCH /api/v1/masters/{management_number}/stock
pub async fn edit(
    State(state): State<AppState>,
    AppPath(management_number): AppPath<String>,
    AppJson(input): AppJson<UpdateStockItem>,
) -> AppResult<Json<StockItem>> {
    let item = state
        .ledger
        .stock
        .edit_stock(&management_number, input)
        .await?;
    Ok(Json(item))
}

/// GET /api/v1/stock
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<StockFilter>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Paged<StockItem>>> {
    Ok(Json(state.ledger.stock.list_stock(filter, params.page()).await?))
}
