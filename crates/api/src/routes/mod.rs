pub mod disposals;
pub mod health;
pub mod lends;
pub mod masters;
pub mod stock;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          service + database health
///
/// /masters                                         list, create
/// /masters/summary                                 counts by status and genre
/// /masters/{management_number}                     get, update, delete
/// /masters/{management_number}/stock               get, register, edit
/// /masters/{management_number}/lends               lend out (POST)
/// /masters/{management_number}/disposals           dispose (POST)
/// /masters/{management_number}/disposals/undo      undo latest disposal (POST)
///
/// /stock                                           list
///
/// /lends                                           list
/// /lends/{lend_uid}                                get
/// /lends/{lend_uid}/returns                        list, return (POST)
///
/// /disposals                                       list
/// /disposals/{disposal_uid}                        get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/masters", masters::router())
        .nest("/stock", stock::router())
        .nest("/lends", lends::router())
        .nest("/disposals", disposals::router())
}
