//! Route definitions for the `/masters` resource.
//!
//! Stock, lend and disposal entry points that act on one asset are nested
//! under `/masters/{management_number}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{disposals, lends, masters, stock};
use crate::state::AppState;

/// Routes mounted at `/masters`.
///
/// ```text
/// GET    /                                        -> list
/// POST   /                                        -> create
/// GET    /summary                                 -> summary
/// GET    /{management_number}                     -> get_by_management_number
/// PATCH  /{management_number}                     -> update
/// DELETE /{management_number}                     -> delete
///
/// GET    /{management_number}/stock               -> stock::get_for_master
/// POST   /{management_number}/stock               -> stock::register
/// PATCH  /{management_number}/stock               -> stock::edit
/// POST   /{management_number}/lends               -> lends::create
/// POST   /{management_number}/disposals           -> disposals::create
/// POST   /{management_number}/disposals/undo      -> disposals::undo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(masters::list).post(masters::create))
        .route("/summary", get(masters::summary))
        .route(
            "/{management_number}",
            get(masters::get_by_management_number)
                .patch(masters::update)
                .delete(masters::delete),
        )
        .route(
            "/{management_number}/stock",
            get(stock::get_for_master)
                .post(stock::register)
                .patch(stock::edit),
        )
        .route("/{management_number}/lends", post(lends::create))
        .route("/{management_number}/disposals", post(disposals::create))
        .route("/{management_number}/disposals/undo", post(disposals::undo))
}
