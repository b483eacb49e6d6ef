use axum::routing::get;
use axum::Router;

use crate::handlers::lends;
use crate::state::AppState;

/// Routes mounted at `/lends`.
///
/// ```text
/// GET    /                        -> list
/// GET    /{lend_uid}              -> get_by_uid
/// GET    /{lend_uid}/returns      -> list_returns
/// POST   /{lend_uid}/returns      -> create_return
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lends::list))
        .route("/{lend_uid}", get(lends::get_by_uid))
        .route(
            "/{lend_uid}/returns",
            get(lends::list_returns).post(lends::create_return),
        )
}
