use axum::routing::get;
use axum::Router;

use crate::handlers::disposals;
use crate::state::AppState;

/// Routes mounted at `/disposals`.
///
/// ```text
/// GET    /                        -> list
/// GET    /{disposal_uid}          -> get_by_uid
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(disposals::list))
        .route("/{disposal_uid}", get(disposals::get_by_uid))
}
