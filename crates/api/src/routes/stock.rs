use axum::routing::get;
use axum::Router;

use crate::handlers::stock;
use crate::state::AppState;

/// Routes mounted at `/stock`.
///
/// ```text
/// GET    /                -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stock::list))
}
