use std::sync::Arc;

use stockroom_ledger::Ledger;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and engines are handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: stockroom_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub ledger: Ledger,
}
