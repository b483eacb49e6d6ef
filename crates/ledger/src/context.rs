//! State shared by the engines: pool, configuration, clock and id source.

use std::future::Future;
use std::sync::Arc;

use sqlx::PgPool;
use stockroom_core::error::CoreError;
use stockroom_core::ids::{SharedClock, SharedIdGenerator, SystemClock, UuidV7Generator};

use crate::config::LedgerConfig;

pub const TIMED_OUT: &str = "operation timed out";

#[derive(Clone)]
pub struct LedgerContext {
    pub pool: PgPool,
    pub config: Arc<LedgerConfig>,
    pub clock: SharedClock,
    pub ids: SharedIdGenerator,
}

impl LedgerContext {
    /// Context with the system clock and UUIDv7 identifiers.
    pub fn new(pool: PgPool, config: LedgerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidV7Generator),
        }
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: SharedIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Run `op` under the configured deadline.
    ///
    /// On expiry the future is dropped, which drops any open transaction and
    /// rolls it back.
    pub(crate) async fn bounded<T, F>(&self, name: &'static str, op: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        match tokio::time::timeout(self.config.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation = name,
                    timeout_ms = self.config.op_timeout.as_millis() as u64,
                    "Ledger operation timed out",
                );
                Err(CoreError::Internal(TIMED_OUT.to_string()))
            }
        }
    }
}
