//! Inventory ledger engines.
//!
//! Every public operation runs inside exactly one database transaction and
//! is bounded by [`LedgerConfig::op_timeout`]. Operations against the same
//! stock row serialize on its `FOR UPDATE` lock; nothing is cached or locked
//! in process.

pub mod catalog;
pub mod config;
pub mod context;
pub mod disposal;
pub mod lending;
pub mod stock;

pub use catalog::AssetMasterCatalog;
pub use config::{ConfigError, LedgerConfig};
pub use context::LedgerContext;
pub use disposal::DisposalEngine;
pub use lending::LendingEngine;
pub use stock::StockLedger;

/// All four engines over one shared context.
#[derive(Clone)]
pub struct Ledger {
    pub catalog: AssetMasterCatalog,
    pub stock: StockLedger,
    pub lending: LendingEngine,
    pub disposal: DisposalEngine,
}

impl Ledger {
    pub fn new(ctx: LedgerContext) -> Self {
        Self {
            catalog: AssetMasterCatalog::new(ctx.clone()),
            stock: StockLedger::new(ctx.clone()),
            lending: LendingEngine::new(ctx.clone()),
            disposal: DisposalEngine::new(ctx),
        }
    }
}
