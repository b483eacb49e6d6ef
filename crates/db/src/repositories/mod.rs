//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Methods
//! that take part in a ledger transaction accept `&mut PgConnection`
//! (pass `&mut *tx`); read-only list queries accept `&PgPool`; lookups
//! usable in both places are generic over [`sqlx::PgExecutor`].

pub mod disposal_repo;
pub mod lend_repo;
pub mod master_repo;
pub mod return_repo;
pub mod stock_repo;

pub use disposal_repo::DisposalRepo;
pub use lend_repo::LendRepo;
pub use master_repo::MasterRepo;
pub use return_repo::ReturnRepo;
pub use stock_repo::StockRepo;
