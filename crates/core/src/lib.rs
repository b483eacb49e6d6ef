//! Pure domain logic for the equipment inventory ledger.
//!
//! Nothing in this crate performs I/O. The database and engine crates build
//! on these types and rules.

pub mod error;
pub mod ids;
pub mod lending;
pub mod management_number;
pub mod pagination;
pub mod stock;
pub mod types;
pub mod validation;
