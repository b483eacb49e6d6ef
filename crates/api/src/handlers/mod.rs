//! Request handlers, one submodule per resource.
//!
//! Handlers only extract, delegate to a ledger engine and wrap the result;
//! every business rule lives in `stockroom_ledger`.

pub mod disposals;
pub mod lends;
pub mod masters;
pub mod stock;
