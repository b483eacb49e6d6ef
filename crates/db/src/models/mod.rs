//! Row models and input DTOs, one module per table family.

pub mod disposal;
pub mod lend;
pub mod master;
pub mod stock;
pub mod summary;
