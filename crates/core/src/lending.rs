//! Lend lifecycle as a projection over `(quantity, returned)`.
//!
//! There is no stored lend state. Outstanding quantity and the lifecycle
//! stage are recomputed from the lend quantity and the sum of its returns
//! every time they are needed.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Quantity;

pub const INSUFFICIENT_STOCK: &str = "insufficient stock";
pub const OVER_RETURN: &str = "over return";

/// Lifecycle stage of a lend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LendState {
    /// Nothing returned yet.
    Open,
    /// Some, but not all, units returned.
    PartiallyReturned,
    /// Everything returned. Terminal.
    Closed,
}

/// Quantity figures of one lend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LendProgress {
    pub quantity: Quantity,
    pub returned: Quantity,
}

impl LendProgress {
    pub fn new(quantity: Quantity, returned: i64) -> Self {
        Self {
            quantity,
            returned: returned.clamp(0, Quantity::MAX as i64) as Quantity,
        }
    }

    /// `max(0, quantity - returned)`.
    pub fn outstanding(&self) -> Quantity {
        (self.quantity - self.returned).max(0)
    }

    pub fn state(&self) -> LendState {
        let outstanding = self.outstanding();
        if outstanding == 0 {
            LendState::Closed
        } else if outstanding == self.quantity {
            LendState::Open
        } else {
            LendState::PartiallyReturned
        }
    }

    /// Validate a return of `quantity` units against what is still out.
    pub fn check_return(&self, quantity: Quantity) -> Result<LendProgress, CoreError> {
        if quantity > self.outstanding() {
            return Err(CoreError::Conflict(OVER_RETURN.to_string()));
        }
        Ok(LendProgress {
            quantity: self.quantity,
            returned: self.returned + quantity,
        })
    }
}

/// Validate a lend of `quantity` units against the locked stock level.
pub fn check_lend(stock: Quantity, quantity: Quantity) -> Result<Quantity, CoreError> {
    if quantity > stock {
        return Err(CoreError::Conflict(INSUFFICIENT_STOCK.to_string()));
    }
    Ok(stock - quantity)
}
