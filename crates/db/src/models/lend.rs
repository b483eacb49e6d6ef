//! Lend and return models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::lending::LendProgress;
use stockroom_core::types::{DbId, Quantity, Timestamp};
use uuid::Uuid;

/// A row from `lends`, with the master's management number and the sum of
/// its returns attached.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lend {
    pub id: DbId,
    pub lend_uid: Uuid,
    pub asset_master_id: DbId,
    pub management_number: String,
    pub quantity: Quantity,
    pub returned: i64,
    pub borrower: String,
    pub due_on: Option<NaiveDate>,
    pub lent_by: Option<String>,
    pub lent_at: Timestamp,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lend {
    pub fn progress(&self) -> LendProgress {
        LendProgress::new(self.quantity, self.returned)
    }
}

/// Request body for creating a lend.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLend {
    pub quantity: Quantity,
    pub borrower: String,
    pub due_on: Option<NaiveDate>,
    pub lent_by: Option<String>,
    pub note: Option<String>,
}

/// Fully resolved insert values for a lend.
#[derive(Debug, Clone)]
pub struct NewLend {
    pub lend_uid: Uuid,
    pub asset_master_id: DbId,
    pub quantity: Quantity,
    pub borrower: String,
    pub due_on: Option<NaiveDate>,
    pub lent_by: Option<String>,
    pub lent_at: Timestamp,
    pub note: Option<String>,
}

/// List filter for lends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LendFilter {
    pub management_number: Option<String>,
    pub borrower: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    /// Only lends with units still out.
    #[serde(default)]
    pub only_outstanding: bool,
}

/// A row from `lend_returns`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LendReturn {
    pub id: DbId,
    pub return_uid: Uuid,
    pub lend_id: DbId,
    pub quantity: Quantity,
    pub processed_by: Option<String>,
    pub returned_at: Timestamp,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for recording a return.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLendReturn {
    pub quantity: Quantity,
    pub processed_by: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLendReturn {
    pub return_uid: Uuid,
    pub lend_id: DbId,
    pub quantity: Quantity,
    pub processed_by: Option<String>,
    pub returned_at: Timestamp,
    pub note: Option<String>,
}
