//! Disposal model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Quantity, Timestamp};
use uuid::Uuid;

/// A row from `disposals`, joined with the master's management number.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Disposal {
    pub id: DbId,
    pub disposal_uid: Uuid,
    pub asset_master_id: DbId,
    pub management_number: String,
    pub quantity: Quantity,
    pub disposed_at: Timestamp,
    pub reason: Option<String>,
    pub processed_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for disposing of stock.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDisposal {
    pub quantity: Quantity,
    pub reason: Option<String>,
    pub processed_by: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDisposal {
    pub disposal_uid: Uuid,
    pub asset_master_id: DbId,
    pub quantity: Quantity,
    pub disposed_at: Timestamp,
    pub reason: Option<String>,
    pub processed_by: Option<String>,
}

/// List filter for disposals.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisposalFilter {
    pub management_number: Option<String>,
    pub processed_by: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}
