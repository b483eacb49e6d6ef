//! Stock row model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::stock::LookupId;
use stockroom_core::types::{DbId, Quantity, Timestamp};

/// A row from `stock_items`, joined with its master's management number.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockItem {
    pub id: DbId,
    pub asset_master_id: DbId,
    pub management_number: String,
    pub serial: Option<String>,
    pub quantity: Quantity,
    pub status_id: LookupId,
    pub purchased_on: Option<NaiveDate>,
    pub owner: String,
    pub location: Option<String>,
    pub default_location: String,
    pub last_checked_at: Option<Timestamp>,
    pub last_checked_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The fields read under `FOR UPDATE` before a quantity mutation.
#[derive(Debug, Clone, FromRow)]
pub struct LockedStock {
    pub id: DbId,
    pub asset_master_id: DbId,
    pub quantity: Quantity,
    pub status_id: LookupId,
    pub management_category_id: LookupId,
    pub default_location: String,
}

/// DTO for registering the stock row of a master.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStockItem {
    pub serial: Option<String>,
    pub quantity: Quantity,
    pub purchased_on: Option<NaiveDate>,
    pub owner: String,
    pub location: Option<String>,
    pub default_location: String,
    pub notes: Option<String>,
}

/// DTO for editing a stock row. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStockItem {
    pub serial: Option<String>,
    /// Absolute quantity, not a delta.
    pub quantity: Option<Quantity>,
    /// Mark or clear the Broken condition.
    pub broken: Option<bool>,
    pub purchased_on: Option<NaiveDate>,
    pub owner: Option<String>,
    pub location: Option<String>,
    pub default_location: Option<String>,
    /// Records an inventory check by this person at the current time.
    pub last_checked_by: Option<String>,
    pub notes: Option<String>,
}

/// Resolved column values for [`crate::repositories::StockRepo::update`].
#[derive(Debug, Clone)]
pub struct StockChanges {
    pub serial: Option<String>,
    pub quantity: Option<Quantity>,
    pub status_id: Option<LookupId>,
    pub purchased_on: Option<NaiveDate>,
    pub owner: Option<String>,
    pub location: Option<String>,
    pub default_location: Option<String>,
    pub last_checked_at: Option<Timestamp>,
    pub last_checked_by: Option<String>,
    pub notes: Option<String>,
}

/// List filter for stock rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockFilter {
    pub status_id: Option<LookupId>,
    pub owner: Option<String>,
    /// Substring matched against current and default location.
    pub location: Option<String>,
}
