//! Asset master model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::stock::LookupId;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `asset_masters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetMaster {
    pub id: DbId,
    pub management_number: String,
    pub name: String,
    pub management_category_id: LookupId,
    pub genre_id: LookupId,
    pub manufacturer: String,
    pub model: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new master. The management number is allocated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetMaster {
    pub name: String,
    pub management_category_id: Option<LookupId>,
    pub genre_id: Option<LookupId>,
    pub manufacturer: String,
    pub model: Option<String>,
}

/// DTO for updating a master. Only descriptive fields are mutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssetMaster {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

/// List filter for masters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MasterFilter {
    /// Substring matched against name and management number.
    pub q: Option<String>,
    pub genre_id: Option<LookupId>,
    pub management_category_id: Option<LookupId>,
}
