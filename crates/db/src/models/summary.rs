//! Inventory summary counts.

use serde::Serialize;
use sqlx::FromRow;
use stockroom_core::stock::LookupId;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status_id: LookupId,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenreCount {
    pub genre_id: LookupId,
    pub name: String,
    pub count: i64,
}

/// Totals across the whole catalog.
#[derive(Debug, Clone, Serialize)]
pub struct InventorySummary {
    pub total_masters: i64,
    pub by_status: Vec<StatusCount>,
    pub by_genre: Vec<GenreCount>,
}
