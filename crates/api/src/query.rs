//! Shared query parameter types for API handlers.

use serde::Deserialize;
use stockroom_core::pagination::{Page, SortOrder};

/// Pagination parameters (`?limit=&offset=&order=`).
///
/// Values are clamped when converted into a [`Page`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order: Option<SortOrder>,
}

impl PaginationParams {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset, self.order)
    }
}
