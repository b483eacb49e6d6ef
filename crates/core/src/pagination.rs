//! Pagination contract shared by every list operation.

use serde::{Deserialize, Serialize};

/// Default page size for list operations.
pub const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for list operations.
pub const MAX_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
    pub order: SortOrder,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            order: SortOrder::Desc,
        }
    }
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>, order: Option<SortOrder>) -> Self {
        Self {
            limit: clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT),
            offset: clamp_offset(offset),
            order: order.unwrap_or_default(),
        }
    }

    /// Offset of the following page, or 0 once `total` is exhausted.
    pub fn next_offset(&self, total: i64) -> i64 {
        let next = self.offset + self.limit;
        if next >= total {
            0
        } else {
            next
        }
    }
}

/// A page of results plus the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub next_offset: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: i64, page: &Page) -> Self {
        Self {
            items,
            total,
            next_offset: page.next_offset(total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            next_offset: self.next_offset,
        }
    }
}

/// Clamp a user-provided limit to valid bounds. Non-positive limits fall back
/// to the default.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(max),
        _ => default,
    }
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
