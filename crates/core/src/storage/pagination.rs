//! Pagination math and payload shapes.
//!
//! Every listing operation in the API paginates the same way:
//! `current_page = skip / limit + 1` and `total_pages = ceil(total / limit)`.

use serde::{Deserialize, Serialize};

/// One page of rows plus the total row count, produced atomically by the
/// store (the count and the slice come from the same snapshot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Pagination metadata returned alongside list payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
}

impl Pagination {
    /// Computes pagination metadata for a listing.
    ///
    /// `limit` must be positive; handlers clamp it before it gets here.
    pub fn compute(total: u64, limit: u64, skip: u64) -> Self {
        Self {
            total_items: total,
            current_page: skip / limit + 1,
            total_pages: total.div_ceil(limit),
            page_size: limit,
        }
    }
}

/// A list payload with its pagination metadata, as cached and as returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Builds a paginated payload from a store page.
    pub fn from_page(page: Page<T>, limit: u64, skip: u64) -> Self {
        let pagination = Pagination::compute(page.total, limit, skip);
        Self {
            data: page.items,
            pagination,
        }
    }
}
