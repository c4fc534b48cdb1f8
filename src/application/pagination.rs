//! Offset pagination helpers.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: usize = 50;
pub const MAX_PAGE_LIMIT: usize = 100;

/// A normalized `[offset, offset + limit)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageWindow {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl PageWindow {
    /// Build a window from raw request values: missing values take their
    /// defaults, negatives become zero and `limit` is capped at
    /// [`MAX_PAGE_LIMIT`].
    pub fn from_raw(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit
            .map(non_negative)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);
        let offset = offset.map(non_negative).unwrap_or(0);
        Self { limit, offset }
    }

    /// Slice `items`, returning the page together with the pre-pagination total.
    pub fn apply<T>(&self, items: Vec<T>) -> OffsetPage<T> {
        let total = items.len();
        let items = items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();
        OffsetPage {
            items,
            total,
            limit: self.limit,
            offset: self.offset,
            has_more: self.has_more(total),
        }
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.offset.saturating_add(self.limit) < total
    }
}

fn non_negative(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

/// One page of an offset-paginated result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}
