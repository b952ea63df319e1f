//! Search criteria and paginated results for post listings.

use serde::{Deserialize, Serialize};

/// Default number of posts on one page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Filter built from the attributes set on a post.
///
/// Numeric and enum fields match exactly; text fields match when the column
/// contains the given value. `None` means "do not filter on this column".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCriteria {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub status: Option<i16>,
    pub create_time: Option<i64>,
    pub update_time: Option<i64>,
    pub author_id: Option<i32>,
}

impl PostCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Which page of a result set to fetch. Pages are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        self.page * self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus enough information to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page.max(1))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
