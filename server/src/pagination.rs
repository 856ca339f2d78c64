//! Page/per-page normalization shared by the admin list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MIN_PER_PAGE: i64 = 5;
pub const MAX_PER_PAGE: i64 = 100;

/// Query parameters accepted by paginated listings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    /// Clamp raw query values: page is at least 1, per-page is clamped into
    /// `[MIN_PER_PAGE, MAX_PER_PAGE]` and defaults to `DEFAULT_PER_PAGE`.
    #[must_use]
    pub fn from_query(query: PageQuery) -> Self {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(MIN_PER_PAGE, MAX_PER_PAGE);
        Self { page, per_page }
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Envelope wrapping a page of items with totals.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(items: Vec<T>, page: Page, total_items: i64) -> Self {
        Self {
            items,
            page: page.page,
            per_page: page.per_page,
            total_items,
            total_pages: total_pages(total_items, page.per_page),
        }
    }
}

/// Ceiling division; an empty result set still reports one page.
#[must_use]
pub fn total_pages(total_items: i64, per_page: i64) -> i64 {
    if total_items <= 0 {
        return 1;
    }
    (total_items + per_page - 1) / per_page
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
