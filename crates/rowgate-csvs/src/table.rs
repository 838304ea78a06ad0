//! Pagination state for displaying accepted rows.

use std::ops::Range;

/// Rows-per-page choices offered to the user
pub const PAGE_SIZE_OPTIONS: [usize; 2] = [5, 10];

pub const DEFAULT_ROWS_PER_PAGE: usize = PAGE_SIZE_OPTIONS[0];

/// Zero-based page index plus page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    rows_per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Number of pages for `total` rows; an empty table still has one page
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.rows_per_page).max(1)
    }

    /// Move to `page`, clamped to the last page
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.page = page.min(self.page_count(total) - 1);
    }

    /// Change the page size and go back to the first page; unknown sizes are ignored
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> bool {
        if !PAGE_SIZE_OPTIONS.contains(&rows_per_page) {
            return false;
        }
        self.rows_per_page = rows_per_page;
        self.page = 0;
        true
    }

    /// Index range of the current page within `total` rows
    pub fn page_range(&self, total: usize) -> Range<usize> {
        let start = (self.page * self.rows_per_page).min(total);
        let end = (start + self.rows_per_page).min(total);
        start..end
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }
}
