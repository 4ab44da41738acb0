//! Pagination stage and the page-selector numbering rule.

use serde::Serialize;

use crate::record::Record;

/// Rows per page in the table view.
pub const ITEMS_PER_PAGE: usize = 20;

/// Consecutive page numbers shown around the current page.
const PAGE_WINDOW: usize = 5;

/// Records on a 1-indexed page. Out-of-range pages are empty.
pub fn paginate(records: &[Record], page: usize, page_size: usize) -> Vec<Record> {
    if page == 0 || page_size == 0 {
        return Vec::new();
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= records.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(records.len());
    records[start..end].to_vec()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// One entry in the page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "lowercase")]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Page selector entries: the first and last pages as anchors, a window of
/// up to five pages centred on `current`, and an ellipsis wherever the
/// window does not touch an anchor.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let half = PAGE_WINDOW / 2;

    let mut start = current.saturating_sub(half).max(1);
    let end = (start + PAGE_WINDOW - 1).min(total);
    start = (end + 1).saturating_sub(PAGE_WINDOW).max(1);

    let mut items = Vec::with_capacity(PAGE_WINDOW + 4);
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end + 1 < total {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total));
    }
    items
}

/// Current page of the table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: usize,
    pub items_per_page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: ITEMS_PER_PAGE,
        }
    }
}

impl PaginationState {
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Jump to a page; values below 1 are raised to 1.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.max(1);
    }
}
