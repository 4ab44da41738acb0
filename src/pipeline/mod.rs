//! The tabular data pipeline: filter → sort → {paginate | export}.
//!
//! Every stage is a pure function over a record slice and returns a new
//! list. [`TableSession`] composes them in that order and holds the view
//! state (criteria, sort, page) for one table.
//!
//! | Stage      | Entry point                     |
//! |------------|---------------------------------|
//! | `filter`   | [`filter::filter`]              |
//! | `sort`     | [`sort::sort`]                  |
//! | `paginate` | [`paginate::paginate`]          |
//! | `export`   | [`export::to_export_rows`]      |

pub mod export;
pub mod filter;
pub mod paginate;
pub mod sort;

use serde::Serialize;
use tracing::debug;

use crate::record::{FunnelStage, Record};

pub use export::{EXPORT_COLUMNS, ExportRow, escape_field, escape_str, to_export_rows, write_csv};
pub use filter::{DateRange, FilterCriteria, filter};
pub use paginate::{ITEMS_PER_PAGE, PageItem, PaginationState, page_numbers, paginate, total_pages};
pub use sort::{SORTABLE_COLUMNS, SortConfig, SortDirection, is_sortable, sort};

/// Everything the table display needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub rows: Vec<Record>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub page_numbers: Vec<PageItem>,
    pub sort: SortConfig,
}

/// Records plus the view state applied to them.
#[derive(Debug, Clone, Default)]
pub struct TableSession {
    records: Vec<Record>,
    criteria: FilterCriteria,
    sort: SortConfig,
    pagination: PaginationState,
}

impl TableSession {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    /// Replace the filter criteria. Always returns to the first page.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.pagination.reset();
    }

    /// Replace the sort. The current page is kept.
    pub fn set_sort(&mut self, sort: SortConfig) {
        self.sort = sort;
    }

    /// Header click on a sortable column. The current page is kept.
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort.toggle(key);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pagination.go_to(page);
    }

    /// Filtered and sorted records, unpaginated.
    pub fn matching(&self) -> Vec<Record> {
        let filtered = filter(&self.records, &self.criteria);
        debug!(
            total = self.records.len(),
            matched = filtered.len(),
            unfiltered = self.criteria.is_empty(),
            "applied filter criteria"
        );
        sort(&filtered, &self.sort)
    }

    pub fn view(&self) -> TableView {
        let matching = self.matching();
        let per_page = self.pagination.items_per_page;
        let total_pages = total_pages(matching.len(), per_page);
        let page = self.pagination.current_page;

        TableView {
            rows: paginate(&matching, page, per_page),
            page,
            total_pages,
            filtered_count: matching.len(),
            total_count: self.records.len(),
            page_numbers: page_numbers(page, total_pages),
            sort: self.sort.clone(),
        }
    }

    /// Export rows for the full matching set, not just the visible page.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        to_export_rows(&self.matching())
    }

    /// Matching records counted per funnel stage, in funnel order.
    pub fn stage_counts(&self) -> Vec<(FunnelStage, usize)> {
        let filtered = filter(&self.records, &self.criteria);
        FunnelStage::ALL
            .iter()
            .map(|stage| {
                let count = filtered.iter().filter(|r| r.stage() == *stage).count();
                (*stage, count)
            })
            .collect()
    }
}
