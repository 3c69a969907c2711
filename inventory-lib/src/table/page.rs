//! Page type for table results.

use std::fmt;

use serde_json::Map;
use serde_json::Value;

use super::PaginationState;
use super::SortState;

/// A table row: accessor key to JSON value.
pub type Row = Map<String, Value>;

/// Identity of a row for selection bookkeeping.
///
/// Rows carrying the configured id field are keyed by its value, so they
/// keep their identity across sorting and refetches. Rows without one fall
/// back to their position on the page they were loaded on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    /// Value of the id field, rendered as text.
    Id(String),
    /// Page-local position.
    Position { page_index: usize, index: usize },
}

impl RowKey {
    /// Resolves the key of `row`, found at `index` on page `page_index`.
    pub fn of(row: &Row, id_key: &str, page_index: usize, index: usize) -> Self {
        match row.get(id_key) {
            Some(Value::String(id)) => Self::Id(id.clone()),
            Some(Value::Number(id)) => Self::Id(id.to_string()),
            _ => Self::Position { page_index, index },
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Position { page_index, index } => write!(f, "#{}:{}", page_index, index),
        }
    }
}

/// One page of table rows with the pagination it was loaded for.
///
/// Pages are transient: every pagination change replaces the page
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    rows: Vec<Row>,
    pagination: PaginationState,
    /// Total row count across all pages.
    total_count: usize,
}

impl Page {
    /// Creates a page whose total count is its own length.
    pub fn new(rows: Vec<Row>, pagination: PaginationState) -> Self {
        let total_count = rows.len();
        Self {
            rows,
            pagination,
            total_count,
        }
    }

    /// An empty page with a total count of zero.
    pub fn empty(pagination: PaginationState) -> Self {
        Self::new(Vec::new(), pagination)
    }

    /// Sets the total row count.
    pub fn with_total_count(mut self, count: usize) -> Self {
        self.total_count = count;
        self
    }

    /// Returns a reference to the rows in this page.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Reorders the rows in place.
    pub fn sort(&mut self, sort: &SortState) {
        sort.apply(&mut self.rows);
    }

    /// Consumes the page and returns the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns the pagination this page was loaded for.
    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    /// Returns the total row count across all pages.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the number of pages implied by the total count.
    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.total_count)
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if a later page exists.
    pub fn has_more(&self) -> bool {
        self.pagination.page_index + 1 < self.page_count()
    }
}
