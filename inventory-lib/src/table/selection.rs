//! Row selection that survives pagination.

use std::collections::BTreeMap;
use std::collections::HashSet;

use super::Row;
use super::RowKey;

/// Grid selection mapping: page-local row index (as a string) to selected.
pub type RowSelection = BTreeMap<String, bool>;

/// Builds a [`RowSelection`] marking `indexes` as selected.
pub fn row_selection(indexes: impl IntoIterator<Item = usize>) -> RowSelection {
    indexes.into_iter().map(|i| (i.to_string(), true)).collect()
}

/// Selected rows remembered for one visited page.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRecord {
    page_index: usize,
    selected: Vec<(RowKey, Row)>,
}

impl SelectionRecord {
    fn new(page_index: usize) -> Self {
        Self {
            page_index,
            selected: Vec::new(),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Keys of the selected rows, in page order.
    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.selected.iter().map(|(key, _)| key)
    }

    /// The selected rows as they were when last materialized.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.selected.iter().map(|(_, row)| row)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Cross-page selection bookkeeping.
///
/// One [`SelectionRecord`] per visited page, kept in visiting order for the
/// lifetime of the tracker. Rows are identified by [`RowKey`], so the
/// selection is restored onto a page by identity rather than by position.
/// A row is held by at most one record: the page that last displayed it.
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    id_key: String,
    records: Vec<SelectionRecord>,
}

impl SelectionTracker {
    /// Creates a tracker identifying rows by the `id_key` field.
    pub fn new(id_key: impl Into<String>) -> Self {
        Self {
            id_key: id_key.into(),
            records: Vec::new(),
        }
    }

    /// Records a visit to `page_index`. Returns `true` on the first visit.
    pub fn visit(&mut self, page_index: usize) -> bool {
        if self.record(page_index).is_some() {
            return false;
        }
        self.records.push(SelectionRecord::new(page_index));
        true
    }

    /// The record of `page_index`, if visited.
    pub fn record(&self, page_index: usize) -> Option<&SelectionRecord> {
        self.records.iter().find(|r| r.page_index == page_index)
    }

    /// All records in visiting order.
    pub fn records(&self) -> &[SelectionRecord] {
        &self.records
    }

    fn keys_of(&self, rows: &[Row], page_index: usize) -> Vec<RowKey> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| RowKey::of(row, &self.id_key, page_index, i))
            .collect()
    }

    /// Applies a grid selection change on `page_index`, whose loaded rows
    /// are `rows`.
    ///
    /// Indexes that are not numeric or fall outside `rows` are ignored. Rows
    /// shown on this page are dropped from every other record.
    pub fn update(&mut self, page_index: usize, selection: &RowSelection, rows: &[Row]) {
        self.visit(page_index);
        let keys = self.keys_of(rows, page_index);

        let mut indexes: Vec<usize> = selection
            .iter()
            .filter(|(_, selected)| **selected)
            .filter_map(|(index, _)| index.parse::<usize>().ok())
            .filter(|i| *i < rows.len())
            .collect();
        indexes.sort_unstable();
        indexes.dedup();

        let selected: Vec<(RowKey, Row)> = indexes
            .into_iter()
            .map(|i| (keys[i].clone(), rows[i].clone()))
            .collect();

        let on_page: HashSet<&RowKey> = keys.iter().collect();
        for record in &mut self.records {
            if record.page_index == page_index {
                record.selected = selected.clone();
            } else {
                record.selected.retain(|(key, _)| !on_page.contains(key));
            }
        }
    }

    /// Grid mapping for `page_index` now showing `rows`: every position
    /// whose row is held by any record is marked selected.
    pub fn restore(&self, page_index: usize, rows: &[Row]) -> RowSelection {
        let held: HashSet<&RowKey> = self.records.iter().flat_map(|r| r.keys()).collect();
        self.keys_of(rows, page_index)
            .iter()
            .enumerate()
            .filter(|(_, key)| held.contains(key))
            .map(|(i, _)| (i.to_string(), true))
            .collect()
    }

    /// Every selected row across visited pages, in visiting order.
    pub fn selected_rows(&self) -> Vec<Row> {
        self.records.iter().flat_map(|r| r.rows().cloned()).collect()
    }

    /// Number of selected rows across visited pages.
    pub fn selected_count(&self) -> usize {
        self.records.iter().map(SelectionRecord::len).sum()
    }

    /// Forgets every selection but keeps the visited pages.
    pub fn clear(&mut self) {
        for record in &mut self.records {
            record.selected.clear();
        }
    }
}
