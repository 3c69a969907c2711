//! The table state machine tying pagination, data source, selection and
//! export together.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use tokio_util::sync::CancellationToken;

use super::DataSource;
use super::FetchStatus;
use super::Page;
use super::PageOutcome;
use super::PaginationState;
use super::Row;
use super::RowSelection;
use super::SelectionTracker;
use super::SortState;
use super::TableConfig;
use super::resolve_local;
use crate::error::Error;
use crate::error::ExportError;
use crate::export::ExportFormat;
use crate::export::Exporter;

/// Payload of the selection-change callback.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    /// Grid mapping of the current page.
    pub row_selection: RowSelection,
    /// Rows of the current page.
    pub rows: Vec<Row>,
    /// Selected rows across every visited page, in visiting order.
    pub selected_rows: Vec<Row>,
}

type RowClickFn = Box<dyn Fn(&Row) + Send + Sync>;
type SelectionChangeFn = Box<dyn Fn(&SelectionChange) + Send + Sync>;
type LoadingFn = Box<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct Callbacks {
    on_row_click: Option<RowClickFn>,
    on_row_selection_change: Option<SelectionChangeFn>,
    on_loading: Option<LoadingFn>,
}

/// Identifies one page fetch. Only the most recently issued ticket may
/// apply its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pagination: PaginationState,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }
}

/// A page fetch detached from the table, so the table can keep handling
/// events while it runs.
pub struct PendingFetch {
    ticket: FetchTicket,
    config: Arc<TableConfig>,
    source: Option<DataSource>,
}

impl PendingFetch {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    /// Resolves the page.
    pub async fn run(self) -> (FetchTicket, PageOutcome) {
        let outcome = match &self.source {
            Some(source) => source.resolve(&self.config, self.ticket.pagination).await,
            None => resolve_local(&self.config, self.ticket.pagination),
        };
        (self.ticket, outcome)
    }
}

/// A paginated, selectable table over local rows or a remote endpoint.
///
/// Events (`set_page_index`, `set_row_selection`, `click_row`, ...) mutate
/// the table; [`refresh`](Self::refresh) loads the page for the current
/// pagination. A newer fetch always wins over an older one still in
/// flight.
pub struct DataTable {
    config: Arc<TableConfig>,
    source: Option<DataSource>,
    pagination: PaginationState,
    page: Page,
    status: FetchStatus,
    redirect: Option<String>,
    row_selection: RowSelection,
    selection: SelectionTracker,
    sorting: Option<SortState>,
    generation: u64,
    loading: bool,
    cancel: CancellationToken,
    callbacks: Callbacks,
}

impl DataTable {
    /// Creates a table. Remote tables get a reqwest-backed source that
    /// follows the configured redirect links, or only reports HTTP errors
    /// when there are none; use [`with_source`](Self::with_source) to inject
    /// another fetcher or error policy.
    pub fn new(config: TableConfig) -> Result<Self, Error> {
        let source = if config.is_remote() {
            Some(DataSource::for_config(&config)?)
        } else {
            None
        };
        Self::build(config, source)
    }

    /// Creates a table resolving pages through `source`.
    pub fn with_source(config: TableConfig, source: DataSource) -> Result<Self, Error> {
        Self::build(config, Some(source))
    }

    fn build(config: TableConfig, source: Option<DataSource>) -> Result<Self, Error> {
        config.validate()?;
        let pagination = PaginationState::new(config.page_size);
        Ok(Self {
            selection: SelectionTracker::new(config.row_id_key.clone()),
            config: Arc::new(config),
            source,
            pagination,
            page: Page::empty(pagination),
            status: FetchStatus::Ok,
            redirect: None,
            row_selection: RowSelection::new(),
            sorting: None,
            generation: 0,
            loading: false,
            cancel: CancellationToken::new(),
            callbacks: Callbacks::default(),
        })
    }

    /// Creates a table and loads its first page.
    pub async fn mount(config: TableConfig) -> Result<Self, Error> {
        let mut table = Self::new(config)?;
        table.refresh().await;
        Ok(table)
    }

    /// Called with the clicked row.
    pub fn on_row_click(mut self, f: impl Fn(&Row) + Send + Sync + 'static) -> Self {
        self.callbacks.on_row_click = Some(Box::new(f));
        self
    }

    /// Called whenever the selection or the aggregate selection changes.
    pub fn on_row_selection_change(mut self, f: impl Fn(&SelectionChange) + Send + Sync + 'static) -> Self {
        self.callbacks.on_row_selection_change = Some(Box::new(f));
        self
    }

    /// Called when loading starts (`true`) and ends (`false`).
    pub fn on_loading(mut self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.callbacks.on_loading = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    /// Moves to `pagination`. Call [`refresh`](Self::refresh) to load it.
    pub fn set_pagination(&mut self, pagination: PaginationState) {
        self.pagination = PaginationState::new(pagination.page_size).with_page_index(pagination.page_index);
    }

    /// Moves to `page_index`, keeping the page size.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.set_pagination(self.pagination.with_page_index(page_index));
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.set_pagination(PaginationState::new(page_size));
    }

    /// Moves to `page_index` and loads it.
    pub async fn goto_page(&mut self, page_index: usize) -> bool {
        self.set_page_index(page_index);
        self.refresh().await
    }

    /// Starts a fetch for the current pagination and returns the work to
    /// run. Any fetch prepared earlier becomes stale.
    pub fn prepare_fetch(&mut self) -> PendingFetch {
        self.generation += 1;
        self.selection.visit(self.pagination.page_index);
        self.set_loading(true);
        PendingFetch {
            ticket: FetchTicket {
                generation: self.generation,
                pagination: self.pagination,
            },
            config: Arc::clone(&self.config),
            source: self.source.clone(),
        }
    }

    /// Applies a fetch outcome. Returns `false`, leaving the table
    /// untouched, if a newer fetch was prepared since or the table was
    /// unmounted.
    pub fn apply(&mut self, ticket: FetchTicket, outcome: PageOutcome) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if ticket.generation != self.generation {
            debug!(
                "discarding page {} of generation {} (latest is {})",
                ticket.pagination.page_index, ticket.generation, self.generation
            );
            return false;
        }

        self.page = outcome.page;
        if let Some(sort) = &self.sorting {
            self.page.sort(sort);
        }
        self.status = outcome.status;
        self.redirect = outcome.redirect;
        self.set_loading(false);

        self.row_selection = self
            .selection
            .restore(ticket.pagination.page_index, self.page.rows());
        self.notify_selection();
        true
    }

    /// Loads the page for the current pagination. Returns `true` if the
    /// outcome was applied.
    pub async fn refresh(&mut self) -> bool {
        let pending = self.prepare_fetch();
        let cancel = self.cancel.clone();
        tokio::select! {
            (ticket, outcome) = pending.run() => self.apply(ticket, outcome),
            _ = cancel.cancelled() => {
                self.set_loading(false);
                false
            }
        }
    }

    /// Cancels any in-flight fetch and stops applying outcomes.
    pub fn unmount(&mut self) {
        self.cancel.cancel();
        self.set_loading(false);
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// The loaded page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Rows of the loaded page.
    pub fn rows(&self) -> &[Row] {
        self.page.rows()
    }

    pub fn total_count(&self) -> usize {
        self.page.total_count()
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.page.total_count())
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// `true` when the last applied fetch failed or got an error status.
    pub fn is_error(&self) -> bool {
        self.status != FetchStatus::Ok
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Route the error policy asked to navigate to after the last fetch.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn sorting(&self) -> Option<&SortState> {
        self.sorting.as_ref()
    }

    /// Orders the loaded page, and every page loaded after it, by `sorting`.
    ///
    /// `None` keeps the order of later loads as served; the current page
    /// stays as it is. Selected rows stay selected wherever they move.
    pub fn set_sorting(&mut self, sorting: Option<SortState>) {
        self.sorting = sorting;
        let Some(sort) = &self.sorting else {
            return;
        };
        self.page.sort(sort);
        self.row_selection = self
            .selection
            .restore(self.pagination.page_index, self.page.rows());
        self.notify_selection();
    }

    /// Grid mapping of the current page.
    pub fn row_selection(&self) -> &RowSelection {
        &self.row_selection
    }

    /// Applies a grid selection change for the current page.
    ///
    /// Ignored while row selection is disabled.
    pub fn set_row_selection(&mut self, selection: RowSelection) {
        if !self.config.enable_row_selection {
            return;
        }
        self.selection
            .update(self.pagination.page_index, &selection, self.page.rows());
        self.row_selection = self
            .selection
            .restore(self.pagination.page_index, self.page.rows());
        self.notify_selection();
    }

    /// Flips the selection of the row at `index` on the current page.
    pub fn toggle_row(&mut self, index: usize) {
        let key = index.to_string();
        let mut selection = self.row_selection.clone();
        let selected = selection.get(&key).copied().unwrap_or(false);
        selection.insert(key, !selected);
        self.set_row_selection(selection);
    }

    /// Selected rows across every visited page, in visiting order.
    pub fn selected_rows(&self) -> Vec<Row> {
        self.selection.selected_rows()
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Reports a click on the row at `index` of the current page.
    pub fn click_row(&self, index: usize) -> Option<&Row> {
        let row = self.page.rows().get(index)?;
        if let Some(f) = &self.callbacks.on_row_click {
            f(row);
        }
        Some(row)
    }

    /// Exports the loaded page into `out_dir` and returns the written file.
    pub fn export(&self, format: ExportFormat, out_dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let options = &self.config.print_options;
        if !options.is_enabled(format) {
            return Err(ExportError::FormatDisabled(format));
        }
        Exporter::new(out_dir.as_ref()).pdf_options(options.pdf_options.clone()).export(
            format,
            &self.config.columns,
            self.page.rows(),
            &options.file_name,
        )
    }

    fn set_loading(&mut self, loading: bool) {
        if self.loading == loading {
            return;
        }
        self.loading = loading;
        if let Some(f) = &self.callbacks.on_loading {
            f(loading);
        }
    }

    fn notify_selection(&self) {
        if let Some(f) = &self.callbacks.on_row_selection_change {
            f(&SelectionChange {
                row_selection: self.row_selection.clone(),
                rows: self.page.rows().to_vec(),
                selected_rows: self.selection.selected_rows(),
            });
        }
    }
}

impl Drop for DataTable {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for DataTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("pagination", &self.pagination)
            .field("rows", &self.page.len())
            .field("total_count", &self.page.total_count())
            .field("status", &self.status)
            .field("generation", &self.generation)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::table::ColumnDef;
    use crate::table::row_selection;

    fn rows(n: i64) -> Vec<Row> {
        (1..=n)
            .map(|id| json!({ "id": id, "name": format!("item {}", id) }).as_object().cloned().unwrap())
            .collect()
    }

    fn local(n: i64, page_size: usize) -> DataTable {
        let config = TableConfig::local(vec![ColumnDef::new("name", "Name")], rows(n))
            .page_size(page_size)
            .enable_row_selection(true);
        DataTable::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_local_paging() {
        let mut table = local(3, 2);
        assert!(table.refresh().await);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.total_count(), 3);
        assert_eq!(table.page_count(), 2);
        assert!(table.goto_page(1).await);
        assert_eq!(table.rows()[0]["id"], json!(3));
    }

    #[tokio::test]
    async fn test_stale_outcome_is_discarded() {
        let mut table = local(10, 2);
        let first = table.prepare_fetch();
        table.set_page_index(3);
        let second = table.prepare_fetch();

        let (ticket, outcome) = second.run().await;
        assert!(table.apply(ticket, outcome));
        let (ticket, outcome) = first.run().await;
        assert!(!table.apply(ticket, outcome));

        assert_eq!(table.rows()[0]["id"], json!(7));
        assert!(!table.is_loading());
    }

    #[tokio::test]
    async fn test_selection_survives_navigation() {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let mut table = local(6, 2).on_row_selection_change(move |change| {
            sink.lock().unwrap().push(change.selected_rows.len());
        });

        table.refresh().await;
        table.set_row_selection(row_selection([1]));
        table.goto_page(2).await;
        assert!(table.row_selection().is_empty());
        table.toggle_row(0);
        table.goto_page(0).await;

        assert_eq!(table.row_selection(), &row_selection([1]));
        let ids: Vec<_> = table.selected_rows().iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(2), json!(5)]);
        assert_eq!(changes.lock().unwrap().last(), Some(&2));
    }

    #[tokio::test]
    async fn test_selection_ignored_when_disabled() {
        let config = TableConfig::local(vec![], rows(3));
        let mut table = DataTable::new(config).unwrap();
        table.refresh().await;
        table.set_row_selection(row_selection([0]));
        assert!(table.selected_rows().is_empty());
    }

    #[tokio::test]
    async fn test_loading_callback_pairs() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut table = local(3, 2).on_loading(move |loading| sink.lock().unwrap().push(loading));
        table.refresh().await;
        assert_eq!(*events.lock().unwrap(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_unmounted_table_applies_nothing() {
        let mut table = local(3, 2);
        let pending = table.prepare_fetch();
        table.unmount();
        let (ticket, outcome) = pending.run().await;
        assert!(!table.apply(ticket, outcome));
        assert!(table.rows().is_empty());
        assert!(!table.is_mounted());
    }

    #[test]
    fn test_click_row() {
        let clicked = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&clicked);
        let config = TableConfig::local(vec![], rows(2)).enable_pagination(false);
        let mut table = DataTable::new(config)
            .unwrap()
            .on_row_click(move |row| *sink.lock().unwrap() = Some(row["id"].clone()));
        let pending = table.prepare_fetch();
        let outcome = resolve_local(table.config(), pending.ticket().pagination());
        table.apply(pending.ticket(), outcome);

        assert!(table.click_row(1).is_some());
        assert_eq!(*clicked.lock().unwrap(), Some(json!(2)));
        assert!(table.click_row(5).is_none());
    }

    #[tokio::test]
    async fn test_selection_follows_sorted_rows() {
        let mut table = local(3, 3);
        table.refresh().await;
        table.set_row_selection(row_selection([0]));
        table.set_sorting(Some(SortState::desc("id")));

        assert_eq!(table.rows()[0]["id"], json!(3));
        assert_eq!(table.row_selection(), &row_selection([2]));
        assert_eq!(table.selected_rows()[0]["id"], json!(1));

        table.refresh().await;
        assert_eq!(table.rows()[2]["id"], json!(1));
        assert_eq!(table.row_selection(), &row_selection([2]));
    }

    #[test]
    fn test_set_page_size_resets_index() {
        let mut table = local(30, 10);
        table.set_page_index(2);
        table.set_page_size(5);
        assert_eq!(table.pagination(), PaginationState::new(5));
    }

    #[test]
    fn test_disabled_export_format() {
        let table = local(1, 1);
        let err = table.export(ExportFormat::Csv, std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, ExportError::FormatDisabled(ExportFormat::Csv)));
    }
}
