//! Table controller.
//!
//! Owns the view state of one table (page, size, search text, order,
//! expanded detail rows, selection) and calls the caller's render callback
//! exactly once for every transition that needs new rows. Rows come back
//! through [`TableController::set_data`].

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::GridError;

use super::column::{Column, Device};
use super::config::TableConfig;
use super::options::{LoadMoreState, PageSize, SortDirection, TableMode, TableOptions};
use super::order::{OrderState, SortMarker};
use super::pagination::{ELLIPSIS, compute_buttons, total_pages};
use super::row::TableRow;
use super::selection::{HeaderCheck, SelectionSet};

/// Called with the parameters of every fetch the caller has to perform.
pub type RenderCallback = Box<dyn FnMut(&TableOptions) + Send>;

/// Called with the whole selection after every selection change.
pub type CheckBoxCallback<K> = Box<dyn FnMut(&[K]) + Send>;

/// What the table body should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No rows yet and a request is in flight.
    Loading,
    /// No rows and nothing loading.
    Empty,
    Rows,
}

/// Outcome of clicking a body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellClick {
    /// The column is a copy column; the text should go to the clipboard.
    Copy(String),
    /// The detail panel of the row was toggled; `true` when now open.
    Detail(bool),
    Ignored,
}

/// State machine behind a paginated or load-more data table.
///
/// # Example
///
/// ```ignore
/// let mut table = TableController::new(columns, TableConfig::new())
///     .on_render(move |options| requests.lock().unwrap().push(options.clone()));
///
/// table.mount();                 // first fetch, default order
/// table.set_data(rows, 240);     // caller delivers page 1
/// table.go_to_page(3)?;          // second fetch
/// ```
pub struct TableController<R: TableRow> {
    columns: Vec<Column<R>>,
    config: TableConfig,
    page: usize,
    page_size: PageSize,
    search: String,
    /// `None` until first activation.
    order: Option<OrderState>,
    /// Fingerprint of the last filter passed to `set_filter`.
    filter: Option<u64>,
    items: Vec<R>,
    total: usize,
    loading: bool,
    load_more: LoadMoreState,
    /// Row indices with an open detail panel.
    details: HashSet<usize>,
    selection: SelectionSet<R::Key>,
    device: Device,
    on_render: Option<RenderCallback>,
    on_check_box: Option<CheckBoxCallback<R::Key>>,
}

impl<R: TableRow> TableController<R> {
    pub fn new(columns: Vec<Column<R>>, config: TableConfig) -> Self {
        Self {
            columns,
            page: 1,
            page_size: config.page_size,
            search: String::new(),
            order: None,
            filter: None,
            items: Vec::new(),
            total: 0,
            loading: false,
            load_more: LoadMoreState::default(),
            details: HashSet::new(),
            selection: SelectionSet::new(),
            device: config.device,
            config,
            on_render: None,
            on_check_box: None,
        }
    }

    /// Set the fetch callback.
    pub fn on_render<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TableOptions) + Send + 'static,
    {
        self.on_render = Some(Box::new(f));
        self
    }

    /// Set the selection callback.
    pub fn on_check_box<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[R::Key]) + Send + 'static,
    {
        self.on_check_box = Some(Box::new(f));
        self
    }

    /// Start from a selection the caller already holds.
    pub fn with_selection(mut self, ids: impl IntoIterator<Item = R::Key>) -> Self {
        self.selection = SelectionSet::with_ids(ids);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn mode(&self) -> TableMode {
        self.config.mode
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_more_state(&self) -> LoadMoreState {
        self.load_more
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Whether the first activation has happened.
    pub fn is_mounted(&self) -> bool {
        self.order.is_some()
    }

    /// Header sort markers, empty before the first activation.
    pub fn order_markers(&self) -> &[Option<SortMarker>] {
        self.order.as_ref().map(OrderState::markers).unwrap_or(&[])
    }

    pub fn current_order(&self) -> Option<(String, SortDirection)> {
        self.order.as_ref().and_then(OrderState::active)
    }

    /// Parameters of the current view.
    pub fn options(&self) -> TableOptions {
        TableOptions {
            page: self.page,
            length: self.page_size,
            search: self.search.clone(),
            order: self.current_order(),
        }
    }

    pub fn view_state(&self) -> ViewState {
        if !self.items.is_empty() {
            ViewState::Rows
        } else if self.loading {
            ViewState::Loading
        } else {
            ViewState::Empty
        }
    }

    // -------------------------------------------------------------------------
    // Caller input
    // -------------------------------------------------------------------------

    /// Deliver rows for the last requested page.
    ///
    /// Replaces the rows, except in load-more mode past page 1 where they
    /// are appended. In load-more mode the affordance is derived from
    /// `total`; [`set_load_more`](Self::set_load_more) overrides it.
    pub fn set_data(&mut self, items: Vec<R>, total: usize) {
        let append = self.config.mode == TableMode::LoadMore && self.page > 1;
        if append {
            self.items.extend(items);
        } else {
            self.items = items;
            self.details.clear();
        }
        self.total = total;

        if self.config.mode == TableMode::LoadMore {
            self.load_more = if self.items.len() < total {
                LoadMoreState::Available
            } else {
                LoadMoreState::Exhausted
            };
        }
        log::debug!(
            "[table] rows {}: {} shown of {}",
            if append { "appended" } else { "replaced" },
            self.items.len(),
            total
        );
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_load_more(&mut self, state: LoadMoreState) {
        self.load_more = state;
    }

    /// Change the responsive tier. Does not fetch.
    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    /// External refresh signal.
    ///
    /// Drops the loaded rows and resets page and search text. Does not fetch;
    /// pair it with [`filter_changed`](Self::filter_changed).
    pub fn refresh(&mut self) {
        self.items.clear();
        self.details.clear();
        self.page = 1;
        self.search.clear();
        log::debug!("[table] refreshed");
    }

    // -------------------------------------------------------------------------
    // Render-triggering transitions
    // -------------------------------------------------------------------------

    /// First activation. Same as the first [`filter_changed`](Self::filter_changed).
    pub fn mount(&mut self) {
        self.filter_changed();
    }

    /// Hand the controller the caller's current filter value.
    ///
    /// Refetches through [`filter_changed`](Self::filter_changed) only when
    /// the value differs from the previous one, or on first activation.
    /// Returns whether a fetch was requested.
    pub fn set_filter<F: Hash + ?Sized>(&mut self, filter: &F) -> bool {
        let mut hasher = DefaultHasher::new();
        filter.hash(&mut hasher);
        let fingerprint = hasher.finish();

        if self.order.is_some() && self.filter == Some(fingerprint) {
            log::trace!("[table] filter unchanged");
            return false;
        }
        self.filter = Some(fingerprint);
        self.filter_changed();
        true
    }

    /// Refetch page 1 unconditionally, keeping size, search text and order.
    ///
    /// Use after the underlying data changed while the filter did not. On
    /// the first call the order is seeded from the configured default.
    pub fn filter_changed(&mut self) {
        if self.order.is_none() {
            self.order = Some(OrderState::new(
                &self.columns,
                self.config.default_order.as_ref(),
            ));
            log::debug!("[table] first activation");
        }
        self.reset_to_first_page();
        self.fetch();
    }

    /// Update the search box text without fetching.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Search submit: fetch page 1 with the current text.
    pub fn submit_search(&mut self) {
        self.reset_to_first_page();
        self.fetch();
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.reset_to_first_page();
        self.fetch();
    }

    /// Navigate to `page` in pagination mode.
    ///
    /// Returns `Ok(false)` for the ellipsis label, which has no action.
    pub fn go_to_page(&mut self, page: usize) -> Result<bool, GridError> {
        self.require_mode(TableMode::Pagination)?;
        if page == ELLIPSIS {
            return Ok(false);
        }
        let total_pages = self.total_pages();
        if page > total_pages.max(1) {
            return Err(GridError::PageOutOfRange { page, total_pages });
        }

        self.page = page;
        self.details.clear();
        self.fetch();
        Ok(true)
    }

    pub fn next_page(&mut self) -> Result<bool, GridError> {
        self.require_mode(TableMode::Pagination)?;
        if self.page >= self.total_pages() {
            return Ok(false);
        }
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> Result<bool, GridError> {
        self.require_mode(TableMode::Pagination)?;
        if self.page <= 1 {
            return Ok(false);
        }
        self.go_to_page(self.page - 1)
    }

    /// Fetch the next page in load-more mode.
    ///
    /// Returns `Ok(false)` while loading or when there is nothing more.
    pub fn load_more(&mut self) -> Result<bool, GridError> {
        self.require_mode(TableMode::LoadMore)?;
        if self.loading || self.load_more != LoadMoreState::Available {
            return Ok(false);
        }
        self.page += 1;
        self.fetch();
        Ok(true)
    }

    /// Header click on the column at `index`.
    ///
    /// Refetches the current page with the new order. In load-more mode the
    /// accumulated rows would mix two orders, so it restarts at page 1.
    pub fn click_header(&mut self, index: usize) -> Result<(String, SortDirection), GridError> {
        let order = self
            .order
            .get_or_insert_with(|| OrderState::new(&self.columns, self.config.default_order.as_ref()));
        let active = order.toggle(index)?;

        if self.config.mode == TableMode::LoadMore {
            self.reset_to_first_page();
        } else {
            self.details.clear();
        }
        self.fetch();
        Ok(active)
    }

    fn require_mode(&self, mode: TableMode) -> Result<(), GridError> {
        if self.config.mode == mode {
            Ok(())
        } else {
            Err(GridError::WrongMode(mode.as_str()))
        }
    }

    fn reset_to_first_page(&mut self) {
        self.page = 1;
        self.details.clear();
        if self.config.mode == TableMode::LoadMore {
            self.items.clear();
        }
    }

    fn fetch(&mut self) {
        let options = self.options();
        log::debug!(
            "[table] fetch page={} length={} search={:?} order={:?}",
            options.page,
            options.length,
            options.search,
            options.order
        );
        if let Some(on_render) = self.on_render.as_mut() {
            on_render(&options);
        }
    }

    // -------------------------------------------------------------------------
    // Pager
    // -------------------------------------------------------------------------

    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size.get())
    }

    /// Page-button labels; `0` is an inert ellipsis.
    pub fn page_buttons(&self) -> Vec<usize> {
        compute_buttons(self.page, self.total_pages(), self.config.max_buttons)
    }

    /// `(first, last, total)` for the "showing x to y of z" line.
    pub fn entry_range(&self) -> (usize, usize, usize) {
        if self.items.is_empty() {
            return (0, 0, 0);
        }
        match self.config.mode {
            TableMode::Pagination => {
                let offset = self.options().offset();
                (offset + 1, offset + self.items.len(), self.total)
            }
            TableMode::LoadMore => (1, self.items.len(), self.total),
        }
    }

    // -------------------------------------------------------------------------
    // Columns and detail panels
    // -------------------------------------------------------------------------

    /// Columns in the primary row on the current device, with their indices.
    pub fn visible_columns(&self) -> Vec<(usize, &Column<R>)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.shown_on(self.device))
            .collect()
    }

    /// Columns only reachable through the detail panel.
    pub fn detail_columns(&self) -> Vec<(usize, &Column<R>)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.shown_on(self.device))
            .collect()
    }

    pub fn has_detail(&self) -> bool {
        self.columns.iter().any(|c| !c.shown_on(self.device))
    }

    fn primary_column(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.shown_on(self.device))
    }

    /// Display text of one cell.
    pub fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        let item = self.items.get(row)?;
        self.columns.get(column).map(|c| c.text(item))
    }

    pub fn is_detail_open(&self, row: usize) -> bool {
        self.details.contains(&row)
    }

    /// Toggle the detail panel of `row`. Rows are independent.
    pub fn toggle_detail(&mut self, row: usize) -> Result<bool, GridError> {
        if row >= self.items.len() {
            return Err(GridError::UnknownRow(row));
        }
        let open = if self.details.remove(&row) {
            false
        } else {
            self.details.insert(row);
            true
        };
        Ok(open)
    }

    /// Body cell click.
    ///
    /// Copy columns yield their text. The primary column toggles the detail
    /// panel when there is anything to reveal.
    pub fn click_cell(&mut self, row: usize, column: usize) -> Result<CellClick, GridError> {
        let item = self.items.get(row).ok_or(GridError::UnknownRow(row))?;
        let target = self.columns.get(column).ok_or(GridError::UnknownColumn(column))?;
        if target.copy {
            return Ok(CellClick::Copy(target.text(item)));
        }
        if self.primary_column() == Some(column) && self.has_detail() {
            return self.toggle_detail(row).map(CellClick::Detail);
        }
        Ok(CellClick::Ignored)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selected(&self) -> &[R::Key] {
        self.selection.ids()
    }

    pub fn bulk_enabled(&self) -> bool {
        !self.selection.is_empty()
    }

    fn visible_keys(&self) -> Vec<R::Key> {
        self.items.iter().filter_map(|item| item.key()).collect()
    }

    /// Checkbox of one row; `None` for rows without a key.
    pub fn row_checkbox(&self, row: usize) -> Option<bool> {
        let key = self.items.get(row)?.key()?;
        Some(self.selection.is_selected(&key))
    }

    pub fn header_checkbox(&self) -> HeaderCheck {
        let keys = self.visible_keys();
        self.selection.header_check(keys.iter())
    }

    /// Toggle one key. Returns whether it is selected afterwards.
    pub fn toggle_one(&mut self, key: R::Key) -> bool {
        let selected = self.selection.toggle_one(key);
        self.notify_selection();
        selected
    }

    /// Select or deselect every loaded row.
    pub fn toggle_all(&mut self) -> bool {
        let keys = self.visible_keys();
        let selected = self.selection.toggle_all(keys.iter());
        self.notify_selection();
        selected
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.notify_selection();
    }

    fn notify_selection(&mut self) {
        log::debug!("[table] selection now {} rows", self.selection.len());
        if let Some(on_check_box) = self.on_check_box.as_mut() {
            on_check_box(self.selection.ids());
        }
    }
}

impl<R: TableRow + fmt::Debug> fmt::Debug for TableController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("mode", &self.config.mode)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("search", &self.search)
            .field("order", &self.current_order())
            .field("items", &self.items.len())
            .field("total", &self.total)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}
