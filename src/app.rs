//! Application controller.
//!
//! Owns the table, its data and the input collaborators, and follows the
//! caller side of the table contract: a new search or page size returns to
//! page 1, and in server-driven mode a page request triggers a re-fetch.

use std::time::Instant;

use crossterm::event::KeyEvent;
use log::{debug, info, warn};

use crate::column::ColumnError;
use crate::export::{self, ExportFormat};
use crate::handlers::{self, FormatChoice, InputOutcome, KeyAction, SizeStep};
use crate::notify::{Notifier, Toast, ToastBoard, DEFAULT_TOAST_TTL};
use crate::pagination::{self, PageControl, PaginationMode};
use crate::parser::{self, Record, TableData};
use crate::source::{filter_rows, PageQuery, RowSource};
use crate::state::{AppMode, PageSizeSelector, ServerPage};
use crate::streaming::StreamingLoader;
use crate::table::{PaginatedTable, TableView};

/// Where the rows come from.
enum Data {
    /// Every row is held here and the table pages it (client-driven)
    Local {
        data: TableData,
        /// Rows matching the current search
        filtered: Vec<Record>,
        loader: Option<StreamingLoader>,
    },
    /// One page at a time from a source (server-driven)
    Remote {
        source: Box<dyn RowSource>,
        page: ServerPage,
    },
}

pub struct App {
    name: String,
    mode: AppMode,
    input_buffer: String,
    search: String,
    page_size: PageSizeSelector,
    table: PaginatedTable<Record>,
    data: Data,
    /// Server-driven fetch waiting to run. Its search and page size are
    /// committed only once the fetch succeeds.
    pending: Option<PageQuery>,
    export_format: Option<ExportFormat>,
    notifier: Notifier,
    toasts: ToastBoard,
    should_quit: bool,
}

impl App {
    /// Client-driven app over rows already in memory.
    pub fn local(
        name: impl Into<String>,
        data: TableData,
        page_size: usize,
        notifier: Notifier,
    ) -> Result<Self, ColumnError> {
        let table = PaginatedTable::new(data.columns()?);
        let filtered = data.rows.clone();
        Ok(Self::build(
            name.into(),
            table,
            Data::Local {
                data,
                filtered,
                loader: None,
            },
            page_size,
            notifier,
        ))
    }

    /// Client-driven app fed by a background loader; shows the loading
    /// state until the loader finishes.
    pub fn streaming(
        name: impl Into<String>,
        loader: StreamingLoader,
        page_size: usize,
        notifier: Notifier,
    ) -> Result<Self, ColumnError> {
        let data = TableData::new(loader.headers().to_vec());
        let table = PaginatedTable::new(data.columns()?);
        Ok(Self::build(
            name.into(),
            table,
            Data::Local {
                data,
                filtered: Vec::new(),
                loader: Some(loader),
            },
            page_size,
            notifier,
        ))
    }

    /// Server-driven app; page 1 is requested immediately.
    pub fn remote(
        source: Box<dyn RowSource>,
        page_size: usize,
        notifier: Notifier,
    ) -> Result<Self, ColumnError> {
        let table = PaginatedTable::new(parser::record_columns(source.headers())?);
        let name = source.name().to_string();
        let mut app = Self::build(
            name,
            table,
            Data::Remote {
                source,
                page: ServerPage::default(),
            },
            page_size,
            notifier,
        );
        app.request_page(1);
        Ok(app)
    }

    fn build(
        name: String,
        table: PaginatedTable<Record>,
        data: Data,
        page_size: usize,
        mut notifier: Notifier,
    ) -> Self {
        let toasts = ToastBoard::new(notifier.subscribe(), DEFAULT_TOAST_TTL);
        Self {
            name,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            search: String::new(),
            page_size: PageSizeSelector::new(page_size),
            table,
            data,
            pending: None,
            export_format: None,
            notifier,
            toasts,
            should_quit: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page_size(&self) -> usize {
        self.page_size.current()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_server_driven(&self) -> bool {
        matches!(self.data, Data::Remote { .. })
    }

    /// True while rows are still arriving or a page fetch is pending.
    pub fn is_loading(&self) -> bool {
        match &self.data {
            Data::Local { loader, .. } => loader.is_some(),
            Data::Remote { .. } => self.pending.is_some(),
        }
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.pending.is_some()
    }

    /// Rows handed to the table: all matching rows (client-driven) or the
    /// current page (server-driven).
    pub fn table_rows(&self) -> &[Record] {
        match &self.data {
            Data::Local { filtered, .. } => filtered,
            Data::Remote { page, .. } => &page.rows,
        }
    }

    /// Total rows before search, when known.
    pub fn total_rows(&self) -> Option<usize> {
        match &self.data {
            Data::Local { data, .. } => Some(data.rows.len()),
            Data::Remote { .. } => None,
        }
    }

    /// Most recent visible toast.
    pub fn latest_toast(&self) -> Option<&Toast> {
        self.toasts.latest()
    }

    /// Build the table view for the current state.
    pub fn view(&self) -> TableView {
        let loading = self.is_loading();
        match &self.data {
            Data::Local { filtered, .. } => self.table.view(
                filtered,
                &PaginationMode::client(self.page_size.current()),
                loading,
            ),
            Data::Remote { page, .. } => self.table.view(
                &page.rows,
                &PaginationMode::server(page.current_page, page.total_pages, |_| {}),
                loading,
            ),
        }
    }

    /// Column widths sized to the rows on the visible page.
    pub fn column_widths(&self) -> Vec<u16> {
        let rows = match &self.data {
            Data::Local { filtered, .. } => self
                .table
                .visible_rows(filtered, &PaginationMode::client(self.page_size.current())),
            Data::Remote { page, .. } => page.rows.as_slice(),
        };
        self.table.columns().widths(rows)
    }

    /// Periodic work: pull streamed rows and expire toasts.
    pub fn tick(&mut self, now: Instant) {
        let mut received = false;
        let mut finished = None;
        if let Data::Local { data, loader, .. } = &mut self.data {
            if let Some(active) = loader {
                // Read completion first so rows sent just before it are drained
                let complete = active.is_complete();
                let batch = active.try_recv_batch(usize::MAX);
                received = !batch.is_empty();
                data.rows.extend(batch);
                if complete {
                    let outcome = active.join();
                    *loader = None;
                    finished = Some((data.rows.len(), outcome));
                }
            }
        }

        if received {
            self.refilter();
        }
        match finished {
            Some((count, Ok(()))) => {
                info!("loaded {} rows", count);
                self.notifier.info(format!("Loaded {} rows", count));
            }
            Some((count, Err(e))) => {
                warn!("input stopped after {} rows: {}", count, e);
                self.notifier
                    .error(format!("Input stopped after {} rows: {}", count, e));
            }
            None => {}
        }
        self.toasts.poll(now);
    }

    /// Dispatch a key event according to the current input mode.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        match self.mode {
            AppMode::Normal => {
                let total_pages = self.view_bounds().1;
                match handlers::handle_normal_mode(key, total_pages) {
                    KeyAction::None => {}
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Navigate(control) => self.navigate(control),
                    KeyAction::PageSize(step) => self.step_page_size(step),
                    KeyAction::Reload => self.reload(),
                    KeyAction::ModeChange(mode) => {
                        self.input_buffer.clear();
                        self.mode = mode;
                    }
                }
            }
            AppMode::SearchInput => match handlers::handle_text_input(key, &mut self.input_buffer) {
                InputOutcome::Editing => {}
                InputOutcome::Cancelled => self.mode = AppMode::Normal,
                InputOutcome::Submitted(text) => {
                    self.mode = AppMode::Normal;
                    self.set_search(text);
                }
            },
            AppMode::ExportFormat => match handlers::handle_export_format(key) {
                FormatChoice::Pending => {}
                FormatChoice::Cancel => self.mode = AppMode::Normal,
                FormatChoice::Chosen(format) => {
                    self.export_format = Some(format);
                    self.input_buffer = format.default_filename().to_string();
                    self.mode = AppMode::ExportFilename;
                }
            },
            AppMode::ExportFilename => {
                match handlers::handle_text_input(key, &mut self.input_buffer) {
                    InputOutcome::Editing => {}
                    InputOutcome::Cancelled => self.mode = AppMode::Normal,
                    InputOutcome::Submitted(filename) => {
                        self.mode = AppMode::Normal;
                        if !filename.is_empty() {
                            self.export_to(&filename);
                        }
                    }
                }
            }
        }
    }

    /// Current and total page as the table sees them.
    fn view_bounds(&self) -> (usize, usize) {
        match &self.data {
            Data::Local { filtered, .. } => self.table.page_bounds(
                filtered.len(),
                &PaginationMode::client(self.page_size.current()),
            ),
            Data::Remote { page, .. } => (page.current_page, page.total_pages),
        }
    }

    /// Activate a pagination control.
    pub fn navigate(&mut self, control: PageControl) {
        match &self.data {
            Data::Local { filtered, .. } => {
                let mut mode = PaginationMode::client(self.page_size.current());
                self.table.activate(control, filtered.len(), &mut mode);
            }
            Data::Remote { page, .. } => {
                let mut requested = None;
                {
                    let mut mode = PaginationMode::server(
                        page.current_page,
                        page.total_pages,
                        |p| requested = Some(p),
                    );
                    self.table.activate(control, page.rows.len(), &mut mode);
                }
                if let Some(p) = requested {
                    self.request_page(p);
                }
            }
        }
    }

    /// Apply a new search and go back to page 1.
    ///
    /// Server-driven, the search takes effect once page 1 of it arrives.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!("search set to {:?}", text);
        if self.is_server_driven() {
            self.pending = Some(PageQuery::new(text, 1, self.page_size.current()));
            return;
        }
        self.search = text;
        self.refilter();
        self.table.reset_page();
    }

    /// Recompute the rows matching the current search and keep the page
    /// counter within the result.
    fn refilter(&mut self) {
        if let Data::Local { data, filtered, .. } = &mut self.data {
            *filtered = filter_rows(&data.rows, &self.search)
                .into_iter()
                .cloned()
                .collect();
            let total = pagination::total_pages(filtered.len(), self.page_size.current());
            self.table.clamp_page(total);
        }
    }

    /// Step the page size; a change goes back to page 1.
    ///
    /// Server-driven, the new size takes effect once page 1 at that size
    /// arrives.
    pub fn step_page_size(&mut self, step: SizeStep) {
        let mut next = self.page_size.clone();
        let changed = match step {
            SizeStep::Smaller => next.decrease(),
            SizeStep::Larger => next.increase(),
        };
        if !changed {
            return;
        }
        debug!("page size now {}", next.current());
        if self.is_server_driven() {
            self.pending = Some(PageQuery::new(self.search.clone(), 1, next.current()));
        } else {
            self.page_size = next;
            self.table.reset_page();
        }
    }

    /// Fetch the current page again (server-driven only).
    pub fn reload(&mut self) {
        if let Data::Remote { page, .. } = &self.data {
            let current = page.current_page;
            self.request_page(current);
        }
    }

    /// Queue a server-driven fetch; the table shows its loading state until
    /// [`App::run_pending_fetch`] completes it.
    fn request_page(&mut self, page: usize) {
        if self.is_server_driven() {
            self.pending = Some(PageQuery::new(
                self.search.clone(),
                page,
                self.page_size.current(),
            ));
        }
    }

    /// Run the queued fetch, if any.
    ///
    /// On success the query's search and page size become current. On
    /// failure the previous page, search and page size stay in place and an
    /// error toast is published.
    pub fn run_pending_fetch(&mut self) {
        let Some(query) = self.pending.take() else {
            return;
        };
        let Data::Remote { source, page } = &mut self.data else {
            return;
        };

        match source.fetch(&query) {
            Ok(result) => {
                let total_pages = result.total_pages.unwrap_or(1).max(1);
                *page = ServerPage {
                    current_page: query.page,
                    total_pages,
                    rows: result.rows,
                };
                self.page_size.select(query.page_size);
                self.search = query.search;
            }
            Err(e) => {
                warn!("fetching page {} failed: {}", query.page, e);
                self.notifier
                    .error(format!("Failed to load page {}: {}", query.page, e));
            }
        }
    }

    /// Export the rows under the table to `filename`.
    fn export_to(&mut self, filename: &str) {
        let Some(format) = self.export_format.take() else {
            return;
        };
        let result = export::export_rows(self.table.columns(), self.table_rows(), format)
            .and_then(|content| export::save_to_file(&content, filename));
        match result {
            Ok(()) => {
                info!("exported {} rows to {}", self.table_rows().len(), filename);
                self.notifier.success(format!("Exported to {}", filename));
            }
            Err(e) => {
                warn!("export failed: {}", e);
                self.notifier.error(e.to_string());
            }
        }
    }

    /// Tear down: disposes the notification channel.
    pub fn shutdown(self) {
        self.notifier.dispose();
    }
}
