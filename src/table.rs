//! Paginated table component.
//!
//! `PaginatedTable` turns a column set, a row slice and a pagination mode
//! into a `TableView` (header, body, optional pagination bar), and applies
//! pagination controls. It performs no I/O and never fails.

use log::debug;
use ratatui::text::Line;

use crate::column::Columns;
use crate::pagination::{self, PageBar, PageControl, PaginationMode};

/// Body text shown while the caller is loading rows.
pub const LOADING_MESSAGE: &str = "Loading…";
/// Body text shown when the visible page has no rows.
pub const EMPTY_MESSAGE: &str = "No records found.";

/// Table body for one render.
#[derive(Clone, Debug, PartialEq)]
pub enum TableBody {
    /// Single full-width loading row
    Loading,
    /// Single full-width empty-state row
    Empty,
    /// One entry per visible record, one cell per column
    Rows(Vec<Vec<Line<'static>>>),
}

impl TableBody {
    /// Message of a single full-width row, if the body is one.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            TableBody::Loading => Some(LOADING_MESSAGE),
            TableBody::Empty => Some(EMPTY_MESSAGE),
            TableBody::Rows(_) => None,
        }
    }

    /// Number of data rows (0 for message bodies).
    pub fn row_count(&self) -> usize {
        match self {
            TableBody::Rows(rows) => rows.len(),
            _ => 0,
        }
    }
}

/// Everything needed to draw the table once.
#[derive(Clone, Debug, PartialEq)]
pub struct TableView {
    pub header: Vec<Line<'static>>,
    pub body: TableBody,
    /// Present only when there is more than one page
    pub pager: Option<PageBar>,
    pub current_page: usize,
    pub total_pages: usize,
}

/// Table with dual pagination modes.
///
/// In client-driven mode the table owns the page counter, which starts at 1
/// when the table is created and is not reset when rows change; callers that
/// want a reset (new search, new page size) call [`PaginatedTable::reset_page`],
/// and callers whose rows shrink call [`PaginatedTable::clamp_page`].
#[derive(Debug)]
pub struct PaginatedTable<T> {
    columns: Columns<T>,
    current_page: usize,
}

impl<T> PaginatedTable<T> {
    pub fn new(columns: Columns<T>) -> Self {
        Self {
            columns,
            current_page: 1,
        }
    }

    pub fn columns(&self) -> &Columns<T> {
        &self.columns
    }

    /// Client-driven page counter (1-based).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Return the client-driven page counter to page 1.
    pub fn reset_page(&mut self) {
        self.current_page = 1;
    }

    /// Pull the client-driven page counter back to `total_pages` if it is
    /// past the end.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.current_page = self.current_page.min(total_pages.max(1));
    }

    /// Current and total page for the given mode.
    pub fn page_bounds(&self, row_count: usize, mode: &PaginationMode<'_>) -> (usize, usize) {
        match mode {
            PaginationMode::Server(server) => (server.current_page(), server.total_pages()),
            PaginationMode::Client(client) => (
                self.current_page,
                pagination::total_pages(row_count, client.items_per_page),
            ),
        }
    }

    /// Rows on the visible page.
    ///
    /// Server-driven rows are already a single page and are returned as-is.
    pub fn visible_rows<'r>(&self, rows: &'r [T], mode: &PaginationMode<'_>) -> &'r [T] {
        match mode {
            PaginationMode::Server(_) => rows,
            PaginationMode::Client(client) => {
                pagination::page_slice(rows, self.current_page, client.items_per_page)
            }
        }
    }

    /// Build the view for one render.
    ///
    /// Loading takes priority over an empty page. The pagination bar follows
    /// the page bounds regardless of the body.
    pub fn view(&self, rows: &[T], mode: &PaginationMode<'_>, loading: bool) -> TableView {
        let (current_page, total_pages) = self.page_bounds(rows.len(), mode);
        let visible = self.visible_rows(rows, mode);

        let body = if loading {
            TableBody::Loading
        } else if visible.is_empty() {
            TableBody::Empty
        } else {
            TableBody::Rows(visible.iter().map(|row| self.columns.render_row(row)).collect())
        };

        TableView {
            header: self.columns.headers(),
            body,
            pager: PageBar::new(current_page, total_pages),
            current_page,
            total_pages,
        }
    }

    /// Apply a pagination control.
    ///
    /// Disabled controls (previous on page 1, next on the last page, pages
    /// that do not exist) do nothing. In client-driven mode the page counter
    /// moves; in server-driven mode the target page is handed to the
    /// caller's callback and nothing here changes.
    ///
    /// Returns true if navigation happened.
    pub fn activate(
        &mut self,
        control: PageControl,
        row_count: usize,
        mode: &mut PaginationMode<'_>,
    ) -> bool {
        let (current_page, total_pages) = self.page_bounds(row_count, mode);
        let Some(target) = control.target(current_page, total_pages) else {
            debug!(
                "ignored {:?} on page {}/{}",
                control, current_page, total_pages
            );
            return false;
        };

        match mode {
            PaginationMode::Server(server) => {
                debug!("requesting page {} of {}", target, total_pages);
                server.request(target);
            }
            PaginationMode::Client(_) => {
                debug!("moving to page {} of {}", target, total_pages);
                self.current_page = target;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    fn numbers_table() -> PaginatedTable<u32> {
        let columns = Columns::new(vec![
            Column::new("n", "N", |n: &u32| n.to_string()),
            Column::new("square", "N²", |n: &u32| (n * n).to_string()),
        ])
        .unwrap();
        PaginatedTable::new(columns)
    }

    fn first_cells(view: &TableView) -> Vec<String> {
        match &view.body {
            TableBody::Rows(rows) => rows.iter().map(|r| r[0].to_string()).collect(),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_new_table_starts_on_first_page() {
        let table = numbers_table();
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_client_view_slices() {
        let table = numbers_table();
        let rows: Vec<u32> = (1..=15).collect();
        let view = table.view(&rows, &PaginationMode::client(10), false);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.body.row_count(), 10);
        assert_eq!(first_cells(&view)[0], "1");
    }

    #[test]
    fn test_cells_follow_column_order() {
        let table = numbers_table();
        let view = table.view(&[3], &PaginationMode::client(10), false);
        match view.body {
            TableBody::Rows(rows) => {
                let cells: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
                assert_eq!(cells, vec!["3", "9"]);
            }
            other => panic!("expected rows, got {:?}", other),
        }
        let headers: Vec<String> = view.header.iter().map(|h| h.to_string()).collect();
        assert_eq!(headers, vec!["N", "N²"]);
    }

    #[test]
    fn test_loading_wins_over_empty() {
        let table = numbers_table();
        let view = table.view(&[], &PaginationMode::client(10), true);
        assert_eq!(view.body, TableBody::Loading);
        assert_eq!(view.body.message(), Some(LOADING_MESSAGE));
    }

    #[test]
    fn test_client_navigation_moves_counter() {
        let mut table = numbers_table();
        let mut mode = PaginationMode::client(10);
        assert!(table.activate(PageControl::Next, 25, &mut mode));
        assert_eq!(table.current_page(), 2);
        assert!(table.activate(PageControl::Page(3), 25, &mut mode));
        assert_eq!(table.current_page(), 3);
        assert!(!table.activate(PageControl::Next, 25, &mut mode));
        assert_eq!(table.current_page(), 3);
        assert!(table.activate(PageControl::Previous, 25, &mut mode));
        assert_eq!(table.current_page(), 2);
    }

    #[test]
    fn test_reset_page() {
        let mut table = numbers_table();
        let mut mode = PaginationMode::client(5);
        table.activate(PageControl::Page(4), 20, &mut mode);
        table.reset_page();
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_counter_survives_shrinking_rows() {
        let mut table = numbers_table();
        let mut mode = PaginationMode::client(10);
        let rows: Vec<u32> = (1..=30).collect();
        table.activate(PageControl::Page(3), rows.len(), &mut mode);

        // Rows shrink to one page; page 3 is now past the end
        let view = table.view(&rows[..5], &mode, false);
        assert_eq!(view.current_page, 3);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.body, TableBody::Empty);
        assert!(view.pager.is_none());
    }

    #[test]
    fn test_clamp_page_pulls_counter_back() {
        let mut table = numbers_table();
        let mut mode = PaginationMode::client(10);
        let rows: Vec<u32> = (1..=30).collect();
        table.activate(PageControl::Page(3), rows.len(), &mut mode);

        table.clamp_page(2);
        assert_eq!(table.current_page(), 2);
        let view = table.view(&rows[..15], &mode, false);
        assert_eq!(first_cells(&view), vec!["11", "12", "13", "14", "15"]);

        // Within bounds and zero pages
        table.clamp_page(5);
        assert_eq!(table.current_page(), 2);
        table.clamp_page(0);
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_server_navigation_does_not_touch_counter() {
        let mut table = numbers_table();
        let mut requested = Vec::new();
        {
            let mut mode = PaginationMode::server(2, 4, |p| requested.push(p));
            assert!(table.activate(PageControl::Next, 5, &mut mode));
            assert!(table.activate(PageControl::Previous, 5, &mut mode));
        }
        assert_eq!(requested, vec![3, 1]);
        assert_eq!(table.current_page(), 1);
    }
}
