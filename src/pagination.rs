//! Pagination modes and page arithmetic for the paginated table.
//!
//! The table runs in exactly one of two modes per render:
//! - server-driven: the caller supplies one page of rows plus the page
//!   bounds and a callback, and the table never slices;
//! - client-driven: the caller supplies every row and a page size, and the
//!   table slices using its own page counter.
//!
//! All helpers here are total: degenerate inputs (zero page size, page 0,
//! pages past the end) are normalized instead of rejected.

use std::fmt;
use std::ops::Range;

/// Page size used by client-driven tables when the caller does not pick one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Clamp a requested page size to at least one row per page.
pub fn effective_page_size(items_per_page: usize) -> usize {
    items_per_page.max(1)
}

/// Number of pages needed for `row_count` rows.
///
/// Never returns zero: an empty collection still has one (empty) page.
pub fn total_pages(row_count: usize, items_per_page: usize) -> usize {
    row_count
        .div_ceil(effective_page_size(items_per_page))
        .max(1)
}

/// Index range of the 1-based `page` within a collection of `row_count` rows.
///
/// Pages past the end yield an empty range at `row_count`.
pub fn page_range(page: usize, items_per_page: usize, row_count: usize) -> Range<usize> {
    let size = effective_page_size(items_per_page);
    let start = page
        .saturating_sub(1)
        .saturating_mul(size)
        .min(row_count);
    let end = start.saturating_add(size).min(row_count);
    start..end
}

/// Slice `rows` down to the 1-based `page`.
pub fn page_slice<T>(rows: &[T], page: usize, items_per_page: usize) -> &[T] {
    &rows[page_range(page, items_per_page, rows.len())]
}

/// One activatable control of the pagination bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageControl {
    Previous,
    /// Jump to a 1-based page number
    Page(usize),
    Next,
}

impl PageControl {
    /// Page this control navigates to, or `None` when the control is disabled.
    ///
    /// Previous is disabled on page 1, Next on the last page. Page controls
    /// outside `1..=total_pages` do not exist and therefore never navigate.
    pub fn target(self, current_page: usize, total_pages: usize) -> Option<usize> {
        match self {
            PageControl::Previous => (current_page > 1).then(|| current_page - 1),
            PageControl::Next => (current_page < total_pages).then(|| current_page + 1),
            PageControl::Page(page) => (1..=total_pages).contains(&page).then_some(page),
        }
    }
}

/// A rendered pagination control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageButton {
    pub control: PageControl,
    pub label: String,
    pub enabled: bool,
    /// Marks the control of the page currently shown
    pub active: bool,
}

/// Pagination bar: previous, one control per page, next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageBar {
    pub current_page: usize,
    pub total_pages: usize,
    pub buttons: Vec<PageButton>,
}

impl PageBar {
    /// Build the bar for the given page bounds.
    ///
    /// Returns `None` when there is only a single page, since a bar is only
    /// shown for `total_pages > 1`.
    pub fn new(current_page: usize, total_pages: usize) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }

        let mut buttons = Vec::with_capacity(total_pages + 2);
        buttons.push(PageButton {
            control: PageControl::Previous,
            label: "‹ Prev".to_string(),
            enabled: PageControl::Previous
                .target(current_page, total_pages)
                .is_some(),
            active: false,
        });
        for page in 1..=total_pages {
            buttons.push(PageButton {
                control: PageControl::Page(page),
                label: page.to_string(),
                enabled: true,
                active: page == current_page,
            });
        }
        buttons.push(PageButton {
            control: PageControl::Next,
            label: "Next ›".to_string(),
            enabled: PageControl::Next.target(current_page, total_pages).is_some(),
            active: false,
        });

        Some(Self {
            current_page,
            total_pages,
            buttons,
        })
    }

    /// Look up the button for a control, if the bar has one.
    pub fn button(&self, control: PageControl) -> Option<&PageButton> {
        self.buttons.iter().find(|b| b.control == control)
    }
}

/// Client-driven paging parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientPaging {
    pub items_per_page: usize,
}

impl Default for ClientPaging {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Server-driven paging parameters: the caller owns the page and re-fetches
/// when `on_page_change` fires.
pub struct ServerPaging<'a> {
    current_page: usize,
    total_pages: usize,
    on_page_change: Box<dyn FnMut(usize) + 'a>,
}

impl<'a> ServerPaging<'a> {
    /// Both page numbers are normalized to at least 1.
    pub fn new(
        current_page: usize,
        total_pages: usize,
        on_page_change: impl FnMut(usize) + 'a,
    ) -> Self {
        Self {
            current_page: current_page.max(1),
            total_pages: total_pages.max(1),
            on_page_change: Box::new(on_page_change),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Forward a page request to the caller.
    pub(crate) fn request(&mut self, page: usize) {
        (self.on_page_change)(page);
    }
}

impl fmt::Debug for ServerPaging<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerPaging")
            .field("current_page", &self.current_page)
            .field("total_pages", &self.total_pages)
            .finish_non_exhaustive()
    }
}

/// Pagination mode chosen by the caller for one render.
#[derive(Debug)]
pub enum PaginationMode<'a> {
    Server(ServerPaging<'a>),
    Client(ClientPaging),
}

impl<'a> PaginationMode<'a> {
    /// Client-driven mode with the given page size.
    pub fn client(items_per_page: usize) -> Self {
        PaginationMode::Client(ClientPaging { items_per_page })
    }

    /// Server-driven mode; `on_page_change` receives the requested page.
    pub fn server(
        current_page: usize,
        total_pages: usize,
        on_page_change: impl FnMut(usize) + 'a,
    ) -> Self {
        PaginationMode::Server(ServerPaging::new(
            current_page,
            total_pages,
            on_page_change,
        ))
    }

    pub fn is_server(&self) -> bool {
        matches!(self, PaginationMode::Server(_))
    }
}

impl Default for PaginationMode<'_> {
    fn default() -> Self {
        PaginationMode::Client(ClientPaging::default())
    }
}
