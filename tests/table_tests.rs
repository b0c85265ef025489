//! Integration tests for the paginated table.
//!
//! These tests cover both pagination modes end to end:
//! - Page count and slicing in client-driven mode
//! - Pass-through rows and callbacks in server-driven mode
//! - Loading and empty bodies
//! - Disabled controls at the edges
//! - Rendering idempotence

use std::cell::RefCell;

use pretty_table_pager::column::{Column, Columns};
use pretty_table_pager::pagination::{self, PageControl, PaginationMode};
use pretty_table_pager::table::{PaginatedTable, TableBody, TableView, EMPTY_MESSAGE, LOADING_MESSAGE};

#[derive(Debug, Clone)]
struct Article {
    id: usize,
    title: String,
}

fn articles(n: usize) -> Vec<Article> {
    (1..=n)
        .map(|id| Article {
            id,
            title: format!("Article {}", id),
        })
        .collect()
}

fn article_table() -> PaginatedTable<Article> {
    let columns = Columns::new(vec![
        Column::new("id", "ID", |a: &Article| a.id.to_string()),
        Column::new("title", "Title", |a: &Article| a.title.clone()),
    ])
    .expect("unique keys");
    PaginatedTable::new(columns)
}

/// IDs shown in the body, or an empty list for message bodies.
fn shown_ids(view: &TableView) -> Vec<usize> {
    match &view.body {
        TableBody::Rows(rows) => rows
            .iter()
            .map(|cells| cells[0].to_string().parse().expect("numeric id"))
            .collect(),
        _ => Vec::new(),
    }
}

#[test]
fn test_scenario_a_client_mode_23_rows() {
    let rows = articles(23);
    let mut table = article_table();
    let mut mode = PaginationMode::client(10);

    let page1 = table.view(&rows, &mode, false);
    assert_eq!(page1.total_pages, 3, "23 rows at 10 per page is 3 pages");
    assert_eq!(shown_ids(&page1), (1..=10).collect::<Vec<_>>());

    assert!(table.activate(PageControl::Page(2), rows.len(), &mut mode));
    let page2 = table.view(&rows, &mode, false);
    assert_eq!(shown_ids(&page2), (11..=20).collect::<Vec<_>>());

    assert!(table.activate(PageControl::Page(3), rows.len(), &mut mode));
    let page3 = table.view(&rows, &mode, false);
    assert_eq!(shown_ids(&page3), vec![21, 22, 23], "last page holds the remainder");
}

#[test]
fn test_scenario_b_server_mode_passes_rows_through() {
    let page_rows = articles(5);
    let mut table = article_table();
    let calls = RefCell::new(Vec::new());
    let mut mode = PaginationMode::server(2, 4, |p| calls.borrow_mut().push(p));

    let view = table.view(&page_rows, &mode, false);
    assert_eq!(view.current_page, 2);
    assert_eq!(view.total_pages, 4);
    assert_eq!(shown_ids(&view), vec![1, 2, 3, 4, 5], "server rows are never re-sliced");

    assert!(table.activate(PageControl::Page(3), page_rows.len(), &mut mode));
    drop(mode);
    assert_eq!(*calls.borrow(), vec![3], "callback fires exactly once with the page");

    // Nothing changes until the caller supplies a new page
    let again = PaginationMode::server(2, 4, |_| {});
    assert_eq!(shown_ids(&table.view(&page_rows, &again, false)), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_scenario_c_loading_hides_rows() {
    let rows = articles(3);
    let table = article_table();
    let view = table.view(&rows, &PaginationMode::client(10), true);
    assert_eq!(view.body, TableBody::Loading);
    assert_eq!(view.body.message(), Some(LOADING_MESSAGE));
}

#[test]
fn test_scenario_d_empty_rows() {
    let table = article_table();
    let view = table.view(&[], &PaginationMode::client(10), false);
    assert_eq!(view.body, TableBody::Empty);
    assert_eq!(view.body.message(), Some(EMPTY_MESSAGE));
    assert_eq!(view.total_pages, 1);
    assert!(view.pager.is_none(), "no pagination bar for a single page");
}

#[test]
fn test_server_mode_with_more_rows_than_page_size_is_not_sliced() {
    // Server mode has no page size; 50 rows stay 50 rows
    let rows = articles(50);
    let table = article_table();
    let view = table.view(&rows, &PaginationMode::server(1, 2, |_| {}), false);
    assert_eq!(view.body.row_count(), 50);
}

#[test]
fn test_previous_on_first_page_is_noop() {
    let rows = articles(30);
    let mut table = article_table();

    let mut client = PaginationMode::client(10);
    assert!(!table.activate(PageControl::Previous, rows.len(), &mut client));
    assert_eq!(table.current_page(), 1);

    let mut calls = Vec::new();
    {
        let mut server = PaginationMode::server(1, 3, |p| calls.push(p));
        assert!(!table.activate(PageControl::Previous, 10, &mut server));
    }
    assert!(calls.is_empty(), "disabled control must not call back");
}

#[test]
fn test_next_on_last_page_is_noop() {
    let rows = articles(30);
    let mut table = article_table();

    let mut client = PaginationMode::client(10);
    table.activate(PageControl::Page(3), rows.len(), &mut client);
    assert!(!table.activate(PageControl::Next, rows.len(), &mut client));
    assert_eq!(table.current_page(), 3);

    let mut calls = Vec::new();
    {
        let mut server = PaginationMode::server(3, 3, |p| calls.push(p));
        assert!(!table.activate(PageControl::Next, 10, &mut server));
    }
    assert!(calls.is_empty(), "disabled control must not call back");
}

#[test]
fn test_pager_reflects_page_state() {
    let rows = articles(23);
    let mut table = article_table();
    let mut mode = PaginationMode::client(10);

    let bar = table.view(&rows, &mode, false).pager.expect("3 pages need a bar");
    assert!(!bar.button(PageControl::Previous).unwrap().enabled);
    assert!(bar.button(PageControl::Page(1)).unwrap().active);
    assert_eq!(bar.buttons.len(), 5, "prev + 3 pages + next");

    table.activate(PageControl::Next, rows.len(), &mut mode);
    let bar = table.view(&rows, &mode, false).pager.unwrap();
    assert!(bar.button(PageControl::Page(2)).unwrap().active);
    assert!(!bar.button(PageControl::Page(1)).unwrap().active);
}

#[test]
fn test_zero_page_size_is_clamped() {
    let rows = articles(4);
    let table = article_table();
    let view = table.view(&rows, &PaginationMode::client(0), false);
    assert_eq!(view.total_pages, 4);
    assert_eq!(shown_ids(&view), vec![1]);
}

#[test]
fn test_total_pages_property() {
    for n in 0..60 {
        for p in 1..12 {
            let expected = std::cmp::max(1, (n + p - 1) / p);
            assert_eq!(pagination::total_pages(n, p), expected, "n={} p={}", n, p);
        }
    }
}

#[test]
fn test_slice_property() {
    let rows = articles(37);
    for p in 1..=12 {
        let total = pagination::total_pages(rows.len(), p);
        let mut table = article_table();
        let mut mode = PaginationMode::client(p);
        for page in 1..=total {
            table.activate(PageControl::Page(page), rows.len(), &mut mode);
            let view = table.view(&rows, &mode, false);
            let start = (page - 1) * p;
            let end = (page * p).min(rows.len());
            let expected: Vec<usize> = rows[start..end].iter().map(|a| a.id).collect();
            assert_eq!(shown_ids(&view), expected, "p={} page={}", p, page);
        }
    }
}

#[test]
fn test_render_is_idempotent() {
    let rows = articles(23);
    let table = article_table();
    let mode = PaginationMode::client(10);
    assert_eq!(table.view(&rows, &mode, false), table.view(&rows, &mode, false));
}

#[test]
fn test_new_instance_starts_at_page_one() {
    let rows = articles(23);
    let mut table = article_table();
    let mut mode = PaginationMode::client(10);
    table.activate(PageControl::Page(3), rows.len(), &mut mode);

    let fresh = article_table();
    assert_eq!(fresh.current_page(), 1);
    assert_eq!(table.current_page(), 3, "rows changing does not reset the counter");
}
