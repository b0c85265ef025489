//! Table rendering functions for the terminal UI.
//!
//! Draws a `TableView`: bordered table with a bold header row, a single
//! full-width message row for loading/empty bodies, and the pagination bar
//! underneath.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::app::App;
use crate::notify::{Toast, ToastKind};
use crate::pagination::PageBar;
use crate::state::AppMode;
use crate::table::{TableBody, TableView};

/// Build the pagination bar line.
///
/// Format: `‹ Prev  1  2 [3]  Next ›` with the active page reversed and
/// disabled controls dimmed.
pub fn pager_line(bar: &PageBar) -> Line<'static> {
    let mut spans = Vec::with_capacity(bar.buttons.len() * 2 + 1);
    for (i, button) in bar.buttons.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if button.active {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else if !button.enabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let label = if button.active {
            format!("[{}]", button.label)
        } else {
            format!(" {} ", button.label)
        };
        spans.push(Span::styled(label, style));
    }
    spans.push(Span::styled(
        format!("  Page {} of {}", bar.current_page, bar.total_pages),
        Style::default().fg(Color::Gray),
    ));
    Line::from(spans)
}

/// Render the table part of a view.
pub fn render_table(frame: &mut Frame, area: Rect, view: &TableView, widths: &[u16], title: String) {
    let header_row = Row::new(view.header.iter().cloned().map(Cell::from))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = match &view.body {
        TableBody::Rows(rows) => rows
            .iter()
            .map(|cells| Row::new(cells.iter().cloned().map(Cell::from)))
            .collect(),
        TableBody::Loading | TableBody::Empty => Vec::new(),
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);

    let constraints: Vec<Constraint> = widths.iter().map(|&w| Constraint::Length(w)).collect();
    let table = Table::new(rows, constraints)
        .header(header_row)
        .block(block);
    frame.render_widget(table, area);

    // Loading / empty: one row spanning the full width under the header
    if let Some(message) = view.body.message() {
        if inner.height > 1 {
            let message_area = Rect {
                y: inner.y + 1,
                height: 1,
                ..inner
            };
            let style = match view.body {
                TableBody::Loading => Style::default().fg(Color::Cyan),
                _ => Style::default().fg(Color::DarkGray),
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(style)
                    .alignment(Alignment::Center),
                message_area,
            );
        }
    }
}

/// Build a title for the table block.
///
/// Format: `name [Page 2/5 · 48 of 120 rows] /filter`
pub fn build_title(
    name: &str,
    view: &TableView,
    shown_rows: usize,
    total_rows: Option<usize>,
    search: &str,
) -> String {
    let rows_info = match total_rows {
        Some(total) if total != shown_rows => format!("{} of {} rows", shown_rows, total),
        Some(total) => format!("{} rows", total),
        None => format!("{} rows on page", shown_rows),
    };
    let filter_info = if search.is_empty() {
        String::new()
    } else {
        format!(" /{}", search)
    };
    format!(
        "{} [Page {}/{} · {}]{}",
        name, view.current_page, view.total_pages, rows_info, filter_info
    )
}

/// Build context-appropriate controls hint string.
pub fn build_controls_hint(server_driven: bool) -> String {
    let reload = if server_driven { "r: reload, " } else { "" };
    format!(
        "←/→: page, 1-9: go to, [/]: page size, /: search, E: export, {}q: quit",
        reload
    )
}

/// Render input bar for search/export modes.
pub fn render_input_bar(frame: &mut Frame, area: Rect, mode: AppMode, input_buffer: &str) {
    let (prefix, style) = match mode {
        AppMode::SearchInput => ("/", Style::default().fg(Color::Yellow)),
        AppMode::ExportFilename => ("Save as: ", Style::default().fg(Color::Green)),
        AppMode::Normal | AppMode::ExportFormat => ("", Style::default()),
    };

    let input_widget = Paragraph::new(format!("{}{}", prefix, input_buffer))
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(input_widget, area);
}

/// Render export format selection prompt.
pub fn render_format_prompt(frame: &mut Frame, area: Rect) {
    let prompt_widget = Paragraph::new("Export format: [C]SV or [J]SON (Esc to cancel)")
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(prompt_widget, area);
}

/// Style for a toast message.
fn toast_style(toast: &Toast) -> Style {
    match toast.kind {
        ToastKind::Info => Style::default().fg(Color::Cyan),
        ToastKind::Success => Style::default().fg(Color::Green),
        ToastKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// Draw the whole screen for `app`.
pub fn draw(frame: &mut Frame, app: &App) {
    let view = app.view();
    let footer_height = match app.mode() {
        AppMode::Normal => 1,
        _ => 3,
    };
    let pager_height = if view.pager.is_some() { 1 } else { 0 };

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(pager_height),
        Constraint::Length(footer_height),
    ])
    .split(frame.area());

    let title = build_title(
        app.name(),
        &view,
        app.table_rows().len(),
        app.total_rows(),
        app.search(),
    );
    render_table(frame, chunks[0], &view, &app.column_widths(), title);

    if let Some(bar) = &view.pager {
        frame.render_widget(Paragraph::new(pager_line(bar)), chunks[1]);
    }

    match app.mode() {
        AppMode::Normal => {
            let status = match app.latest_toast() {
                Some(toast) => Paragraph::new(toast.message.clone()).style(toast_style(toast)),
                None => Paragraph::new(format!(
                    "{} · {} per page",
                    build_controls_hint(app.is_server_driven()),
                    app.page_size()
                ))
                .style(Style::default().fg(Color::DarkGray)),
            };
            frame.render_widget(status, chunks[2]);
        }
        AppMode::ExportFormat => render_format_prompt(frame, chunks[2]),
        mode => render_input_bar(frame, chunks[2], mode, app.input_buffer()),
    }
}
