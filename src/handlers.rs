//! Keyboard input handlers for the table pager.
//!
//! Handlers translate key events into actions; the application decides
//! what those actions do to its data and pagination state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::export::ExportFormat;
use crate::pagination::PageControl;
use crate::state::AppMode;

/// Result of handling a key event in normal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Exit the application
    Quit,
    /// Activate a pagination control
    Navigate(PageControl),
    /// Step the page-size selector
    PageSize(SizeStep),
    /// Fetch the current page again
    Reload,
    /// Change input mode
    ModeChange(AppMode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeStep {
    Smaller,
    Larger,
}

/// Outcome of a key press while editing a text input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Still editing
    Editing,
    /// Esc pressed; buffer cleared
    Cancelled,
    /// Enter pressed; carries the trimmed text, buffer cleared
    Submitted(String),
}

/// Outcome of the export format prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatChoice {
    Pending,
    Cancel,
    Chosen(ExportFormat),
}

/// Handle key events in normal mode.
///
/// `total_pages` bounds the last-page shortcut.
pub fn handle_normal_mode(key: &KeyEvent, total_pages: usize) -> KeyAction {
    match key.code {
        // Quit on 'q' or Ctrl+C
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        // Page navigation
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::PageUp => {
            KeyAction::Navigate(PageControl::Previous)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::PageDown => {
            KeyAction::Navigate(PageControl::Next)
        }
        KeyCode::Char('g') | KeyCode::Home => KeyAction::Navigate(PageControl::Page(1)),
        KeyCode::Char('G') | KeyCode::End => {
            KeyAction::Navigate(PageControl::Page(total_pages.max(1)))
        }
        // Direct page selection with number keys 1-9
        KeyCode::Char(c @ '1'..='9') => {
            let page = (c as usize) - ('0' as usize);
            KeyAction::Navigate(PageControl::Page(page))
        }

        // Page size selector
        KeyCode::Char('[') | KeyCode::Char('-') => KeyAction::PageSize(SizeStep::Smaller),
        KeyCode::Char(']') | KeyCode::Char('+') | KeyCode::Char('=') => {
            KeyAction::PageSize(SizeStep::Larger)
        }

        KeyCode::Char('/') => KeyAction::ModeChange(AppMode::SearchInput),
        KeyCode::Char('E') => KeyAction::ModeChange(AppMode::ExportFormat),
        KeyCode::Char('r') => KeyAction::Reload,

        _ => KeyAction::None,
    }
}

/// Handle key events while editing a one-line text input.
pub fn handle_text_input(key: &KeyEvent, input_buffer: &mut String) -> InputOutcome {
    match key.code {
        KeyCode::Esc => {
            input_buffer.clear();
            InputOutcome::Cancelled
        }
        KeyCode::Enter => {
            let text = input_buffer.trim().to_string();
            input_buffer.clear();
            InputOutcome::Submitted(text)
        }
        KeyCode::Char(c) => {
            input_buffer.push(c);
            InputOutcome::Editing
        }
        KeyCode::Backspace => {
            input_buffer.pop();
            InputOutcome::Editing
        }
        _ => InputOutcome::Editing,
    }
}

/// Handle key events in export format selection mode.
pub fn handle_export_format(key: &KeyEvent) -> FormatChoice {
    match key.code {
        KeyCode::Esc => FormatChoice::Cancel,
        KeyCode::Char('c') | KeyCode::Char('C') => FormatChoice::Chosen(ExportFormat::Csv),
        KeyCode::Char('j') | KeyCode::Char('J') => FormatChoice::Chosen(ExportFormat::Json),
        _ => FormatChoice::Pending,
    }
}
