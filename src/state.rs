//! Application state types for the table pager.
//!
//! Input modes, the page-size selector, and the caller-owned page state
//! used when the table runs server-driven.

use crate::parser::Record;

/// Application mode for handling different input states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppMode {
    Normal,         // Regular table navigation
    SearchInput,    // '/' pressed, entering search text
    ExportFormat,   // 'E' pressed, selecting export format (CSV/JSON)
    ExportFilename, // Format selected, entering filename
}

/// Page sizes offered by the selector.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];

/// Steps through a sorted list of page sizes.
///
/// Reports whether the size actually changed so the caller can reset
/// pagination to page 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSizeSelector {
    options: Vec<usize>,
    idx: usize,
}

impl PageSizeSelector {
    /// Selector starting at `initial`; a size not in the standard list is
    /// added to it. Zero is treated as 1.
    pub fn new(initial: usize) -> Self {
        let initial = initial.max(1);
        let mut options = PAGE_SIZE_OPTIONS.to_vec();
        if !options.contains(&initial) {
            options.push(initial);
            options.sort_unstable();
        }
        let idx = options.iter().position(|&o| o == initial).unwrap_or(0);
        Self { options, idx }
    }

    pub fn current(&self) -> usize {
        self.options[self.idx]
    }

    pub fn options(&self) -> &[usize] {
        &self.options
    }

    /// Move to the next larger size. Returns true if the size changed.
    pub fn increase(&mut self) -> bool {
        if self.idx + 1 < self.options.len() {
            self.idx += 1;
            true
        } else {
            false
        }
    }

    /// Move to the next smaller size. Returns true if the size changed.
    pub fn decrease(&mut self) -> bool {
        if self.idx > 0 {
            self.idx -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `size` if it is one of the options. Returns true if found.
    pub fn select(&mut self, size: usize) -> bool {
        match self.options.iter().position(|&o| o == size) {
            Some(idx) => {
                self.idx = idx;
                true
            }
            None => false,
        }
    }
}

/// Page handed to the table in server-driven mode.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerPage {
    pub current_page: usize,
    pub total_pages: usize,
    pub rows: Vec<Record>,
}

impl Default for ServerPage {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            rows: Vec::new(),
        }
    }
}
