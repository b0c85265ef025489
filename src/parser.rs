//! psql aligned-output parser.
//!
//! Turns the default `psql` table format into `TableData` and builds the
//! column set used to page through it.

use crate::column::{unique_keys, Column, ColumnError, Columns};

/// One parsed row: cell text in header order.
pub type Record = Vec<String>;

/// Represents parsed table data from psql output or a database query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    /// Column headers from the first row
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<Record>,
}

impl TableData {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Returns the number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns the number of data rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Build one column per header.
    ///
    /// Cells missing from short rows render as empty text.
    pub fn columns(&self) -> Result<Columns<Record>, ColumnError> {
        record_columns(&self.headers)
    }
}

/// Build positional columns over `Record` rows for the given headers.
pub fn record_columns(headers: &[String]) -> Result<Columns<Record>, ColumnError> {
    let columns = unique_keys(headers)
        .into_iter()
        .zip(headers.iter())
        .enumerate()
        .map(|(i, (key, header))| {
            Column::new(key, header.clone(), move |row: &Record| {
                row.get(i).cloned().unwrap_or_default()
            })
        })
        .collect();
    Columns::new(columns)
}

/// Parse psql header from the first few lines of output.
///
/// Returns `Some((headers, data_start_index))` where:
/// - `headers` is the parsed column names
/// - `data_start_index` is the line index after the separator where data rows begin
///
/// Returns `None` if headers or separator are missing/malformed.
pub fn parse_psql_header(lines: &[&str]) -> Option<(Vec<String>, usize)> {
    // Find the first non-empty line (header row)
    let (header_idx, header_line) = lines
        .iter()
        .enumerate()
        .find(|(_, line)| !line.trim().is_empty())?;

    let headers: Vec<String> = header_line
        .split('|')
        .map(|s| s.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return None;
    }

    // The next line should be the separator (contains ---)
    let separator_line = lines.get(header_idx + 1)?;
    if !separator_line.contains("---") {
        return None;
    }

    Some((headers, header_idx + 2))
}

/// Returns true for the `(N rows)` footer psql prints after the data.
pub fn is_footer(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('(') && trimmed.ends_with(')') && trimmed.contains("row")
}

/// Parse a single data row from psql output.
///
/// Returns `None` for empty lines and footer lines (e.g. "(2 rows)").
/// Rows are padded with empty cells up to `column_count`.
pub fn parse_psql_line(line: &str, column_count: usize) -> Option<Record> {
    if line.trim().is_empty() || is_footer(line) {
        return None;
    }

    let mut row: Record = line.split('|').map(|s| s.trim().to_string()).collect();
    if row.len() < column_count {
        row.resize(column_count, String::new());
    }
    Some(row)
}

/// Parse psql output format into structured TableData.
///
/// Expected format:
/// ```text
///  column1  | column2  | column3
/// ----------+----------+---------
///  value1   | value2   | value3
///  value4   | value5   | value6
/// (2 rows)
/// ```
///
/// Returns `None` if input is empty or malformed.
pub fn parse_psql(input: &str) -> Option<TableData> {
    let lines: Vec<&str> = input.lines().collect();
    let (headers, data_start) = parse_psql_header(&lines)?;
    let column_count = headers.len();

    let mut data = TableData::new(headers);
    for line in &lines[data_start..] {
        // Stop at footer line
        if is_footer(line) {
            break;
        }
        if let Some(row) = parse_psql_line(line, column_count) {
            data.rows.push(row);
        }
    }

    Some(data)
}
