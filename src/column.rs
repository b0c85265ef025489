//! Column specification for the paginated table.
//!
//! Every column carries an explicit accessor; there is no implicit lookup of
//! a row field by column key.

use std::collections::HashSet;
use std::fmt;

use ratatui::text::Line;

/// Smallest fixed width a column may be given.
pub const MIN_COLUMN_WIDTH: u16 = 3;
/// Largest fixed width a column may be given.
pub const MAX_COLUMN_WIDTH: u16 = 100;

type Accessor<T> = Box<dyn Fn(&T) -> Line<'static>>;

/// Errors raised while assembling a column set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    /// Two columns share a key within one table.
    #[error("duplicate column key '{key}'")]
    DuplicateKey { key: String },

    /// A column was declared with an empty key.
    #[error("column at position {index} has an empty key")]
    EmptyKey { index: usize },
}

/// One column of a table: key, header and cell accessor.
pub struct Column<T> {
    key: String,
    header: Line<'static>,
    accessor: Accessor<T>,
    /// Fixed width (None = auto-size)
    width: Option<u16>,
}

impl<T> Column<T> {
    /// Create a column.
    ///
    /// The header accepts anything convertible into a styled line, and the
    /// accessor produces the cell for one row.
    pub fn new<H, F, C>(key: impl Into<String>, header: H, accessor: F) -> Self
    where
        H: Into<Line<'static>>,
        F: Fn(&T) -> C + 'static,
        C: Into<Line<'static>>,
    {
        Self {
            key: key.into(),
            header: header.into(),
            accessor: Box::new(move |row| accessor(row).into()),
            width: None,
        }
    }

    /// Pin the column to a fixed width (clamped to 3..=100).
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &Line<'static> {
        &self.header
    }

    /// Fixed width, if one was set.
    pub fn width(&self) -> Option<u16> {
        self.width
    }

    /// Render the cell for `row`.
    pub fn cell(&self, row: &T) -> Line<'static> {
        (self.accessor)(row)
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header.to_string())
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

/// Ordered set of columns with unique keys.
#[derive(Debug)]
pub struct Columns<T> {
    columns: Vec<Column<T>>,
}

impl<T> Columns<T> {
    /// Build a column set, rejecting empty or duplicate keys.
    pub fn new(columns: Vec<Column<T>>) -> Result<Self, ColumnError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            if column.key.is_empty() {
                return Err(ColumnError::EmptyKey { index });
            }
            if !seen.insert(column.key.as_str()) {
                return Err(ColumnError::DuplicateKey {
                    key: column.key.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column<T>> {
        self.columns.iter()
    }

    /// Find a column by key.
    pub fn get(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Header cells, in column order.
    pub fn headers(&self) -> Vec<Line<'static>> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    /// Render every cell of one row, in column order.
    pub fn render_row(&self, row: &T) -> Vec<Line<'static>> {
        self.columns.iter().map(|c| c.cell(row)).collect()
    }

    /// Column widths for the given rows.
    ///
    /// Fixed widths win; other columns are sized to the widest header or
    /// cell, plus 1 for padding.
    pub fn widths(&self, rows: &[T]) -> Vec<u16> {
        self.columns
            .iter()
            .map(|column| {
                if let Some(width) = column.width {
                    return width;
                }
                let widest = rows
                    .iter()
                    .map(|row| column.cell(row).width())
                    .fold(column.header.width(), usize::max);
                u16::try_from(widest + 1).unwrap_or(u16::MAX)
            })
            .collect()
    }
}

impl<'a, T> IntoIterator for &'a Columns<T> {
    type Item = &'a Column<T>;
    type IntoIter = std::slice::Iter<'a, Column<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Derive unique column keys from (possibly repeated) header names.
///
/// Repeats get a numeric suffix (`name`, `name_2`, ...) and blank headers
/// fall back to `col_<n>`.
pub fn unique_keys(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let base = if header.trim().is_empty() {
                format!("col_{}", i + 1)
            } else {
                header.trim().to_string()
            };
            let mut key = base.clone();
            let mut n = 2;
            while !seen.insert(key.clone()) {
                key = format!("{}_{}", base, n);
                n += 1;
            }
            key
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct User {
        id: u32,
        name: &'static str,
    }

    fn user_columns() -> Vec<Column<User>> {
        vec![
            Column::new("id", "ID", |u: &User| u.id.to_string()),
            Column::new("name", "Name", |u: &User| u.name),
        ]
    }

    #[test]
    fn test_cells_use_accessor() {
        let columns = Columns::new(user_columns()).unwrap();
        let row = User { id: 7, name: "Alice" };
        let cells: Vec<String> = columns.render_row(&row).iter().map(|l| l.to_string()).collect();
        assert_eq!(cells, vec!["7", "Alice"]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut cols = user_columns();
        cols.push(Column::new("id", "Again", |u: &User| u.id.to_string()));
        let err = Columns::new(cols).unwrap_err();
        assert_eq!(err, ColumnError::DuplicateKey { key: "id".to_string() });
    }

    #[test]
    fn test_empty_key_rejected() {
        let cols = vec![Column::new("", "Blank", |u: &User| u.name)];
        assert_eq!(
            Columns::new(cols).unwrap_err(),
            ColumnError::EmptyKey { index: 0 }
        );
    }

    #[test]
    fn test_width_clamped() {
        let narrow = Column::new("id", "ID", |u: &User| u.id.to_string()).with_width(1);
        assert_eq!(narrow.width(), Some(MIN_COLUMN_WIDTH));
        let wide = Column::new("id", "ID", |u: &User| u.id.to_string()).with_width(500);
        assert_eq!(wide.width(), Some(MAX_COLUMN_WIDTH));
    }

    #[test]
    fn test_auto_widths() {
        let columns = Columns::new(user_columns()).unwrap();
        let rows = vec![
            User { id: 1, name: "Bob" },
            User { id: 12345, name: "Charlotte" },
        ];
        // "12345" = 5 + 1, "Charlotte" = 9 + 1
        assert_eq!(columns.widths(&rows), vec![6, 10]);
        // Headers only
        assert_eq!(columns.widths(&[]), vec![3, 5]);
    }

    #[test]
    fn test_fixed_width_wins() {
        let cols = vec![Column::new("name", "Name", |u: &User| u.name).with_width(4)];
        let columns = Columns::new(cols).unwrap();
        let rows = vec![User { id: 1, name: "Maximilian" }];
        assert_eq!(columns.widths(&rows), vec![4]);
    }

    #[test]
    fn test_get_by_key() {
        let columns = Columns::new(user_columns()).unwrap();
        assert_eq!(columns.get("name").unwrap().header().to_string(), "Name");
        assert!(columns.get("missing").is_none());
    }

    #[test]
    fn test_unique_keys() {
        let headers: Vec<String> = vec!["id", "?column?", "?column?", " ", "id"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            unique_keys(&headers),
            vec!["id", "?column?", "?column?_2", "col_4", "id_2"]
        );
    }
}
