//! Row sources: the collaborators that fetch rows for the table.
//!
//! A source answers a `PageQuery` (search text, 1-based page, page size)
//! with a `PageResult`. Server-driven sources report a total page count;
//! sources that hand back everything leave it empty and the table pages
//! the rows itself.

use log::debug;

use crate::pagination;
use crate::parser::{Record, TableData};

/// Errors raised while fetching rows.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("database error: {0}")]
    Database(#[from] postgres::Error),

    #[error("invalid table name '{0}'")]
    InvalidTable(String),

    #[error("table '{0}' has no columns")]
    NoColumns(String),
}

/// Parameters for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub search: String,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl PageQuery {
    pub fn new(search: impl Into<String>, page: usize, page_size: usize) -> Self {
        Self {
            search: search.into(),
            page: page.max(1),
            page_size: pagination::effective_page_size(page_size),
        }
    }

    /// Row offset of the first row on the requested page.
    pub fn offset(&self) -> usize {
        pagination::page_range(self.page, self.page_size, usize::MAX).start
    }
}

/// Rows returned by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub rows: Vec<Record>,
    /// Set by server-driven sources; `None` means `rows` is the full result
    pub total_pages: Option<usize>,
}

/// Something that can hand out pages of rows.
pub trait RowSource {
    /// Short description for titles and logs.
    fn name(&self) -> &str;

    /// Column headers of every row this source returns.
    fn headers(&self) -> &[String];

    /// Fetch the rows for `query`.
    ///
    /// A non-empty search keeps rows where at least one cell contains the
    /// text, ignoring case (see [`filter_rows`]).
    fn fetch(&mut self, query: &PageQuery) -> Result<PageResult, SourceError>;
}

/// Case-insensitive substring search over every cell.
///
/// An empty search matches every row.
pub fn filter_rows<'a>(rows: &'a [Record], search: &str) -> Vec<&'a Record> {
    if search.is_empty() {
        return rows.iter().collect();
    }
    let needle = search.to_lowercase();
    rows.iter()
        .filter(|row| row.iter().any(|cell| cell.to_lowercase().contains(&needle)))
        .collect()
}

/// Server-side paging over rows held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: TableData,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: TableData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }
}

impl RowSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn headers(&self) -> &[String] {
        &self.data.headers
    }

    fn fetch(&mut self, query: &PageQuery) -> Result<PageResult, SourceError> {
        let matches = filter_rows(&self.data.rows, &query.search);
        let total_pages = pagination::total_pages(matches.len(), query.page_size);
        let rows: Vec<Record> = pagination::page_slice(&matches, query.page, query.page_size)
            .iter()
            .map(|row| (*row).clone())
            .collect();
        debug!(
            "{}: page {}/{} with {} of {} matching rows",
            self.name,
            query.page,
            total_pages,
            rows.len(),
            matches.len()
        );
        Ok(PageResult {
            rows,
            total_pages: Some(total_pages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> TableData {
        let rows = ["Alice", "Bob", "alicia", "Dave", "Eve"]
            .iter()
            .enumerate()
            .map(|(i, name)| vec![(i + 1).to_string(), name.to_string()])
            .collect();
        TableData {
            headers: vec!["id".to_string(), "name".to_string()],
            rows,
        }
    }

    #[test]
    fn test_query_normalizes_inputs() {
        let query = PageQuery::new("", 0, 0);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 1);
        assert_eq!(query.offset(), 0);
        assert_eq!(PageQuery::new("", 3, 10).offset(), 20);
    }

    #[test]
    fn test_filter_rows_case_insensitive() {
        let data = people();
        let hits = filter_rows(&data.rows, "ALI");
        assert_eq!(hits.len(), 2);
        assert_eq!(filter_rows(&data.rows, "").len(), 5);
        assert!(filter_rows(&data.rows, "zzz").is_empty());
    }

    #[test]
    fn test_memory_source_pages() {
        let mut source = MemorySource::new("people", people());
        let page = source.fetch(&PageQuery::new("", 2, 2)).unwrap();
        assert_eq!(page.total_pages, Some(3));
        assert_eq!(page.rows, vec![vec!["3", "alicia"], vec!["4", "Dave"]]);

        let last = source.fetch(&PageQuery::new("", 3, 2)).unwrap();
        assert_eq!(last.rows.len(), 1);
    }

    #[test]
    fn test_memory_source_search_then_page() {
        let mut source = MemorySource::new("people", people());
        let page = source.fetch(&PageQuery::new("ali", 1, 10)).unwrap();
        assert_eq!(page.total_pages, Some(1));
        assert_eq!(page.rows.len(), 2);
    }

    #[test]
    fn test_memory_source_page_past_end() {
        let mut source = MemorySource::new("people", people());
        let page = source.fetch(&PageQuery::new("", 9, 2)).unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, Some(3));
    }
}
