//! Data export functionality for CSV and JSON formats.
//!
//! Cells are produced by the table's column accessors, so an export shows
//! exactly what the table shows.

use serde_json::{Map, Value};

use crate::column::Columns;

/// Export format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Suggested file name for this format.
    pub fn default_filename(self) -> &'static str {
        match self {
            ExportFormat::Csv => "export.csv",
            ExportFormat::Json => "export.json",
        }
    }
}

/// Errors raised while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to finalize CSV: {0}")]
    Finalize(String),

    #[error("invalid UTF-8 in CSV output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// UTF-8 BOM (Byte Order Mark) for Excel compatibility
const UTF8_BOM: &str = "\u{FEFF}";

/// Export rows to a string in the specified format.
pub fn export_rows<T>(
    columns: &Columns<T>,
    rows: &[T],
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => export_csv(columns, rows),
        ExportFormat::Json => export_json(columns, rows),
    }
}

/// CSV with a header row of column headers, prefixed with a UTF-8 BOM
fn export_csv<T>(columns: &Columns<T>, rows: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let headers: Vec<String> = columns.iter().map(|c| c.header().to_string()).collect();
    wtr.write_record(&headers)?;

    for row in rows {
        let values: Vec<String> = columns.iter().map(|c| c.cell(row).to_string()).collect();
        wtr.write_record(&values)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Finalize(e.to_string()))?;
    let content = String::from_utf8(bytes)?;

    Ok(format!("{}{}", UTF8_BOM, content))
}

/// JSON array of objects keyed by column key
fn export_json<T>(columns: &Columns<T>, rows: &[T]) -> Result<String, ExportError> {
    let objects: Vec<Value> = rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = columns
                .iter()
                .map(|c| (c.key().to_string(), Value::String(c.cell(row).to_string())))
                .collect();
            Value::Object(object)
        })
        .collect();

    Ok(serde_json::to_string_pretty(&objects)?)
}

/// Save content to a file
pub fn save_to_file(content: &str, path: &str) -> Result<(), ExportError> {
    std::fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.to_string(),
        source,
    })
}
