//! Source table readers.
//!
//! Spreadsheets go through `calamine` (first worksheet only); CSV files go
//! through the `csv` crate. Both produce a [`Table`] of normalized
//! [`Cell`]s with the first row taken as the header.

use std::path::Path;

use calamine::{Data, Reader as _, open_workbook_auto};

use crate::LoadError;
use crate::parsing::Cell;

/// Extensions routed to `calamine`.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

static EMPTY_CELL: Cell = Cell::Empty;

/// A header row plus data rows. Rows may be shorter than the header.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Header names, in column order.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Returns the cell at `col` in `row`, or [`Cell::Empty`] when the row
    /// is short.
    #[must_use]
    pub fn cell(row: &[Cell], col: usize) -> &Cell {
        row.get(col).unwrap_or(&EMPTY_CELL)
    }

    /// Like [`Table::cell`] for a column that may not exist in the source.
    #[must_use]
    pub fn optional_cell(row: &[Cell], col: Option<usize>) -> &Cell {
        col.map_or(&EMPTY_CELL, |c| Self::cell(row, c))
    }
}

/// Reads the table at `path`, choosing a backend by file extension.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing, the format is unsupported,
/// or the backend fails to parse it.
pub fn read_table(path: &Path) -> Result<Table, LoadError> {
    // Surface a plain I/O error for a missing file before any backend
    // wraps it in its own error type.
    std::fs::metadata(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if extension == "csv" {
        read_csv(path)
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path)
    } else {
        Err(LoadError::UnsupportedFormat { extension })
    }
}

fn read_csv(path: &Path) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(Table { headers, rows })
}

fn read_spreadsheet(path: &Path) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };

    let headers = header_row
        .iter()
        .map(|cell| match data_to_cell(cell) {
            Cell::Text(s) => s,
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.to_string(),
        })
        .collect();

    let rows = rows
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();

    Ok(Table { headers, rows })
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        #[allow(clippy::cast_precision_loss)]
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| Cell::Number(dt.as_f64()), |d| Cell::Date(d.date())),
        Data::Error(e) => {
            log::debug!("Spreadsheet cell error treated as blank: {e:?}");
            Cell::Empty
        }
    }
}
