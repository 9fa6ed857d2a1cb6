//! Cell-level parsing for dates, coordinates and labels.
//!
//! Spreadsheets hand us native dates or Excel serial numbers while CSV
//! exports hand us text in whatever format the publisher chose, so every
//! parser here accepts a [`Cell`] rather than a string.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A single value read from a source table, normalized across backends.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Blank cell or absent column.
    Empty,
    /// Text value (already trimmed, never empty).
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Native date value.
    Date(NaiveDate),
}

impl Cell {
    /// Builds a cell from raw text, mapping whitespace-only input to
    /// [`Cell::Empty`].
    #[must_use]
    pub fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }
}

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Datetime formats tried before the date-only formats.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats. Day-first comes before month-first so an ambiguous
/// `03/04/2024` reads as 3 April, matching UK police exports.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// Parses a date from text.
///
/// Accepts RFC 3339 timestamps with an offset, ISO dates and datetimes,
/// slash-separated day-first and month-first dates, and bare `YYYY-MM`
/// months (mapped to the first day of the month).
///
/// An offset timestamp keeps the calendar date as written; it is not
/// shifted to UTC.
#[must_use]
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // Police.uk monthly extracts only carry "YYYY-MM".
    if s.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok();
    }

    None
}

/// Converts an Excel serial day number (1900 date system) to a date.
///
/// Fractional parts (time of day) are discarded.
#[must_use]
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // Day zero is 1899-12-30 once Lotus' phantom 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    #[allow(clippy::cast_possible_truncation)]
    let days = serial.floor() as i64;
    epoch.checked_add_signed(chrono::Duration::days(days))
}

/// Parses a date cell of any kind.
#[must_use]
pub fn parse_date_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::Date(date) => Some(*date),
        Cell::Number(serial) => excel_serial_to_date(*serial),
        Cell::Text(s) => parse_date_text(s),
    }
}

/// Parses a coordinate cell, rejecting values outside `[-limit, limit]`.
///
/// Returns `None` if the cell is blank, unparseable, non-finite, or out of
/// range.
#[must_use]
pub fn parse_coordinate(cell: &Cell, limit: f64) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.parse::<f64>().ok()?,
        Cell::Empty | Cell::Date(_) => return None,
    };
    if value.is_finite() && value.abs() <= limit {
        Some(value)
    } else {
        None
    }
}

/// Parses a latitude/longitude pair. Each half is validated independently;
/// consumers decide whether a half-present pair is usable.
#[must_use]
pub fn parse_lat_lng(lat: &Cell, lng: &Cell) -> (Option<f64>, Option<f64>) {
    (parse_coordinate(lat, 90.0), parse_coordinate(lng, 180.0))
}

/// Extracts a text label. Numbers are rendered without a trailing `.0`
/// so numeric codes survive spreadsheet round-trips.
#[must_use]
pub fn parse_label(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(n) if n.fract() == 0.0 => Some(format!("{n:.0}")),
        Cell::Number(n) => Some(n.to_string()),
        Cell::Date(d) => Some(d.to_string()),
    }
}
