#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory incident record store.
//!
//! A [`RecordStore`] is loaded once from a spreadsheet or CSV export,
//! normalizes every row into an [`Incident`], and is read-only from then
//! on. It has no interior mutability, so one loaded instance can be
//! handed to any number of readers behind an `Arc`.

pub mod columns;
#[cfg(test)]
mod fixtures;
pub mod parsing;
pub mod progress;
pub mod reader;

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use crime_dash_incident_models::Incident;
use thiserror::Error;

pub use columns::ColumnMapping;
use parsing::{parse_date_cell, parse_label, parse_lat_lng};
use progress::LoadProgress;
use reader::Table;

/// Rows between progress updates while normalizing.
const PROGRESS_BATCH: usize = 1_000;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O error (missing or unreadable file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet could not be opened or parsed.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File extension is not a supported source format.
    #[error("Unsupported source format: '{extension}'")]
    UnsupportedFormat {
        /// The rejected extension (lowercased, may be empty).
        extension: String,
    },

    /// Spreadsheet has no worksheets.
    #[error("Spreadsheet contains no worksheets")]
    EmptyWorkbook,

    /// A required column is missing from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Header name that was looked for.
        column: String,
    },

    /// The date column is absent, so no date can be parsed.
    #[error("Date column '{column}' is missing")]
    MissingDateColumn {
        /// Header name that was looked for.
        column: String,
    },

    /// No row had a parseable value in the date column.
    #[error("Column '{column}' has no parseable dates ({rows} rows checked)")]
    ParseError {
        /// Header name of the date column.
        column: String,
        /// Number of rows that were checked.
        rows: usize,
    },

    /// Column mapping configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Coarse classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// The source could not be read.
    Source,
    /// A required column is absent.
    MissingColumn,
    /// Dates could not be parsed, including a missing date column.
    ParseError,
    /// Configuration is invalid.
    Config,
}

impl LoadError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> LoadErrorKind {
        match self {
            Self::Io(_)
            | Self::Spreadsheet(_)
            | Self::Csv(_)
            | Self::UnsupportedFormat { .. }
            | Self::EmptyWorkbook => LoadErrorKind::Source,
            Self::MissingColumn { .. } => LoadErrorKind::MissingColumn,
            Self::MissingDateColumn { .. } | Self::ParseError { .. } => LoadErrorKind::ParseError,
            Self::Config { .. } => LoadErrorKind::Config,
        }
    }
}

/// The full, immutable set of incidents for a session.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    incidents: Vec<Incident>,
}

impl RecordStore {
    /// Loads and normalizes every row of the source at `path`.
    ///
    /// Rows with an unparseable date or a blank crime type or area are
    /// skipped. The load fails only if the source cannot be read, a
    /// required column is missing, or not a single row has a usable date.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] on any of the fatal conditions above.
    pub fn load(
        path: &Path,
        columns: &ColumnMapping,
        progress: &dyn LoadProgress,
    ) -> Result<Self, LoadError> {
        log::info!("Loading incidents from {}", path.display());
        progress.reading(path);

        let store = reader::read_table(path)
            .and_then(|table| {
                let store = Self::from_table(&table, columns, progress)?;
                let skipped = table.rows.len() - store.len();
                progress.loaded(store.len() as u64, skipped as u64);
                Ok(store)
            })
            .inspect_err(|_| progress.abandoned())?;

        log::info!(
            "Loaded {} incidents ({} crime types, {} areas) from {}",
            store.len(),
            store.crime_types().len(),
            store.area_names().len(),
            path.display()
        );

        Ok(store)
    }

    /// Normalizes an already-read table.
    ///
    /// Reports `rows_found` and `rows_normalized` to `progress`; the
    /// final event is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingColumn`],
    /// [`LoadError::MissingDateColumn`] or [`LoadError::ParseError`].
    pub fn from_table(
        table: &Table,
        columns: &ColumnMapping,
        progress: &dyn LoadProgress,
    ) -> Result<Self, LoadError> {
        let cols = columns.resolve(&table.headers)?;
        progress.rows_found(table.rows.len() as u64);

        let mut incidents = Vec::with_capacity(table.rows.len());
        let mut bad_dates = 0usize;
        let mut blank_labels = 0usize;

        for (i, row) in table.rows.iter().enumerate() {
            if i > 0 && i % PROGRESS_BATCH == 0 {
                progress.rows_normalized(i as u64);
            }

            let Some(occurred_on) = parse_date_cell(Table::cell(row, cols.date)) else {
                log::debug!("Row {}: unparseable date, skipping", i + 2);
                bad_dates += 1;
                continue;
            };

            let (Some(crime_type), Some(area_name)) = (
                parse_label(Table::cell(row, cols.crime_type)),
                parse_label(Table::cell(row, cols.area_name)),
            ) else {
                log::debug!("Row {}: blank crime type or area, skipping", i + 2);
                blank_labels += 1;
                continue;
            };

            let outcome = parse_label(Table::optional_cell(row, cols.outcome));
            let (latitude, longitude) = parse_lat_lng(
                Table::optional_cell(row, cols.latitude),
                Table::optional_cell(row, cols.longitude),
            );

            incidents.push(
                Incident::new(crime_type, area_name, occurred_on)
                    .with_outcome(outcome)
                    .with_position(latitude, longitude),
            );
        }
        progress.rows_normalized(table.rows.len() as u64);

        if bad_dates > 0 && bad_dates == table.rows.len() {
            return Err(LoadError::ParseError {
                column: columns.date.clone(),
                rows: table.rows.len(),
            });
        }

        if bad_dates > 0 {
            log::warn!("Skipped {bad_dates} rows with unparseable dates");
        }
        if blank_labels > 0 {
            log::warn!("Skipped {blank_labels} rows with a blank crime type or area");
        }

        Ok(Self { incidents })
    }

    /// Builds a store from already-normalized incidents, preserving order.
    #[must_use]
    pub const fn from_incidents(incidents: Vec<Incident>) -> Self {
        Self { incidents }
    }

    /// All incidents in source order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of incidents.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the store holds no incidents.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Distinct crime types in first-seen order.
    #[must_use]
    pub fn crime_types(&self) -> Vec<&str> {
        distinct(self.incidents.iter().map(|i| i.crime_type.as_str()))
    }

    /// Distinct area names in first-seen order.
    #[must_use]
    pub fn area_names(&self) -> Vec<&str> {
        distinct(self.incidents.iter().map(|i| i.area_name.as_str()))
    }

    /// Earliest and latest occurrence dates, or `None` for an empty store.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.incidents.iter().map(|i| i.occurred_on).min()?;
        let max = self.incidents.iter().map(|i| i.occurred_on).max()?;
        Some((min, max))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Cell;
    use crate::progress::Silent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::from_text(s)
    }

    fn table(rows: Vec<Vec<Cell>>) -> Table {
        Table {
            headers: [
                "Crime type",
                "LSOA name",
                "Date",
                "Last outcome category",
                "Latitude",
                "Longitude",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            rows,
        }
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path =
            std::env::temp_dir().join(format!("crime_dash_store_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn normalizes_rows() {
        let t = table(vec![vec![
            text("Theft"),
            text("Norwich 001A"),
            text("2024-01-05"),
            text("Under investigation"),
            Cell::Number(52.63),
            Cell::Number(1.29),
        ]]);
        let store = RecordStore::from_table(&t, &ColumnMapping::default(), &Silent).unwrap();

        assert_eq!(store.len(), 1);
        let incident = &store.incidents()[0];
        assert_eq!(incident.crime_type, "Theft");
        assert_eq!(incident.area_name, "Norwich 001A");
        assert_eq!(incident.occurred_on, date(2024, 1, 5));
        assert_eq!(incident.month_bucket().to_string(), "2024-01");
        assert_eq!(incident.outcome_category.as_deref(), Some("Under investigation"));
        assert!(incident.coordinates().is_some());
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let t = table(vec![vec![
            text("Burglary"),
            text("AreaA"),
            text("2024-01-20"),
            Cell::Empty,
            Cell::Empty,
            text("1.29"),
        ]]);
        let store = RecordStore::from_table(&t, &ColumnMapping::default(), &Silent).unwrap();
        let incident = &store.incidents()[0];

        assert!(incident.outcome_category.is_none());
        assert!(incident.latitude.is_none());
        assert_eq!(incident.longitude, Some(1.29));
        assert!(incident.coordinates().is_none());
    }

    #[test]
    fn skips_rows_with_bad_dates_but_keeps_the_rest() {
        let t = table(vec![
            vec![text("Theft"), text("AreaA"), text("garbage")],
            vec![text("Theft"), text("AreaB"), text("2024-02-01")],
        ]);
        let store = RecordStore::from_table(&t, &ColumnMapping::default(), &Silent).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.incidents()[0].area_name, "AreaB");
    }

    #[test]
    fn entirely_unparseable_dates_fail_the_load() {
        let t = table(vec![
            vec![text("Theft"), text("AreaA"), text("garbage")],
            vec![text("Theft"), text("AreaB"), Cell::Empty],
        ]);
        let err =
            RecordStore::from_table(&t, &ColumnMapping::default(), &Silent).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::ParseError);
    }

    #[test]
    fn header_only_source_is_an_empty_store() {
        let store =
            RecordStore::from_table(&table(vec![]), &ColumnMapping::default(), &Silent)
                .unwrap();
        assert!(store.is_empty());
        assert!(store.date_range().is_none());
    }

    #[test]
    fn missing_required_column_fails_the_load() {
        let t = Table {
            headers: vec!["Crime type".to_string(), "Date".to_string()],
            rows: vec![],
        };
        let err =
            RecordStore::from_table(&t, &ColumnMapping::default(), &Silent).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::MissingColumn);
    }

    #[test]
    fn missing_date_column_is_a_parse_error() {
        let t = Table {
            headers: vec!["Crime type".to_string(), "LSOA name".to_string()],
            rows: vec![vec![text("Theft"), text("AreaA")]],
        };
        let err =
            RecordStore::from_table(&t, &ColumnMapping::default(), &Silent).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::ParseError);
        assert!(matches!(err, LoadError::MissingDateColumn { ref column } if column == "Date"));
    }

    #[test]
    fn accessors_report_distinct_values_and_bounds() {
        let store = RecordStore::from_incidents(vec![
            Incident::new("Theft", "AreaA", date(2024, 1, 5)),
            Incident::new("Burglary", "AreaA", date(2024, 1, 20)),
            Incident::new("Theft", "AreaB", date(2024, 2, 1)),
        ]);

        assert_eq!(store.crime_types(), vec!["Theft", "Burglary"]);
        assert_eq!(store.area_names(), vec!["AreaA", "AreaB"]);
        assert_eq!(
            store.date_range(),
            Some((date(2024, 1, 5), date(2024, 2, 1)))
        );
    }

    #[test]
    fn loads_csv_from_disk() {
        let path = write_temp(
            "incidents.csv",
            "Crime ID,Month,Date,Longitude,Latitude,LSOA name,Crime type,Last outcome category\n\
             a1,2024-01,2024-01-05,1.29,52.63,AreaA,Theft,Under investigation\n\
             a2,2024-01,2024-01-20,,,AreaA,Burglary,\n",
        );
        let store = RecordStore::load(&path, &ColumnMapping::default(), &Silent);
        std::fs::remove_file(&path).ok();
        let store = store.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.incidents()[0].coordinates().is_some());
        assert!(store.incidents()[1].coordinates().is_none());
        assert!(store.incidents()[1].outcome_category.is_none());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RecordStore::load(
            Path::new("/nonexistent/crime.csv"),
            &ColumnMapping::default(),
            &Silent,
        )
        .unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Source);
    }

    #[derive(Default)]
    struct Recorder(std::sync::Mutex<Vec<String>>);

    impl Recorder {
        fn push(&self, event: String) {
            self.0.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl LoadProgress for Recorder {
        fn reading(&self, _path: &Path) {
            self.push("reading".to_string());
        }
        fn rows_found(&self, rows: u64) {
            self.push(format!("found {rows}"));
        }
        fn rows_normalized(&self, done: u64) {
            self.push(format!("normalized {done}"));
        }
        fn loaded(&self, incidents: u64, skipped: u64) {
            self.push(format!("loaded {incidents}/{skipped}"));
        }
        fn abandoned(&self) {
            self.push("abandoned".to_string());
        }
    }

    #[test]
    fn load_reports_each_stage() {
        let path = write_temp(
            "stages.csv",
            "Crime type,LSOA name,Date
Theft,AreaA,2024-01-05
Theft,AreaA,soon
",
        );
        let recorder = Recorder::default();
        let store = RecordStore::load(&path, &ColumnMapping::default(), &recorder);
        std::fs::remove_file(&path).ok();

        assert_eq!(store.unwrap().len(), 1);
        assert_eq!(
            recorder.events(),
            vec!["reading", "found 2", "normalized 2", "loaded 1/1"]
        );
    }

    #[test]
    fn failed_load_is_abandoned() {
        let recorder = Recorder::default();
        RecordStore::load(
            Path::new("/nonexistent/crime.csv"),
            &ColumnMapping::default(),
            &recorder,
        )
        .unwrap_err();
        assert_eq!(recorder.events(), vec!["reading", "abandoned"]);
    }

    #[test]
    fn loads_xlsx_first_sheet_with_native_dates() {
        use fixtures::XlsxCell::{Blank, Date, Number, Text};

        // 45296 and 45312 are 2024-01-05 and 2024-01-21 as Excel serials.
        let path = fixtures::write_xlsx(
            "incidents",
            Some(&[
                vec![
                    Text("Date"),
                    Text("Longitude"),
                    Text("Latitude"),
                    Text("LSOA name"),
                    Text("Crime type"),
                    Text("Last outcome category"),
                ],
                vec![
                    Date(45296.0),
                    Number(1.29),
                    Number(52.63),
                    Text("AreaA"),
                    Text("Theft"),
                    Text("Under investigation"),
                ],
                vec![
                    Date(45312.0),
                    Blank,
                    Blank,
                    Text("AreaB"),
                    Text("Burglary"),
                    Blank,
                ],
                vec![Text("not a date"), Blank, Blank, Text("AreaB"), Text("Theft")],
            ]),
        );
        let store = RecordStore::load(&path, &ColumnMapping::default(), &Silent);
        std::fs::remove_file(&path).ok();
        let store = store.unwrap();

        assert_eq!(store.len(), 2);
        let first = &store.incidents()[0];
        assert_eq!(first.occurred_on, date(2024, 1, 5));
        assert_eq!(first.crime_type, "Theft");
        assert_eq!(first.outcome_category.as_deref(), Some("Under investigation"));
        assert!(first.coordinates().is_some());

        let second = &store.incidents()[1];
        assert_eq!(second.occurred_on, date(2024, 1, 21));
        assert!(second.coordinates().is_none());
        assert!(second.outcome_category.is_none());
        assert_eq!(
            store.date_range(),
            Some((date(2024, 1, 5), date(2024, 1, 21)))
        );
    }

    #[test]
    fn workbook_without_sheets_is_a_source_error() {
        let path = fixtures::write_xlsx("no_sheets", None);
        let err = RecordStore::load(&path, &ColumnMapping::default(), &Silent).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, LoadError::EmptyWorkbook));
        assert_eq!(err.kind(), LoadErrorKind::Source);
    }
}
