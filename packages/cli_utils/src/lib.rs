#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the crime dashboard CLI: a row counter that
//! follows dataset loading, and a logger that pauses while bars redraw.

use std::path::Path;
use std::time::Duration;

use crime_dash_store::progress::LoadProgress;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Filter variable read by [`init_logger`].
pub const LOG_ENV: &str = "RUST_LOG";

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const ROWS_TEMPLATE: &str = "  {msg} {wide_bar:.cyan/dim} {pos}/{len} rows [{eta}]";

/// Shows dataset loading on the terminal.
///
/// Spins while the file is read, counts rows while they are normalized,
/// and leaves a one-line summary behind.
pub struct RowCounter {
    bar: ProgressBar,
}

impl RowCounter {
    /// Adds a spinner labelled `label` to `multi`.
    #[must_use]
    pub fn new(multi: &MultiProgress, label: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl LoadProgress for RowCounter {
    fn reading(&self, path: &Path) {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        self.bar.set_message(format!("Reading {name}"));
    }

    fn rows_found(&self, rows: u64) {
        self.bar.set_style(
            ProgressStyle::with_template(ROWS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        self.bar.set_length(rows);
        self.bar.set_position(0);
        self.bar.set_message("Normalizing");
    }

    fn rows_normalized(&self, done: u64) {
        self.bar.set_position(done);
    }

    fn loaded(&self, incidents: u64, skipped: u64) {
        let summary = if skipped == 0 {
            format!("Loaded {incidents} incidents")
        } else {
            format!("Loaded {incidents} incidents, skipped {skipped} rows")
        };
        self.bar.finish_with_message(summary);
    }

    fn abandoned(&self) {
        self.bar.finish_and_clear();
    }
}

/// Installs a `pretty_env_logger` behind `indicatif-log-bridge` and
/// returns the [`MultiProgress`] every bar must be added to.
///
/// Logs at `info` unless [`LOG_ENV`] says otherwise. A second call keeps
/// the first logger.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var(LOG_ENV) {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(log::LevelFilter::Info),
    };
    let logger = builder.build();
    let level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}
