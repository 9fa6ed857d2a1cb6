//! Events emitted while a dataset is loaded.
//!
//! [`RecordStore::load`](crate::RecordStore::load) reports each stage
//! through a [`LoadProgress`], so a terminal front end can draw a row
//! counter while the server loads with [`Silent`].

use std::path::Path;

/// Receives loader events in order: `reading`, `rows_found`, any number
/// of `rows_normalized`, then exactly one of `loaded` or `abandoned`.
pub trait LoadProgress {
    /// The source at `path` is being opened and read.
    fn reading(&self, path: &Path);

    /// The source was read and holds `rows` data rows.
    fn rows_found(&self, rows: u64);

    /// `done` rows have been normalized so far.
    fn rows_normalized(&self, done: u64);

    /// The store holds `incidents` records; `skipped` rows were dropped.
    fn loaded(&self, incidents: u64, skipped: u64);

    /// The load failed.
    fn abandoned(&self);
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl LoadProgress for Silent {
    fn reading(&self, _path: &Path) {}
    fn rows_found(&self, _rows: u64) {}
    fn rows_normalized(&self, _done: u64) {}
    fn loaded(&self, _incidents: u64, _skipped: u64) {}
    fn abandoned(&self) {}
}
