//! Conversion of caller-supplied text into a [`Selection`] and
//! [`ViewOptions`].
//!
//! Absent values fall back to the session defaults (every value, full
//! date range). A value that is present but empty is honored as an empty
//! set, which matches nothing.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use crime_dash_analytics_models::{
    DEFAULT_TOP_N, MAX_TOP_N, MapMode, Selection, ViewOptions, ViewProfile,
};
use crime_dash_store::RecordStore;

use crate::AnalyticsError;
use crate::filter::default_selection;

/// Parses a date string like `"2024-01-01"`.
///
/// A trailing time component (`"2024-01-01T00:00:00"`, optionally with
/// an RFC 3339 offset) is accepted and discarded.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidDate`] if the string is not a date.
pub fn parse_date(s: &str) -> Result<NaiveDate, AnalyticsError> {
    let s = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| AnalyticsError::InvalidDate {
        value: s.to_string(),
        message: e.to_string(),
    })
}

/// Validates a requested top-N, defaulting to [`DEFAULT_TOP_N`].
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidParameter`] outside `1..=MAX_TOP_N`.
pub fn parse_top_n(top_n: Option<usize>) -> Result<usize, AnalyticsError> {
    match top_n {
        None => Ok(DEFAULT_TOP_N),
        Some(n) if (1..=MAX_TOP_N).contains(&n) => Ok(n),
        Some(n) => Err(AnalyticsError::InvalidParameter {
            name: "topN".to_string(),
            message: format!("{n} is outside 1..={MAX_TOP_N}"),
        }),
    }
}

/// Parses a view profile name (`dashboard`, `heatmap`, `full`).
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidParameter`] for an unknown name.
pub fn parse_profile(s: &str) -> Result<ViewProfile, AnalyticsError> {
    s.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| AnalyticsError::InvalidParameter {
            name: "profile".to_string(),
            message: format!("unknown profile '{s}' (expected dashboard, heatmap or full)"),
        })
}

/// Parses a map mode name (`density`, `points`). `heatmap` and `scatter`
/// are accepted as aliases.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidParameter`] for an unknown name.
pub fn parse_map_mode(s: &str) -> Result<MapMode, AnalyticsError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "heatmap" => Ok(MapMode::Density),
        "scatter" => Ok(MapMode::Points),
        other => other.parse().map_err(|_| AnalyticsError::InvalidParameter {
            name: "mapMode".to_string(),
            message: format!("unknown map mode '{s}' (expected density or points)"),
        }),
    }
}

/// Filter values as supplied by a caller, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionInput {
    /// Crime types; `None` selects every crime type in the store.
    pub crime_types: Option<BTreeSet<String>>,
    /// Areas; `None` selects every area in the store.
    pub area_names: Option<BTreeSet<String>>,
    /// Lower bound (`YYYY-MM-DD`); `None` uses the earliest date.
    pub date_from: Option<String>,
    /// Upper bound (`YYYY-MM-DD`); `None` uses the latest date.
    pub date_to: Option<String>,
}

impl SelectionInput {
    /// Resolves the input against `store` for `profile`.
    ///
    /// Profiles without an area dimension ignore `area_names`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidDate`] if a date bound is malformed.
    pub fn resolve(
        self,
        store: &RecordStore,
        profile: ViewProfile,
    ) -> Result<Selection, AnalyticsError> {
        let mut selection = default_selection(store, profile);

        if let Some(crime_types) = self.crime_types {
            selection.crime_types = crime_types;
        }
        if profile.has_area_filter()
            && let Some(area_names) = self.area_names
        {
            selection.area_names = Some(area_names);
        }
        if let Some(from) = self.date_from.as_deref() {
            selection.date_from = parse_date(from)?;
        }
        if let Some(to) = self.date_to.as_deref() {
            selection.date_to = parse_date(to)?;
        }

        Ok(selection)
    }
}

/// Builds [`ViewOptions`] from optional textual parameters.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidParameter`] for an unknown profile or
/// map mode, or an out-of-range top-N.
pub fn view_options(
    profile: Option<&str>,
    map_mode: Option<&str>,
    top_n: Option<usize>,
) -> Result<ViewOptions, AnalyticsError> {
    Ok(ViewOptions {
        profile: profile.map(parse_profile).transpose()?.unwrap_or_default(),
        map_mode: map_mode.map(parse_map_mode).transpose()?.unwrap_or_default(),
        top_n: parse_top_n(top_n)?,
    })
}
