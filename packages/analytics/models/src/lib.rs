#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter selection and aggregate view types for the crime dashboard.
//!
//! Defines the inputs (a [`Selection`] plus [`ViewOptions`]) and outputs
//! (metrics, ranked counts, trend points, map points) of the filtering and
//! aggregation pipeline. Every type serializes to camelCase JSON so the
//! server can hand them to a front end unchanged.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use crime_dash_incident_models::{Coordinates, MonthBucket};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Number of entries kept by ranked (top-N) views unless overridden.
pub const DEFAULT_TOP_N: usize = 10;

/// Upper bound accepted for a caller-supplied top-N.
pub const MAX_TOP_N: usize = 100;

/// The filter predicates chosen for one render cycle.
///
/// All clauses are ANDed. An empty set matches nothing; it is never read
/// as "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Crime types to keep.
    pub crime_types: BTreeSet<String>,
    /// Areas to keep. `None` when the view has no area dimension.
    pub area_names: Option<BTreeSet<String>>,
    /// Inclusive lower date bound.
    pub date_from: NaiveDate,
    /// Inclusive upper date bound.
    pub date_to: NaiveDate,
}

impl Selection {
    /// Creates a selection over the given crime types and date range with
    /// no area dimension.
    #[must_use]
    pub fn new<I, S>(crime_types: I, date_from: NaiveDate, date_to: NaiveDate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            crime_types: crime_types.into_iter().map(Into::into).collect(),
            area_names: None,
            date_from,
            date_to,
        }
    }

    /// Adds (or replaces) the area dimension.
    #[must_use]
    pub fn with_areas<I, S>(mut self, area_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.area_names = Some(area_names.into_iter().map(Into::into).collect());
        self
    }

    /// Removes the area dimension.
    #[must_use]
    pub fn without_areas(mut self) -> Self {
        self.area_names = None;
        self
    }

    /// Whether the date bounds are inverted (`date_from > date_to`).
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.date_from > self.date_to
    }
}

/// A field that can be ranked by occurrence count.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoricalField {
    /// Crime category label.
    CrimeType,
    /// Area label.
    AreaName,
    /// Outcome label (nulls are never counted).
    Outcome,
}

/// Which optional dimensions a view includes.
///
/// Replaces three near-identical pages (dashboard, heatmap, and the
/// combined page) with one parameterized pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewProfile {
    /// Metrics and charts, filtered by crime type, area and date.
    Dashboard,
    /// Density map only, filtered by crime type and date.
    Heatmap,
    /// Metrics, charts and a map with a selectable mode.
    #[default]
    Full,
}

impl ViewProfile {
    /// Whether the view filters on area.
    #[must_use]
    pub const fn has_area_filter(self) -> bool {
        matches!(self, Self::Dashboard | Self::Full)
    }

    /// Whether the view includes the metric and chart panels.
    #[must_use]
    pub const fn has_charts(self) -> bool {
        matches!(self, Self::Dashboard | Self::Full)
    }

    /// Whether the view includes a map.
    #[must_use]
    pub const fn has_map(self) -> bool {
        matches!(self, Self::Heatmap | Self::Full)
    }
}

/// How a map renders its points.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MapMode {
    /// Density (heatmap) layer.
    #[default]
    Density,
    /// One marker per incident (scatter).
    Points,
}

/// Per-request knobs for building a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    /// Which panels to include.
    pub profile: ViewProfile,
    /// Map rendering mode (ignored when the profile has no map).
    pub map_mode: MapMode,
    /// Maximum entries in each ranked view.
    pub top_n: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            profile: ViewProfile::default(),
            map_mode: MapMode::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Headline numbers for a filtered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarMetrics {
    /// Number of incidents.
    pub total: u64,
    /// Number of distinct crime types.
    pub distinct_crime_types: u64,
    /// Number of distinct areas.
    pub distinct_areas: u64,
}

/// Count of incidents sharing one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Label as it appears in the dataset.
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// A monthly time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Month (`YYYY-MM`).
    pub period: MonthBucket,
    /// Incident count in this month.
    pub count: u64,
}

/// One located incident for a map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Crime type, for tooltips.
    pub crime_type: String,
    /// Occurrence date, for tooltips.
    pub occurred_on: NaiveDate,
}

/// Data for the map panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Rendering mode.
    pub mode: MapMode,
    /// Located incidents, in store order.
    pub points: Vec<GeoPoint>,
    /// Mean position of `points`; `None` when there are no points.
    pub center: Option<Coordinates>,
}

/// Every derived view for one selection.
///
/// Panels a profile does not include are `None`. `is_empty` is the
/// explicit "no data" signal for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Profile the view was built for.
    pub profile: ViewProfile,
    /// Selection the view was built from.
    pub selection: Selection,
    /// Whether no incident matched the selection.
    pub is_empty: bool,
    /// Headline numbers.
    pub metrics: ScalarMetrics,
    /// Most common crime types.
    pub top_crime_types: Option<Vec<CategoryCount>>,
    /// Monthly counts, oldest first.
    pub monthly_trend: Option<Vec<TimeSeriesPoint>>,
    /// Areas with the most incidents.
    pub top_areas: Option<Vec<CategoryCount>>,
    /// Most common outcomes.
    pub outcomes: Option<Vec<CategoryCount>>,
    /// Map panel.
    pub map: Option<MapView>,
}

/// Values used to populate selector widgets and seed the default
/// selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Distinct crime types, first-seen order.
    pub crime_types: Vec<String>,
    /// Distinct areas, first-seen order.
    pub area_names: Vec<String>,
    /// Earliest occurrence date.
    pub date_from: Option<NaiveDate>,
    /// Latest occurrence date.
    pub date_to: Option<NaiveDate>,
}
