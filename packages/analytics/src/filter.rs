//! Filter engine.
//!
//! Applies a [`Selection`] to a [`RecordStore`], preserving store order.
//! The geospatial pass ([`with_coordinates`]) is a separate step so that
//! non-map aggregates keep incidents without coordinates.

use chrono::NaiveDate;
use crime_dash_analytics_models::{FilterOptions, GeoPoint, Selection, ViewProfile};
use crime_dash_incident_models::Incident;
use crime_dash_store::RecordStore;

/// The incidents that matched a selection, borrowed from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtered<'a> {
    incidents: Vec<&'a Incident>,
}

impl<'a> Filtered<'a> {
    /// Wraps an already-filtered sequence.
    #[must_use]
    pub const fn new(incidents: Vec<&'a Incident>) -> Self {
        Self { incidents }
    }

    /// Number of matching incidents.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Matching incidents in store order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Incident> + '_ {
        self.incidents.iter().copied()
    }

    /// Matching incidents as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[&'a Incident] {
        &self.incidents
    }
}

/// Returns `true` if `incident` satisfies every clause of `selection`.
#[must_use]
pub fn matches(incident: &Incident, selection: &Selection) -> bool {
    selection.crime_types.contains(&incident.crime_type)
        && selection
            .area_names
            .as_ref()
            .is_none_or(|areas| areas.contains(&incident.area_name))
        && selection.date_from <= incident.occurred_on
        && incident.occurred_on <= selection.date_to
}

/// Returns the incidents matching `selection`, in store order.
///
/// Inverted date bounds are not swapped; they simply match nothing.
#[must_use]
pub fn apply<'a>(store: &'a RecordStore, selection: &Selection) -> Filtered<'a> {
    if selection.is_inverted() {
        log::debug!(
            "Date range {} > {} is inverted; selection matches nothing",
            selection.date_from,
            selection.date_to
        );
    }

    let incidents: Vec<&Incident> = store
        .incidents()
        .iter()
        .filter(|incident| matches(incident, selection))
        .collect();

    log::trace!("Selection matched {}/{} incidents", incidents.len(), store.len());

    Filtered { incidents }
}

/// Keeps only incidents with both coordinates, as map points.
#[must_use]
pub fn with_coordinates(filtered: &Filtered<'_>) -> Vec<GeoPoint> {
    filtered
        .iter()
        .filter_map(|incident| {
            let position = incident.coordinates()?;
            Some(GeoPoint {
                latitude: position.latitude,
                longitude: position.longitude,
                crime_type: incident.crime_type.clone(),
                occurred_on: incident.occurred_on,
            })
        })
        .collect()
}

/// The session-start selection for `profile`: every crime type, every
/// area (when the profile filters on area), and the full date range.
///
/// An empty store yields the widest possible date range so the selection
/// is still well formed.
#[must_use]
pub fn default_selection(store: &RecordStore, profile: ViewProfile) -> Selection {
    let (date_from, date_to) = store
        .date_range()
        .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));

    let selection = Selection::new(store.crime_types(), date_from, date_to);

    if profile.has_area_filter() {
        selection.with_areas(store.area_names())
    } else {
        selection
    }
}

/// Values for populating selector widgets.
#[must_use]
pub fn filter_options(store: &RecordStore) -> FilterOptions {
    let range = store.date_range();
    FilterOptions {
        crime_types: store.crime_types().into_iter().map(str::to_string).collect(),
        area_names: store.area_names().into_iter().map(str::to_string).collect(),
        date_from: range.map(|(from, _)| from),
        date_to: range.map(|(_, to)| to),
    }
}
