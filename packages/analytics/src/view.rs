//! Assembles the panels a [`ViewProfile`] asks for into a [`DashboardView`].

use crime_dash_analytics_models::{
    CategoricalField, DashboardView, GeoPoint, MapMode, MapView, Selection, ViewOptions,
};
use crime_dash_incident_models::Coordinates;
use crime_dash_store::RecordStore;

use crate::aggregate::{monthly_trend, outcome_distribution, scalar_metrics, top_n};
use crate::filter::{Filtered, apply, with_coordinates};

/// Mean position of `points`, or `None` if there are none.
#[must_use]
pub fn map_center(points: &[GeoPoint]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.latitude, lng + p.longitude));

    Some(Coordinates {
        latitude: lat / n,
        longitude: lng / n,
    })
}

/// Map panel for `filtered`. Incidents without coordinates are left out.
#[must_use]
pub fn map_view(filtered: &Filtered<'_>, mode: MapMode) -> MapView {
    let points = with_coordinates(filtered);
    let center = map_center(&points);
    MapView {
        mode,
        points,
        center,
    }
}

/// Filters `store` by `selection` and derives every panel
/// `options.profile` includes.
///
/// The area clause is dropped for profiles without an area dimension.
#[must_use]
pub fn build_view(store: &RecordStore, selection: &Selection, options: ViewOptions) -> DashboardView {
    let profile = options.profile;
    let selection = if profile.has_area_filter() {
        selection.clone()
    } else {
        selection.clone().without_areas()
    };

    let filtered = apply(store, &selection);
    let charts = profile.has_charts();

    log::debug!(
        "Building {profile} view: {} of {} incidents selected",
        filtered.len(),
        store.len()
    );

    DashboardView {
        profile,
        is_empty: filtered.is_empty(),
        metrics: scalar_metrics(&filtered),
        top_crime_types: charts
            .then(|| top_n(&filtered, CategoricalField::CrimeType, options.top_n)),
        monthly_trend: charts.then(|| monthly_trend(&filtered)),
        top_areas: charts.then(|| top_n(&filtered, CategoricalField::AreaName, options.top_n)),
        outcomes: charts.then(|| outcome_distribution(&filtered, options.top_n)),
        map: profile
            .has_map()
            .then(|| map_view(&filtered, options.map_mode)),
        selection,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crime_dash_analytics_models::{DEFAULT_TOP_N, ViewProfile};
    use crime_dash_incident_models::Incident;

    use super::*;
    use crate::filter::default_selection;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> RecordStore {
        RecordStore::from_incidents(vec![
            Incident::new("Theft", "AreaA", date(2024, 1, 5))
                .with_outcome(Some("Under investigation".to_string()))
                .with_position(Some(52.0), Some(1.0)),
            Incident::new("Burglary", "AreaB", date(2024, 2, 10))
                .with_position(Some(54.0), Some(3.0)),
            Incident::new("Theft", "AreaB", date(2024, 2, 11)),
        ])
    }

    fn options(profile: ViewProfile) -> ViewOptions {
        ViewOptions {
            profile,
            ..ViewOptions::default()
        }
    }

    #[test]
    fn dashboard_has_charts_but_no_map() {
        let store = store();
        let selection = default_selection(&store, ViewProfile::Dashboard);
        let view = build_view(&store, &selection, options(ViewProfile::Dashboard));

        assert!(!view.is_empty);
        assert_eq!(view.metrics.total, 3);
        assert!(view.map.is_none());

        let crime_types = view.top_crime_types.unwrap();
        assert_eq!(crime_types[0].category, "Theft");
        assert_eq!(crime_types[0].count, 2);
        assert_eq!(view.monthly_trend.unwrap().len(), 2);
        assert_eq!(view.outcomes.unwrap().len(), 1);
    }

    #[test]
    fn heatmap_has_map_only_and_ignores_areas() {
        let store = store();
        let selection = default_selection(&store, ViewProfile::Full).with_areas(["AreaA"]);
        let view = build_view(&store, &selection, options(ViewProfile::Heatmap));

        assert!(view.selection.area_names.is_none());
        assert_eq!(view.metrics.total, 3);
        assert!(view.top_crime_types.is_none());
        assert!(view.monthly_trend.is_none());

        let map = view.map.unwrap();
        assert_eq!(map.mode, MapMode::Density);
        assert_eq!(map.points.len(), 2);
        let center = map.center.unwrap();
        assert!((center.latitude - 53.0).abs() < 1e-9);
        assert!((center.longitude - 2.0).abs() < 1e-9);
    }

    #[test]
    fn full_profile_has_everything() {
        let store = store();
        let selection = default_selection(&store, ViewProfile::Full);
        let view = build_view(
            &store,
            &selection,
            ViewOptions {
                profile: ViewProfile::Full,
                map_mode: MapMode::Points,
                top_n: 1,
            },
        );

        assert_eq!(view.top_areas.unwrap().len(), 1);
        assert_eq!(view.map.unwrap().mode, MapMode::Points);
    }

    #[test]
    fn empty_selection_sets_empty_signal() {
        let store = store();
        let selection = Selection::new(Vec::<String>::new(), date(2024, 1, 1), date(2024, 12, 31));
        let view = build_view(&store, &selection, options(ViewProfile::Full));

        assert!(view.is_empty);
        assert_eq!(view.metrics.total, 0);
        assert_eq!(view.top_crime_types, Some(Vec::new()));
        let map = view.map.unwrap();
        assert!(map.points.is_empty());
        assert!(map.center.is_none());
    }

    #[test]
    fn map_without_coordinates_is_empty_but_counts_remain() {
        let store = RecordStore::from_incidents(vec![
            Incident::new("Theft", "AreaA", date(2024, 1, 5)),
            Incident::new("Theft", "AreaA", date(2024, 1, 6)),
        ]);
        let selection = default_selection(&store, ViewProfile::Full);
        let view = build_view(&store, &selection, options(ViewProfile::Full));

        assert!(!view.is_empty);
        assert_eq!(view.metrics.total, 2);
        assert!(view.map.unwrap().points.is_empty());
    }

    #[test]
    fn top_n_default_applies_to_ranked_panels() {
        let incidents = (0..15)
            .map(|i| Incident::new(format!("type-{i}"), "AreaA", date(2024, 1, 5)))
            .collect();
        let store = RecordStore::from_incidents(incidents);
        let selection = default_selection(&store, ViewProfile::Dashboard);
        let view = build_view(&store, &selection, options(ViewProfile::Dashboard));

        assert_eq!(view.top_crime_types.unwrap().len(), DEFAULT_TOP_N);
    }
}
