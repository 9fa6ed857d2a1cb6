//! Aggregations over a filtered incident set.
//!
//! Ranked views break count ties by first-seen order in the filtered
//! sequence, which is store order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crime_dash_analytics_models::{CategoricalField, CategoryCount, ScalarMetrics, TimeSeriesPoint};
use crime_dash_incident_models::{Incident, MonthBucket};

use crate::filter::Filtered;

/// Total count plus distinct crime types and areas.
#[must_use]
pub fn scalar_metrics(filtered: &Filtered<'_>) -> ScalarMetrics {
    let crime_types: BTreeSet<&str> = filtered.iter().map(|i| i.crime_type.as_str()).collect();
    let areas: BTreeSet<&str> = filtered.iter().map(|i| i.area_name.as_str()).collect();

    ScalarMetrics {
        total: filtered.len() as u64,
        distinct_crime_types: crime_types.len() as u64,
        distinct_areas: areas.len() as u64,
    }
}

fn field_value(incident: &Incident, field: CategoricalField) -> Option<&str> {
    match field {
        CategoricalField::CrimeType => Some(incident.crime_type.as_str()),
        CategoricalField::AreaName => Some(incident.area_name.as_str()),
        CategoricalField::Outcome => incident.outcome_category.as_deref(),
    }
}

/// The `n` most frequent values of `field`, highest count first.
///
/// Incidents with no value for `field` are not counted.
#[must_use]
pub fn top_n(filtered: &Filtered<'_>, field: CategoricalField, n: usize) -> Vec<CategoryCount> {
    let mut counts: Vec<(&str, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for value in filtered.iter().filter_map(|i| field_value(i, field)) {
        if let Some(&pos) = index.get(value) {
            counts[pos].1 += 1;
        } else {
            index.insert(value, counts.len());
            counts.push((value, 1));
        }
    }

    // Stable sort: equal counts keep first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Incident counts per month, oldest first. Months with no incidents are
/// omitted.
#[must_use]
pub fn monthly_trend(filtered: &Filtered<'_>) -> Vec<TimeSeriesPoint> {
    let mut buckets: BTreeMap<MonthBucket, u64> = BTreeMap::new();
    for incident in filtered.iter() {
        *buckets.entry(incident.month_bucket()).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(period, count)| TimeSeriesPoint { period, count })
        .collect()
}

/// The `n` most common outcomes. Incidents without an outcome contribute
/// to no slice.
#[must_use]
pub fn outcome_distribution(filtered: &Filtered<'_>, n: usize) -> Vec<CategoryCount> {
    top_n(filtered, CategoricalField::Outcome, n)
}
