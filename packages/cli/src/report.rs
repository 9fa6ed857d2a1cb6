//! Plain-text rendering of views and filter options.

use std::fmt::Write as _;

use crime_dash_analytics_models::{CategoryCount, DashboardView, FilterOptions, MapView};

const RULE_WIDTH: usize = 50;

fn rule(out: &mut String) {
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
}

fn counts_table(out: &mut String, title: &str, heading: &str, rows: &[CategoryCount]) {
    let _ = writeln!(out, "\n{title}");
    let _ = writeln!(out, "{heading:<40} {:>9}", "COUNT");
    rule(out);
    if rows.is_empty() {
        out.push_str("(none)\n");
    }
    for row in rows {
        let _ = writeln!(out, "{:<40} {:>9}", row.category, row.count);
    }
}

fn map_summary(out: &mut String, map: &MapView) {
    let _ = writeln!(out, "\nMap ({})", map.mode);
    rule(out);
    let _ = writeln!(out, "Located incidents: {}", map.points.len());
    match map.center {
        Some(center) => {
            let _ = writeln!(
                out,
                "Centre:            {:.5}, {:.5}",
                center.latitude, center.longitude
            );
        }
        None => out.push_str("Centre:            (no located incidents)\n"),
    }
}

/// Renders every panel present in `view`.
#[must_use]
pub fn render_view(view: &DashboardView) -> String {
    let mut out = String::new();
    let selection = &view.selection;

    let _ = writeln!(
        out,
        "Crime dashboard ({}) {} to {}",
        view.profile, selection.date_from, selection.date_to
    );
    rule(&mut out);

    if view.is_empty {
        out.push_str("No incidents match the current filters.\n");
        return out;
    }

    let _ = writeln!(out, "Total incidents:   {}", view.metrics.total);
    let _ = writeln!(out, "Crime types:       {}", view.metrics.distinct_crime_types);
    let _ = writeln!(out, "Areas:             {}", view.metrics.distinct_areas);

    if let Some(rows) = &view.top_crime_types {
        counts_table(&mut out, "Top crime types", "CRIME TYPE", rows);
    }
    if let Some(points) = &view.monthly_trend {
        let _ = writeln!(out, "\nMonthly trend\n{:<40} {:>9}", "MONTH", "COUNT");
        rule(&mut out);
        for point in points {
            let _ = writeln!(out, "{:<40} {:>9}", point.period.to_string(), point.count);
        }
    }
    if let Some(rows) = &view.top_areas {
        counts_table(&mut out, "Top areas", "AREA", rows);
    }
    if let Some(rows) = &view.outcomes {
        counts_table(&mut out, "Outcomes", "OUTCOME", rows);
    }
    if let Some(map) = &view.map {
        map_summary(&mut out, map);
    }

    out
}

/// Renders selector values and the dataset's date bounds.
#[must_use]
pub fn render_options(options: &FilterOptions) -> String {
    let mut out = String::new();

    match (options.date_from, options.date_to) {
        (Some(from), Some(to)) => {
            let _ = writeln!(out, "Dates: {from} to {to}");
        }
        _ => out.push_str("Dates: (no incidents)\n"),
    }

    let _ = writeln!(out, "\nCrime types ({})", options.crime_types.len());
    rule(&mut out);
    for crime_type in &options.crime_types {
        let _ = writeln!(out, "{crime_type}");
    }

    let _ = writeln!(out, "\nAreas ({})", options.area_names.len());
    rule(&mut out);
    for area in &options.area_names {
        let _ = writeln!(out, "{area}");
    }

    out
}
