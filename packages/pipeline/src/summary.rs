//! Presentation-facing summary of an aggregate.
//!
//! Hubs whose drone total is zero over the whole dataset are "inactive":
//! they get no heatmap point and no timeline. `Other` has no coordinate,
//! so it only ever contributes to the national totals.

use std::collections::BTreeMap;

use strike_map_gazetteer::Hub;
use strike_map_pipeline_models::{AggregateRow, DashboardSummary, HubSeries, MapPoint, PeriodPoint};

/// Builds the dashboard summary from aggregate rows.
#[must_use]
pub fn summarize(aggregates: &[AggregateRow]) -> DashboardSummary {
    let total_drones: f64 = aggregates.iter().map(|r| r.drone_count).sum();
    let total_fatalities: f64 = aggregates.iter().map(|r| r.fatality_count).sum();

    let series = hub_series(aggregates);
    let active_hubs: Vec<Hub> = series.iter().map(|s| s.hub).collect();

    let map_points = series
        .iter()
        .map(|s| MapPoint {
            hub: s.hub,
            coordinate: s.hub.coordinate(),
            drone_count: s.drone_count,
            fatality_count: s.fatality_count,
        })
        .collect();

    log::debug!("{} of {} hubs active", active_hubs.len(), Hub::all().len());

    DashboardSummary {
        total_drones,
        total_fatalities,
        active_hubs,
        map_points,
        hub_series: series,
    }
}

/// Per-hub timelines for hubs with a positive drone total, in gazetteer
/// order.
#[must_use]
pub fn hub_series(aggregates: &[AggregateRow]) -> Vec<HubSeries> {
    Hub::all()
        .iter()
        .filter_map(|hub| {
            let mut by_period: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
            for row in aggregates.iter().filter(|r| r.region.hub() == Some(*hub)) {
                let sums = by_period.entry(row.period.as_str()).or_insert((0.0, 0.0));
                sums.0 += row.drone_count;
                sums.1 += row.fatality_count;
            }

            let drone_count: f64 = by_period.values().map(|(d, _)| d).sum();
            if drone_count <= 0.0 {
                return None;
            }
            let fatality_count: f64 = by_period.values().map(|(_, f)| f).sum();

            let points = by_period
                .into_iter()
                .map(|(period, (drone_count, fatality_count))| PeriodPoint {
                    period: period.to_owned(),
                    drone_count,
                    fatality_count,
                })
                .collect();

            Some(HubSeries {
                hub: *hub,
                drone_count,
                fatality_count,
                points,
            })
        })
        .collect()
}
