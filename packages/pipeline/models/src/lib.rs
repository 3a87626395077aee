#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types flowing through the strike map pipeline.
//!
//! A load produces [`RawRecord`]s straight from the CSV, which are coerced
//! and resolved into [`ResolvedRecord`]s, grouped into [`AggregateRow`]s,
//! and finally condensed into a [`DashboardSummary`] for presentation.
//! None of these are persisted; every load rebuilds them from the input.

use serde::Serialize;
use strike_map_gazetteer::Hub;
use strike_map_geo::Coordinate;
use strike_map_resolver::Region;

/// One input row as read from the CSV, before any coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Free-text location.
    pub location: String,
    /// Period label (e.g. "2023-05"), carried through untouched.
    pub period: String,
    /// Drone-count cell as written in the file.
    pub drone_count: String,
    /// Fatality-count cell as written in the file.
    pub fatality_count: String,
}

/// A [`RawRecord`] with numeric measures and an assigned region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRecord {
    /// Free-text location, as read.
    pub location: String,
    /// Period label.
    pub period: String,
    /// Coerced drone count (0 when the cell was not numeric).
    pub drone_count: f64,
    /// Coerced fatality count (0 when the cell was not numeric).
    pub fatality_count: f64,
    /// Region the location resolved to.
    pub region: Region,
}

/// Summed measures for one (period, region) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRow {
    /// Period label.
    pub period: String,
    /// Region.
    pub region: Region,
    /// Sum of drone counts.
    pub drone_count: f64,
    /// Sum of fatality counts.
    pub fatality_count: f64,
}

/// Everything one load-and-aggregate pass produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Per-record resolved table, in input order.
    pub records: Vec<ResolvedRecord>,
    /// Aggregate rows ordered by period, then region name.
    pub aggregates: Vec<AggregateRow>,
}

/// Drone and fatality totals at one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPoint {
    /// Period label.
    pub period: String,
    /// Drone count in this period.
    pub drone_count: f64,
    /// Fatality count in this period.
    pub fatality_count: f64,
}

/// A hub plotted on the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Hub being plotted.
    pub hub: Hub,
    /// Where to plot it.
    pub coordinate: Coordinate,
    /// Total drones across all periods (marker size).
    pub drone_count: f64,
    /// Total fatalities across all periods (marker color).
    pub fatality_count: f64,
}

/// Time series for a single active hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSeries {
    /// The hub.
    pub hub: Hub,
    /// Total drones across all periods.
    pub drone_count: f64,
    /// Total fatalities across all periods.
    pub fatality_count: f64,
    /// Per-period totals, sorted ascending by period label.
    pub points: Vec<PeriodPoint>,
}

/// Presentation-facing view of an aggregate: national metrics, the
/// heatmap and per-hub timelines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sum of drone counts over every region, including `Other`.
    pub total_drones: f64,
    /// Sum of fatality counts over every region, including `Other`.
    pub total_fatalities: f64,
    /// Hubs with a positive drone total, in gazetteer order.
    pub active_hubs: Vec<Hub>,
    /// One heatmap point per active hub.
    pub map_points: Vec<MapPoint>,
    /// One timeline per active hub.
    pub hub_series: Vec<HubSeries>,
}
