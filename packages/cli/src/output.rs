//! Rendering of pipeline results as plain-text tables, CSV, or JSON.

use std::error::Error;
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;
use strike_map_gazetteer::{Hub, TOWNS};
use strike_map_pipeline_models::{AggregateRow, DashboardSummary, ResolvedRecord};
use strike_map_resolver::{MatchRule, Resolution, nearest_hub};

/// Output format for tabular results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Aligned plain-text columns
    #[default]
    Table,
    /// CSV with a header row
    Csv,
    /// Pretty-printed JSON array
    Json,
}

/// Output format for the dashboard summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummaryFormat {
    /// Plain-text report
    #[default]
    Table,
    /// Pretty-printed JSON object
    Json,
}

type OutputResult = Result<(), Box<dyn Error>>;

fn write_csv<W: Write, T: Serialize>(out: &mut W, rows: &[T]) -> OutputResult {
    let mut writer = csv::Writer::from_writer(&mut *out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> OutputResult {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Writes aggregate rows.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_aggregates<W: Write>(
    out: &mut W,
    rows: &[AggregateRow],
    format: Format,
) -> OutputResult {
    match format {
        Format::Csv => write_csv(out, rows),
        Format::Json => write_json(out, rows),
        Format::Table => {
            writeln!(
                out,
                "{:<10} {:<14} {:>10} {:>10}",
                "PERIOD", "REGION", "DRONES", "FATALITIES"
            )?;
            writeln!(out, "{}", "-".repeat(47))?;
            for row in rows {
                writeln!(
                    out,
                    "{:<10} {:<14} {:>10} {:>10}",
                    row.period,
                    row.region.name(),
                    row.drone_count,
                    row.fatality_count
                )?;
            }
            Ok(())
        }
    }
}

/// Writes the per-record resolved table.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_records<W: Write>(
    out: &mut W,
    records: &[ResolvedRecord],
    format: Format,
) -> OutputResult {
    match format {
        Format::Csv => write_csv(out, records),
        Format::Json => write_json(out, records),
        Format::Table => {
            writeln!(
                out,
                "{:<30} {:<10} {:>10} {:>10} REGION",
                "LOCATION", "PERIOD", "DRONES", "FATALITIES"
            )?;
            writeln!(out, "{}", "-".repeat(78))?;
            for record in records {
                writeln!(
                    out,
                    "{:<30} {:<10} {:>10} {:>10} {}",
                    record.location,
                    record.period,
                    record.drone_count,
                    record.fatality_count,
                    record.region
                )?;
            }
            Ok(())
        }
    }
}

/// Writes the dashboard summary.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_summary<W: Write>(
    out: &mut W,
    summary: &DashboardSummary,
    format: SummaryFormat,
) -> OutputResult {
    if format == SummaryFormat::Json {
        return write_json(out, summary);
    }

    writeln!(out, "Total drones:      {}", summary.total_drones)?;
    writeln!(out, "Total fatalities:  {}", summary.total_fatalities)?;
    writeln!(
        out,
        "Active hubs:       {} of {}",
        summary.active_hubs.len(),
        Hub::all().len()
    )?;

    if summary.map_points.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:<14} {:<20} {:>10} {:>10}",
        "HUB", "COORDINATE", "DRONES", "FATALITIES"
    )?;
    writeln!(out, "{}", "-".repeat(57))?;
    for point in &summary.map_points {
        writeln!(
            out,
            "{:<14} {:<20} {:>10} {:>10}",
            point.hub.name(),
            point.coordinate.to_string(),
            point.drone_count,
            point.fatality_count
        )?;
    }

    for series in &summary.hub_series {
        writeln!(out)?;
        writeln!(out, "{}", series.hub)?;
        for point in &series.points {
            writeln!(
                out,
                "  {:<10} {:>10} {:>10}",
                point.period, point.drone_count, point.fatality_count
            )?;
        }
    }

    Ok(())
}

/// Writes one line per input explaining how it resolved.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_resolutions<W: Write>(
    out: &mut W,
    resolutions: &[(String, Resolution)],
) -> OutputResult {
    for (input, resolution) in resolutions {
        let how = match resolution.rule {
            MatchRule::HubName => "hub name".to_string(),
            MatchRule::Town { town, distance_km } => format!("town {town:?}, {distance_km:.1} km"),
            MatchRule::Unmatched => "no match".to_string(),
        };
        writeln!(out, "{input:?} -> {} ({how})", resolution.region)?;
    }
    Ok(())
}

/// Lists the hubs in resolver order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_hubs<W: Write>(out: &mut W) -> OutputResult {
    writeln!(out, "{:<14} COORDINATE", "HUB")?;
    writeln!(out, "{}", "-".repeat(34))?;
    for hub in Hub::all() {
        writeln!(out, "{:<14} {}", hub.name(), hub.coordinate())?;
    }
    Ok(())
}

/// Lists the towns in resolver order with the hub each is attributed to.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_towns<W: Write>(out: &mut W) -> OutputResult {
    writeln!(
        out,
        "{:<16} {:<22} {:<20} NEAREST HUB",
        "TOWN", "GROUP", "COORDINATE"
    )?;
    writeln!(out, "{}", "-".repeat(84))?;
    for town in TOWNS {
        let nearest = nearest_hub(town.coordinate).map_or_else(
            || "-".to_string(),
            |(hub, distance_km)| format!("{hub} ({distance_km:.1} km)"),
        );
        writeln!(
            out,
            "{:<16} {:<22} {:<20} {nearest}",
            town.name,
            town.group.as_ref(),
            town.coordinate.to_string()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strike_map_pipeline::{PipelineConfig, run_bytes, summarize};
    use strike_map_pipeline_models::PipelineOutput;
    use strike_map_resolver::explain;

    const SAMPLE: &str = "\
Region,month_year,Drone_Count,Fatality_Count
Kyiv,2023-05,3,1
Irpin,2023-05,2,0
Odesa port,2023-06,4,2
somewhere,2023-06,1,0
";

    fn sample() -> PipelineOutput {
        run_bytes(SAMPLE.as_bytes(), &PipelineConfig::default()).unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> OutputResult) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn aggregate_csv_has_header_and_rows() {
        let output = sample();
        let text = render(|out| write_aggregates(out, &output.aggregates, Format::Csv));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "period,region,droneCount,fatalityCount",
                "2023-05,Kyiv,5.0,1.0",
                "2023-06,Odesa,4.0,2.0",
                "2023-06,Other,1.0,0.0",
            ]
        );
    }

    #[test]
    fn aggregate_json_is_an_array_of_rows() {
        let output = sample();
        let text = render(|out| write_aggregates(out, &output.aggregates, Format::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["region"], "Kyiv");
        assert_eq!(rows[0]["droneCount"], 5.0);
    }

    #[test]
    fn aggregate_table_lists_every_row() {
        let output = sample();
        let text = render(|out| write_aggregates(out, &output.aggregates, Format::Table));
        assert!(text.starts_with("PERIOD"));
        assert_eq!(text.lines().count(), 2 + output.aggregates.len());
        assert!(text.contains("Other"));
    }

    #[test]
    fn record_table_shows_assigned_region() {
        let output = sample();
        let text = render(|out| write_records(out, &output.records, Format::Table));
        let irpin = text.lines().find(|l| l.starts_with("Irpin")).unwrap();
        assert!(irpin.ends_with("Kyiv"));
    }

    #[test]
    fn summary_json_has_active_hubs() {
        let output = sample();
        let summary = summarize(&output.aggregates);
        let text = render(|out| write_summary(out, &summary, SummaryFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["activeHubs"], serde_json::json!(["Kyiv", "Odesa"]));
        assert_eq!(value["totalDrones"], 10.0);
    }

    #[test]
    fn summary_table_reports_totals() {
        let output = sample();
        let summary = summarize(&output.aggregates);
        let text = render(|out| write_summary(out, &summary, SummaryFormat::Table));
        assert!(text.contains("Total drones:      10"));
        assert!(text.contains("Active hubs:       2 of 15"));
    }

    #[test]
    fn resolutions_name_the_rule() {
        let inputs = ["Kyiv", "Irpin", "nowhere"];
        let resolutions: Vec<(String, Resolution)> = inputs
            .iter()
            .map(|s| ((*s).to_string(), explain(s)))
            .collect();
        let text = render(|out| write_resolutions(out, &resolutions));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "\"Kyiv\" -> Kyiv (hub name)");
        assert!(lines[1].starts_with("\"Irpin\" -> Kyiv (town \"irpin\", "));
        assert_eq!(lines[2], "\"nowhere\" -> Other (no match)");
    }

    #[test]
    fn listings_cover_gazetteer() {
        let hubs = render(write_hubs);
        assert_eq!(hubs.lines().count(), 2 + Hub::all().len());
        assert!(hubs.contains("Kryvyi Rih"));

        let towns = render(write_towns);
        assert_eq!(towns.lines().count(), 2 + TOWNS.len());
        assert!(towns.contains("Kyiv region"));
    }
}
