#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the strike map pipeline.
//!
//! Every subcommand that reads a CSV loads and aggregates it in full before
//! writing anything, so a failed load produces no partial output.

mod output;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use strike_map_gazetteer::{Hub, TOWNS};
use strike_map_pipeline::{PipelineConfig, run_path, summarize};
use strike_map_pipeline_models::PipelineOutput;
use strike_map_resolver::{Resolution, explain};

use crate::output::{Format, SummaryFormat};

#[derive(Parser)]
#[command(
    name = "strike_map",
    about = "Aggregate drone-strike incident records by regional hub"
)]
struct Cli {
    /// Pipeline config file (overrides the `STRIKE_MAP_CONFIG` env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sum drone and fatality counts per period and region
    Aggregate {
        /// Incident CSV file
        csv: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Show every record with the region its location resolved to
    Resolved {
        /// Incident CSV file
        csv: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// National totals, active hubs, map points and per-hub timelines
    Summary {
        /// Incident CSV file
        csv: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: SummaryFormat,
    },
    /// Explain how location strings resolve
    Resolve {
        /// Free-text locations (e.g. "near Bakhmut")
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List hubs with their coordinates
    Hubs,
    /// List known towns with the hub each is attributed to
    Towns,
    /// Validate the gazetteer and the pipeline config
    Check,
}

fn load(csv: &Path, config: Option<&Path>) -> Result<PipelineOutput, Box<dyn std::error::Error>> {
    let config = PipelineConfig::resolve(config)?;
    let start = Instant::now();
    let output = run_path(csv, &config)?;
    log::info!(
        "Loaded {} in {:.1}s",
        csv.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(output)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Aggregate { csv, format } => {
            let output = load(&csv, config)?;
            output::write_aggregates(&mut out, &output.aggregates, format)?;
        }
        Commands::Resolved { csv, format } => {
            let output = load(&csv, config)?;
            output::write_records(&mut out, &output.records, format)?;
        }
        Commands::Summary { csv, format } => {
            let output = load(&csv, config)?;
            let summary = summarize(&output.aggregates);
            output::write_summary(&mut out, &summary, format)?;
        }
        Commands::Resolve { text } => {
            let resolutions: Vec<(String, Resolution)> = text
                .into_iter()
                .map(|t| {
                    let resolution = explain(&t);
                    (t, resolution)
                })
                .collect();
            output::write_resolutions(&mut out, &resolutions)?;
        }
        Commands::Hubs => output::write_hubs(&mut out)?,
        Commands::Towns => output::write_towns(&mut out)?,
        Commands::Check => {
            strike_map_gazetteer::validate()?;
            PipelineConfig::resolve(config)?;
            writeln!(
                out,
                "Gazetteer OK ({} hubs, {} towns); config OK",
                Hub::all().len(),
                TOWNS.len()
            )?;
        }
    }

    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_aggregate_with_format_and_global_config() {
        let cli = Cli::try_parse_from([
            "strike_map",
            "aggregate",
            "master_data.csv",
            "--format",
            "json",
            "--config",
            "layout.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("layout.toml")));
        let Commands::Aggregate { csv, format } = cli.command else {
            panic!("expected aggregate");
        };
        assert_eq!(csv, PathBuf::from("master_data.csv"));
        assert_eq!(format, Format::Json);
    }

    #[test]
    fn summary_rejects_csv_format() {
        assert!(
            Cli::try_parse_from(["strike_map", "summary", "x.csv", "--format", "csv"]).is_err()
        );
    }

    #[test]
    fn resolve_requires_text() {
        assert!(Cli::try_parse_from(["strike_map", "resolve"]).is_err());
    }

    #[test]
    fn load_failure_is_an_error() {
        let missing = PathBuf::from("definitely/not/here.csv");
        assert!(load(&missing, None).is_err());
    }
}
