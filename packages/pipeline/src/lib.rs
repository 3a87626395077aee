#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident aggregation pipeline.
//!
//! Loads a CSV of incident records, coerces the two measure columns to
//! numbers, resolves every free-text location to a hub (or `Other`), and
//! sums both measures per (period, region). The pipeline is a pure
//! function of the input bytes and the [`PipelineConfig`]; [`PipelineCache`]
//! memoizes it per file.

pub mod aggregate;
pub mod cache;
pub mod coerce;
pub mod config;
pub mod load;
pub mod summary;

use std::path::{Path, PathBuf};

use strike_map_pipeline_models::{PipelineOutput, RawRecord};

pub use aggregate::{aggregate, resolve_record, resolve_records};
pub use cache::{CacheStats, PipelineCache};
pub use config::{CONFIG_ENV_VAR, ConfigError, PipelineConfig};
pub use summary::summarize;

/// Errors that can occur while loading and processing an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not well-formed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required columns are absent from the header row.
    #[error("missing required column(s): {}", missing.join(", "))]
    MissingColumns {
        /// Canonical names of the absent columns.
        missing: Vec<String>,
    },

    /// The pipeline config is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolves and aggregates already-loaded records.
#[must_use]
pub fn process(raw: Vec<RawRecord>) -> PipelineOutput {
    let records = resolve_records(raw);
    let aggregates = aggregate(&records);
    log::info!(
        "Aggregated {} records into {} rows",
        records.len(),
        aggregates.len()
    );
    PipelineOutput {
        records,
        aggregates,
    }
}

/// Runs the full pipeline over CSV bytes.
///
/// # Errors
///
/// Returns [`LoadError`] if the CSV cannot be parsed or lacks a required
/// column.
pub fn run_bytes(bytes: &[u8], config: &PipelineConfig) -> Result<PipelineOutput, LoadError> {
    let raw = load::parse_records(bytes, config)?;
    Ok(process(raw))
}

/// Reads `path` and runs the full pipeline over it.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, the CSV cannot be
/// parsed, or a required column is missing.
pub fn run_path(path: &Path, config: &PipelineConfig) -> Result<PipelineOutput, LoadError> {
    let bytes = load::read_input(path)?;
    run_bytes(&bytes, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strike_map_gazetteer::Hub;
    use strike_map_resolver::Region;

    const SAMPLE: &str = "\
Unnamed: 0,Region,month_year,Drone_Count,Fatality_Count
0,Kyiv,2023-05,3,1
1,Irpin,2023-05,2,0
2,Odesa port,2023-05,4,2
3,somewhere,2023-05,1,0
4,Lviv,2023-06,n/a,3
";

    #[allow(clippy::float_cmp)]
    #[test]
    fn runs_end_to_end() {
        let output = run_bytes(SAMPLE.as_bytes(), &PipelineConfig::default()).unwrap();
        assert_eq!(output.records.len(), 5);

        let keys: Vec<(&str, Region, f64)> = output
            .aggregates
            .iter()
            .map(|r| (r.period.as_str(), r.region, r.drone_count))
            .collect();
        assert_eq!(
            keys,
            [
                ("2023-05", Region::Hub(Hub::Kyiv), 5.0),
                ("2023-05", Region::Hub(Hub::Odesa), 4.0),
                ("2023-05", Region::Other, 1.0),
                ("2023-06", Region::Hub(Hub::Lviv), 0.0),
            ]
        );
    }

    #[test]
    fn resolved_records_keep_input_order_and_text() {
        let output = run_bytes(SAMPLE.as_bytes(), &PipelineConfig::default()).unwrap();
        let locations: Vec<&str> = output
            .records
            .iter()
            .map(|r| r.location.as_str())
            .collect();
        assert_eq!(
            locations,
            ["Kyiv", "Irpin", "Odesa port", "somewhere", "Lviv"]
        );
        assert_eq!(output.records[1].region, Region::Hub(Hub::Kyiv));
    }

    #[test]
    fn run_is_deterministic() {
        let config = PipelineConfig::default();
        let a = run_bytes(SAMPLE.as_bytes(), &config).unwrap();
        let b = run_bytes(SAMPLE.as_bytes(), &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_column_message_names_columns() {
        let err = run_bytes(
            b"Region,month_year\nKyiv,2023-01\n",
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required column(s): Drone_Count, Fatality_Count"
        );
    }

    #[test]
    fn run_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master_data.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let output = run_path(&path, &PipelineConfig::default()).unwrap();
        assert_eq!(output.aggregates.len(), 4);
    }

    #[test]
    fn unreadable_path_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = run_path(&path, &PipelineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }
}
