//! CSV loading.
//!
//! Reads the whole input once, drops leftover index columns, maps the
//! configured headers onto [`RawRecord`] fields, and fails fast when a
//! required column is missing. Cell values are kept as text; numeric
//! coercion happens later in [`crate::coerce`].

use std::path::Path;

use strike_map_pipeline_models::RawRecord;

use crate::LoadError;
use crate::config::PipelineConfig;

/// Positions of the required columns within a CSV header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndices {
    location: usize,
    period: usize,
    drone_count: usize,
    fatality_count: usize,
}

/// Reads the input artifact in a single bulk read.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read.
pub fn read_input(path: &Path) -> Result<Vec<u8>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Parses CSV bytes into raw records.
///
/// # Errors
///
/// Returns [`LoadError`] if the config is invalid, the CSV is malformed, or
/// a required column is missing. A header row with no data rows is not an
/// error and yields an empty `Vec`.
pub fn parse_records(bytes: &[u8], config: &PipelineConfig) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let indices = locate_columns(&headers, config)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let cell = |i: usize| row.get(i).unwrap_or("").to_owned();
        records.push(RawRecord {
            location: cell(indices.location),
            period: cell(indices.period),
            drone_count: cell(indices.drone_count),
            fatality_count: cell(indices.fatality_count),
        });
    }

    log::info!("Parsed {} records", records.len());

    Ok(records)
}

/// Finds the required columns after dropping headers that match the
/// config's drop pattern.
fn locate_columns(headers: &[String], config: &PipelineConfig) -> Result<ColumnIndices, LoadError> {
    let drop = config.drop_regex()?;
    let columns = &config.columns;

    let kept: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            let dropped = drop.is_match(name);
            if dropped {
                log::debug!("Dropping column {name:?}");
            }
            !dropped
        })
        .map(|(i, name)| (i, name.as_str()))
        .collect();

    let find = |wanted: &str| {
        kept.iter()
            .find(|(_, name)| *name == wanted)
            .map(|(i, _)| *i)
    };

    let canonical = find(&columns.region);
    let alias = columns
        .region_aliases
        .iter()
        .find_map(|alias| find(alias).map(|index| (alias, index)));
    if canonical.is_some()
        && let Some((alias, _)) = alias
    {
        log::warn!(
            "Both {:?} and alias {alias:?} present; using {:?}",
            columns.region,
            columns.region
        );
    }

    let location = canonical.or_else(|| alias.map(|(_, index)| index));
    let period = find(&columns.period);
    let drone_count = find(&columns.drone_count);
    let fatality_count = find(&columns.fatality_count);

    if let (Some(location), Some(period), Some(drone_count), Some(fatality_count)) =
        (location, period, drone_count, fatality_count)
    {
        Ok(ColumnIndices {
            location,
            period,
            drone_count,
            fatality_count,
        })
    } else {
        let missing = [
            (location, &columns.region),
            (period, &columns.period),
            (drone_count, &columns.drone_count),
            (fatality_count, &columns.fatality_count),
        ]
        .into_iter()
        .filter(|(index, _)| index.is_none())
        .map(|(_, name)| name.clone())
        .collect();
        Err(LoadError::MissingColumns { missing })
    }
}
