//! Per-record resolution and (period, region) grouping.

use std::collections::BTreeMap;

use strike_map_pipeline_models::{AggregateRow, RawRecord, ResolvedRecord};
use strike_map_resolver::{Region, resolve};

use crate::coerce::{coerce_measure, is_missing_label};

/// Coerces a raw record's measures and resolves its location.
#[must_use]
pub fn resolve_record(raw: RawRecord) -> ResolvedRecord {
    ResolvedRecord {
        region: resolve(&raw.location),
        drone_count: coerce_measure(&raw.drone_count),
        fatality_count: coerce_measure(&raw.fatality_count),
        location: raw.location,
        period: raw.period,
    }
}

/// Resolves every record, preserving input order.
#[must_use]
pub fn resolve_records(raw: Vec<RawRecord>) -> Vec<ResolvedRecord> {
    let records: Vec<ResolvedRecord> = raw.into_iter().map(resolve_record).collect();

    let other = records.iter().filter(|r| r.region == Region::Other).count();
    log::info!(
        "Resolved {} records ({other} attributed to {})",
        records.len(),
        Region::Other
    );

    records
}

/// Groups records by (period, region) and sums both measures.
///
/// Returns one row per observed pair, ordered by period then region name.
/// Records whose period label is missing (empty or an NA spelling such as
/// `NA`, `NaN`, `null`) have no group and are left out.
#[must_use]
pub fn aggregate(records: &[ResolvedRecord]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(&str, Region), (f64, f64)> = BTreeMap::new();
    let mut unlabeled = 0_usize;

    for record in records {
        if is_missing_label(&record.period) {
            unlabeled += 1;
            continue;
        }
        let sums = groups
            .entry((record.period.as_str(), record.region))
            .or_insert((0.0, 0.0));
        sums.0 += record.drone_count;
        sums.1 += record.fatality_count;
    }

    if unlabeled > 0 {
        log::warn!("{unlabeled} records have no period label and were not aggregated");
    }

    groups
        .into_iter()
        .map(|((period, region), (drone_count, fatality_count))| AggregateRow {
            period: period.to_owned(),
            region,
            drone_count,
            fatality_count,
        })
        .collect()
}
