// Aggregator - Resample a measurement series into mean buckets
use crate::domain::bucket::{Bucket, BucketSeries};
use crate::domain::error::KpiError;
use crate::domain::granularity::Granularity;
use crate::domain::measurement::MeasurementSeries;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Mean of `column` per period, oldest period first.
///
/// Records missing `column` are ignored, and a period without any value is
/// omitted. Fails only when a non-empty series has no record carrying `column`.
pub fn aggregate(
    series: &MeasurementSeries,
    column: &str,
    granularity: Granularity,
) -> Result<BucketSeries, KpiError> {
    if series.is_empty() {
        return Ok(BucketSeries::default());
    }
    if !series.has_column(column) {
        return Err(KpiError::UnknownColumn(column.to_string()));
    }

    let mut sums: BTreeMap<DateTime<Utc>, (f64, usize)> = BTreeMap::new();
    for record in series.records() {
        if let Some(value) = record.value(column) {
            let entry = sums
                .entry(granularity.bucket_start(record.timestamp))
                .or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let buckets: Vec<Bucket> = sums
        .into_iter()
        .map(|(start, (sum, count))| Bucket::new(start, sum / count as f64))
        .collect();

    tracing::debug!(
        "Aggregated {} records of '{}' into {} {} buckets",
        series.len(),
        column,
        buckets.len(),
        granularity.label()
    );

    Ok(BucketSeries::new(buckets))
}
