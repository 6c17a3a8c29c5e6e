// KPI engine - Period-over-period statistics for one channel
use crate::application::aggregator::aggregate;
use crate::domain::bucket::{Bucket, BucketSeries};
use crate::domain::error::KpiError;
use crate::domain::granularity::Granularity;
use crate::domain::kpi::KpiResult;
use crate::domain::measurement::{Measurement, MeasurementSeries};
use crate::domain::statistics::WindowStats;
use chrono::NaiveDate;

/// Daily buckets making up the weekly view.
const DAYS_PER_WEEK: usize = 7;
/// Weekly buckets making up the monthly view.
const WEEKS_PER_MONTH: usize = 4;

/// Compute KPIs for `column` with a granularity code (`D`, `W`, `M`).
///
/// `Ok(None)` means there is not enough history to report anything; an
/// unrecognised code is an error even on an empty series.
pub fn compute_kpis(
    series: &MeasurementSeries,
    column: &str,
    granularity: &str,
) -> Result<Option<KpiResult>, KpiError> {
    let granularity: Granularity = granularity.parse()?;
    compute_kpis_for(series, column, granularity)
}

pub fn compute_kpis_for(
    series: &MeasurementSeries,
    column: &str,
    granularity: Granularity,
) -> Result<Option<KpiResult>, KpiError> {
    if series.is_empty() {
        tracing::debug!("No records, no KPIs for '{}'", column);
        return Ok(None);
    }
    if !series.has_column(column) {
        return Err(KpiError::UnknownColumn(column.to_string()));
    }

    let result = match granularity {
        Granularity::Day => daily_kpis(&series.sorted_records(), column),
        Granularity::Week => {
            let daily = aggregate(series, column, Granularity::Day)?;
            rolled_up_kpis(&daily, DAYS_PER_WEEK)
        }
        Granularity::Month => {
            let weekly = aggregate(series, column, Granularity::Week)?;
            rolled_up_kpis(&weekly, WEEKS_PER_MONTH)
        }
    };

    Ok(result)
}

/// Last calendar day with a value for `column` against the day before it.
/// Trailing records that lack the channel do not move the anchor.
fn daily_kpis(records: &[Measurement], column: &str) -> Option<KpiResult> {
    let last_date = records.iter().rev().find(|m| m.value(column).is_some())?.date();

    let current = WindowStats::from_values(&values_on(records, column, last_date))?;
    let previous = last_date
        .pred_opt()
        .and_then(|date| WindowStats::from_values(&values_on(records, column, date)));

    tracing::debug!(
        "Daily KPIs for '{}' on {} (comparison: {})",
        column,
        last_date,
        previous.is_some()
    );

    Some(KpiResult::new(
        current,
        previous,
        last_date.format("%d/%m/%Y").to_string(),
    ))
}

fn values_on(records: &[Measurement], column: &str, date: NaiveDate) -> Vec<f64> {
    records
        .iter()
        .filter(|m| m.date() == date)
        .filter_map(|m| m.value(column))
        .collect()
}

/// Last `span` buckets against the comparison window picked by
/// [`comparison_windows`]. Needs at least two buckets.
fn rolled_up_kpis(buckets: &BucketSeries, span: usize) -> Option<KpiResult> {
    if buckets.len() < 2 {
        tracing::debug!("Only {} buckets, not enough history", buckets.len());
        return None;
    }

    let (current, previous) = comparison_windows(buckets.buckets(), span);
    let current_stats = WindowStats::from_values(&bucket_values(current))?;
    let previous_stats = WindowStats::from_values(&bucket_values(previous));

    let (first, last) = (current.first()?, current.last()?);
    let period_label = format!(
        "{} - {}",
        first.start.format("%d/%m"),
        last.start.format("%d/%m")
    );

    Some(KpiResult::new(current_stats, previous_stats, period_label))
}

/// Split buckets into (current, comparison) windows.
///
/// The current window is the last `min(span, n)` buckets. The comparison
/// window is:
/// - `[n - 2*span, n - span)` when `n >= 2*span`,
/// - `[n - span - 1, n - 1)` when `n >= span + 1` (overlaps the current one),
/// - empty otherwise.
pub(crate) fn comparison_windows(buckets: &[Bucket], span: usize) -> (&[Bucket], &[Bucket]) {
    let n = buckets.len();
    let current = &buckets[n - span.min(n)..];

    let previous: &[Bucket] = if n >= 2 * span {
        &buckets[n - 2 * span..n - span]
    } else if n > span {
        &buckets[n - span - 1..n - 1]
    } else {
        &[]
    };

    tracing::debug!(
        "{} buckets: current window {}, comparison window {}",
        n,
        current.len(),
        previous.len()
    );

    (current, previous)
}

fn bucket_values(buckets: &[Bucket]) -> Vec<f64> {
    buckets.iter().map(|b| b.value).collect()
}
