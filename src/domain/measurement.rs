// Measurement domain models
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

/// One timestamped sample carrying any number of named numeric channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub timestamp: DateTime<Utc>,
    pub values: BTreeMap<String, f64>,
}

impl Measurement {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// Build a measurement from a numeric epoch (seconds, fractional part kept
    /// down to the nanosecond). Returns `None` when out of chrono's range.
    pub fn from_epoch_seconds(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round() as u32;
        DateTime::from_timestamp(whole as i64, nanos.min(999_999_999)).map(Self::new)
    }

    pub fn with_value(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    /// Value of `column`, treating NaN as missing.
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().filter(|v| !v.is_nan())
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// An ordered run of measurements. Filtering always produces a fresh series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasurementSeries {
    records: Vec<Measurement>,
}

impl MeasurementSeries {
    /// Wrap records as given. Use [`MeasurementSeries::prepared`] to sort.
    pub fn new(records: Vec<Measurement>) -> Self {
        Self { records }
    }

    /// Wrap records and stable-sort them ascending by timestamp.
    pub fn prepared(mut records: Vec<Measurement>) -> Self {
        records.sort_by_key(|m| m.timestamp);
        Self { records }
    }

    pub fn records(&self) -> &[Measurement] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&Measurement> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&Measurement> {
        self.records.last()
    }

    pub fn is_sorted(&self) -> bool {
        self.records.is_sorted_by_key(|m| m.timestamp)
    }

    /// Records in ascending timestamp order, borrowing when already sorted.
    pub fn sorted_records(&self) -> Cow<'_, [Measurement]> {
        if self.is_sorted() {
            Cow::Borrowed(&self.records)
        } else {
            let mut records = self.records.clone();
            records.sort_by_key(|m| m.timestamp);
            Cow::Owned(records)
        }
    }

    /// Every channel name carried by at least one record.
    pub fn columns(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|m| m.values.keys().cloned())
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.records.iter().any(|m| m.values.contains_key(column))
    }

    /// Non-missing values of `column`, in record order.
    pub fn values(&self, column: &str) -> Vec<f64> {
        self.records.iter().filter_map(|m| m.value(column)).collect()
    }

    /// Records between `start` 00:00 UTC and `end + 1 day` 00:00 UTC, both
    /// bounds inclusive. A missing bound leaves that side open.
    pub fn between_dates(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let lower = start.map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let upper = end
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());

        let records = self
            .records
            .iter()
            .filter(|m| lower.is_none_or(|l| m.timestamp >= l))
            .filter(|m| upper.is_none_or(|u| m.timestamp <= u))
            .cloned()
            .collect();
        Self { records }
    }

    /// Keep only the named channels on every record.
    pub fn select(&self, columns: &[&str]) -> Self {
        let records = self
            .records
            .iter()
            .map(|m| Measurement {
                timestamp: m.timestamp,
                values: m
                    .values
                    .iter()
                    .filter(|(k, _)| columns.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), *v))
                    .collect(),
            })
            .collect();
        Self { records }
    }
}
