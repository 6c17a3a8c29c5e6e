// Aggregated bucket series - one mean per period
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub start: DateTime<Utc>,
    pub value: f64,
}

impl Bucket {
    pub fn new(start: DateTime<Utc>, value: f64) -> Self {
        Self { start, value }
    }
}

/// Ordered buckets, oldest first. Empty periods are never present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BucketSeries {
    buckets: Vec<Bucket>,
}

impl BucketSeries {
    pub fn new(buckets: Vec<Bucket>) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.value).collect()
    }
}
