// CSV repository implementation - loads once, serves a cached snapshot
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::measurement::{Measurement, MeasurementSeries};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%#z"];
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

#[derive(Debug)]
pub struct CsvMeasurementRepository {
    path: PathBuf,
    timestamp_column: String,
    cache: RwLock<Option<Arc<MeasurementSeries>>>,
}

impl CsvMeasurementRepository {
    pub fn new(path: impl Into<PathBuf>, timestamp_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            timestamp_column: timestamp_column.into(),
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached snapshot; the next load re-reads the file.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
        tracing::debug!("Invalidated measurement cache for {}", self.path.display());
    }
}

#[async_trait]
impl MeasurementRepository for CsvMeasurementRepository {
    async fn load_series(&self) -> Result<Arc<MeasurementSeries>> {
        if let Some(series) = self.cache.read().await.as_ref() {
            return Ok(series.clone());
        }

        let mut cache = self.cache.write().await;
        // Another task may have filled the cache while we waited
        if let Some(series) = cache.as_ref() {
            return Ok(series.clone());
        }

        let path = self.path.clone();
        let timestamp_column = self.timestamp_column.clone();
        let series = tokio::task::spawn_blocking(move || read_csv_file(&path, &timestamp_column))
            .await
            .context("CSV loading task failed")??;

        tracing::info!(
            "Loaded {} measurements from {}",
            series.len(),
            self.path.display()
        );

        let series = Arc::new(series);
        *cache = Some(series.clone());
        Ok(series)
    }
}

pub fn read_csv_file(path: &Path, timestamp_column: &str) -> Result<MeasurementSeries> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_measurements(file, timestamp_column)
}

/// Parse CSV rows into a prepared series.
///
/// Every column other than the timestamp is a channel; empty or non-numeric
/// cells are left out of the record. Rows whose timestamp cannot be read are
/// skipped.
pub fn parse_measurements<R: Read>(reader: R, timestamp_column: &str) -> Result<MeasurementSeries> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let timestamp_idx = headers
        .iter()
        .position(|h| h == timestamp_column)
        .with_context(|| format!("CSV missing '{timestamp_column}' column"))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading CSV row {}", row + 1))?;

        let Some(timestamp) = record.get(timestamp_idx).and_then(parse_timestamp) else {
            tracing::warn!("Skipping CSV row {}: unreadable timestamp", row + 1);
            skipped += 1;
            continue;
        };

        let mut measurement = Measurement::new(timestamp);
        for (idx, cell) in record.iter().enumerate() {
            if idx == timestamp_idx || headers[idx].is_empty() {
                continue;
            }
            if let Ok(value) = cell.trim().parse::<f64>() {
                if !value.is_nan() {
                    measurement.values.insert(headers[idx].clone(), value);
                }
            }
        }
        records.push(measurement);
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} CSV rows with unreadable timestamps", skipped);
    }

    Ok(MeasurementSeries::prepared(records))
}

/// Read a timestamp cell: RFC 3339, `YYYY-MM-DD HH:MM:SS[.f][±hh:mm]`, a bare
/// date, or epoch seconds. Strings without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }

    raw.parse::<f64>()
        .ok()
        .and_then(Measurement::from_epoch_seconds)
        .map(|m| m.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = "\
timestamp,P0,P1,P2,temperature,humidity
2025-08-02 10:00:00+00:00,1.0,2.0,3.0,21.5,40
2025-08-01T09:30:00Z,1.5,,3.5,20.0,nan
not-a-date,9,9,9,9,9
2025-08-01 23:00:00+02:00,0.5,1.0,1.5,19.0,45
";

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("{}-{}-{}.csv", name, std::process::id(), nanos));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-08-01T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-08-01 14:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-08-01 12:00:00+0000"), Some(expected));
        assert_eq!(parse_timestamp("2025-08-01 12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-08-01 12:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp("1754049600"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-08-01"),
            Some(Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_parse_measurements() {
        let series = parse_measurements(SAMPLE.as_bytes(), "timestamp").unwrap();

        assert_eq!(series.len(), 3);
        assert!(series.is_sorted());
        // 23:00+02:00 is 21:00 UTC on the 1st, after the 09:30 UTC row
        assert_eq!(series.values("P2"), vec![3.5, 1.5, 3.0]);
        assert_eq!(series.values("P1"), vec![1.0, 2.0]);
        assert_eq!(series.values("humidity"), vec![45.0, 40.0]);
        assert!(!series.records()[0].values.contains_key("humidity"));
        assert_eq!(series.columns().len(), 5);
    }

    #[test]
    fn test_missing_timestamp_column() {
        let err = parse_measurements("time,P1\n2025-08-01,1\n".as_bytes(), "timestamp").unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[tokio::test]
    async fn test_repository_caches_until_invalidated() {
        let path = temp_csv("particle-kpi-cache", SAMPLE);
        let repository = CsvMeasurementRepository::new(&path, "timestamp");

        let first = repository.load_series().await.unwrap();
        let second = repository.load_series().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        std::fs::write(&path, "timestamp,P2\n2025-09-01 00:00:00,4.0\n").unwrap();
        assert_eq!(repository.load_series().await.unwrap().len(), 3);

        repository.invalidate().await;
        let reloaded = repository.load_series().await.unwrap();
        assert_eq!(reloaded.values("P2"), vec![4.0]);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_repository_missing_file() {
        let repository = CsvMeasurementRepository::new("/nonexistent/particles.csv", "timestamp");
        assert!(repository.load_series().await.is_err());
    }
}
