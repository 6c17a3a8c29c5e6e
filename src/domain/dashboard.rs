// Dashboard domain models - payloads rendered by the presentation layer
use super::bucket::BucketSeries;
use super::granularity::Granularity;
use super::kpi::KpiResult;
use super::measurement::Measurement;
use super::statistics::ColumnSummary;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiPanel {
    pub column: String,
    pub granularity: Granularity,
    pub kpis: Option<KpiResult>,
    pub warning: Option<String>,
}

impl KpiPanel {
    pub fn new(column: String, granularity: Granularity, kpis: Option<KpiResult>) -> Self {
        let warning = kpis.is_none().then(|| {
            "Insufficient data to compute indicators; widen the date range or pick a shorter granularity"
                .to_string()
        });
        Self {
            column,
            granularity,
            kpis,
            warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub column: String,
    pub granularity: Granularity,
    pub title: String,
    pub points: BucketSeries,
    pub warning: Option<String>,
}

impl ChartSeries {
    pub fn new(column: String, granularity: Granularity, points: BucketSeries) -> Self {
        let title = format!("{} - {} view", column, granularity.label());
        let warning = points
            .is_empty()
            .then(|| "No data available for the current selection".to_string());
        Self {
            column,
            granularity,
            title,
            points,
            warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub row_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub columns: Vec<String>,
    pub summaries: Vec<ColumnSummary>,
    /// Leading rows of the data, in timestamp order
    pub preview: Vec<Measurement>,
}
