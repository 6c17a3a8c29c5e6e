// Exploration service - Use case behind the KPI and chart views
use crate::application::aggregator::aggregate;
use crate::application::kpi_engine::compute_kpis;
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::dashboard::{ChartSeries, DatasetOverview, KpiPanel};
use crate::domain::error::KpiError;
use crate::domain::granularity::Granularity;
use crate::domain::measurement::MeasurementSeries;
use crate::domain::statistics::ColumnSummary;
use crate::infrastructure::config::DashboardConfig;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Kpi(#[from] KpiError),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

/// What the user picked: a channel, a granularity code and an optional
/// inclusive date range.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub column: String,
    pub granularity: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct ExplorationService {
    repository: Arc<dyn MeasurementRepository>,
    dashboard_config: DashboardConfig,
}

impl ExplorationService {
    pub fn new(repository: Arc<dyn MeasurementRepository>, dashboard_config: DashboardConfig) -> Self {
        Self {
            repository,
            dashboard_config,
        }
    }

    /// Fill unset choices from the dashboard defaults.
    pub fn selection(
        &self,
        column: Option<String>,
        granularity: Option<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Selection {
        Selection {
            column: column.unwrap_or_else(|| self.dashboard_config.default_channel.clone()),
            granularity: granularity
                .unwrap_or_else(|| self.dashboard_config.default_granularity.clone()),
            start,
            end,
        }
    }

    /// Configured channel options that actually exist in the data.
    pub async fn channels(&self) -> Result<Vec<String>, ServiceError> {
        let series = self.repository.load_series().await?;
        let present = series.columns();

        Ok(self
            .dashboard_config
            .channels
            .iter()
            .filter(|c| present.contains(*c))
            .cloned()
            .collect())
    }

    pub async fn overview(&self) -> Result<DatasetOverview, ServiceError> {
        let series = self.repository.load_series().await?;
        let columns: Vec<String> = series.columns().into_iter().collect();

        let summaries = columns
            .iter()
            .filter_map(|c| ColumnSummary::describe(c, &series.values(c)))
            .collect();

        Ok(DatasetOverview {
            row_count: series.len(),
            first_date: series.first().map(|m| m.date()),
            last_date: series.last().map(|m| m.date()),
            columns,
            summaries,
            preview: series.records().iter().take(PREVIEW_ROWS).cloned().collect(),
        })
    }

    pub async fn kpis(&self, selection: &Selection) -> Result<KpiPanel, ServiceError> {
        // Reject bad codes before touching the data
        let granularity: Granularity = selection.granularity.parse()?;
        let filtered = self.filtered(selection).await?;

        // A known channel with no readings in the range is a data gap, not a typo
        let kpis = if filtered.has_column(&selection.column) {
            compute_kpis(&filtered, &selection.column, &selection.granularity)?
        } else {
            None
        };
        if kpis.is_none() {
            tracing::debug!(
                "Insufficient data for '{}' at {} over {} records",
                selection.column,
                granularity,
                filtered.len()
            );
        }

        Ok(KpiPanel::new(selection.column.clone(), granularity, kpis))
    }

    pub async fn chart(&self, selection: &Selection) -> Result<ChartSeries, ServiceError> {
        let granularity: Granularity = selection.granularity.parse()?;
        let filtered = self
            .filtered(selection)
            .await?
            .select(&[selection.column.as_str()]);

        let points = if filtered.has_column(&selection.column) {
            aggregate(&filtered, &selection.column, granularity)?
        } else {
            Default::default()
        };

        Ok(ChartSeries::new(selection.column.clone(), granularity, points))
    }

    /// Date-filtered copy of the data. Unknown channels are rejected against
    /// the full series so an empty range is not mistaken for a typo.
    async fn filtered(&self, selection: &Selection) -> Result<MeasurementSeries, ServiceError> {
        let series = self.repository.load_series().await?;
        if !series.is_empty() && !series.has_column(&selection.column) {
            return Err(KpiError::UnknownColumn(selection.column.clone()).into());
        }
        Ok(series.between_dates(selection.start, selection.end))
    }
}
