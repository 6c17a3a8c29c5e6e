// HTTP request handlers
use crate::domain::dashboard::{ChartSeries, DatasetOverview, KpiPanel};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub column: Option<String>,
    pub granularity: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Channels the dashboard can offer for the loaded data
pub async fn list_channels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.exploration_service.channels().await?))
}

pub async fn dataset_overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetOverview>, ApiError> {
    Ok(Json(state.exploration_service.overview().await?))
}

/// KPIs for the latest period; insufficient history still answers 200
pub async fn kpi_panel(
    Query(query): Query<SelectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<KpiPanel>, ApiError> {
    let service = &state.exploration_service;
    let selection = service.selection(query.column, query.granularity, query.start, query.end);

    tracing::debug!("KPI request: {:?}", selection);
    Ok(Json(service.kpis(&selection).await?))
}

/// Mean series for the chart view
pub async fn chart_series(
    Query(query): Query<SelectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartSeries>, ApiError> {
    let service = &state.exploration_service;
    let selection = service.selection(query.column, query.granularity, query.start, query.end);

    tracing::debug!("Chart request: {:?}", selection);
    Ok(Json(service.chart(&selection).await?))
}
