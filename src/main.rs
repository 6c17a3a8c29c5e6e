// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use particle_kpi::application::exploration_service::ExplorationService;
use particle_kpi::infrastructure::config::load_app_config;
use particle_kpi::infrastructure::csv_repository::CsvMeasurementRepository;
use particle_kpi::presentation::app_state::AppState;
use particle_kpi::presentation::handlers::{
    chart_series, dataset_overview, health_check, kpi_panel, list_channels,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config().context("loading config/app")?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(CsvMeasurementRepository::new(
        app_config.data.path,
        app_config.data.timestamp_column,
    ));

    // Create services (application layer)
    let exploration_service = ExplorationService::new(repository, app_config.dashboard);

    // Create application state
    let state = Arc::new(AppState {
        exploration_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/channels", get(list_channels))
        .route("/overview", get(dataset_overview))
        .route("/kpis", get(kpi_panel))
        .route("/series", get(chart_series))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", app_config.server.bind))?;
    tracing::info!("Starting particle-kpi service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
