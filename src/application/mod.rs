// Application layer - KPI core and the use cases built on it
pub mod aggregator;
pub mod exploration_service;
pub mod kpi_engine;
pub mod measurement_repository;
