// Domain layer - Pure value types shared by the KPI core
pub mod bucket;
pub mod dashboard;
pub mod error;
pub mod granularity;
pub mod kpi;
pub mod measurement;
pub mod statistics;
