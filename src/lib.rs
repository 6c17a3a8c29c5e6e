// Period-over-period KPIs for timestamped sensor measurements
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
