// Domain errors raised by the KPI core
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KpiError {
    #[error("invalid granularity '{0}': expected D, W or M")]
    InvalidGranularity(String),

    #[error("column '{0}' is not present in the series")]
    UnknownColumn(String),
}
