// Repository trait for measurement data access
use crate::domain::measurement::MeasurementSeries;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Full prepared series: typed timestamps, ascending order.
    /// Implementations own their caching and invalidation policy.
    async fn load_series(&self) -> anyhow::Result<Arc<MeasurementSeries>>;
}
