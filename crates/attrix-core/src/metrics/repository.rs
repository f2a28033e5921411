//! Metrics repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::metrics::BehavioralMetrics;

/// An abstract store for the visitor's accumulated behavioral metrics.
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Loads the current metrics. Absent or malformed stored data loads
    /// as the default (empty) metrics.
    async fn load(&self) -> Result<BehavioralMetrics>;

    /// Persists the metrics, replacing the previous aggregate.
    async fn save(&self, metrics: &BehavioralMetrics) -> Result<()>;
}
