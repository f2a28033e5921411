//! AsyncDirStorage-based MetricsRepository implementation.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use version_migrate::AsyncDirStorage;

use attrix_core::error::AttrixError;
use attrix_core::metrics::{BehavioralMetrics, MetricsRepository};

use crate::dto::create_metrics_migrator;
use crate::storage::{is_not_found_message, open_storage};

const ENTITY: &str = "metrics";
const METRICS_KEY: &str = "metrics";

/// AsyncDirStorage-based metrics repository.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── metrics/
///     └── metrics.toml
/// ```
pub struct AsyncDirMetricsRepository {
    storage: AsyncDirStorage,
}

impl AsyncDirMetricsRepository {
    /// Creates a repository rooted at an explicit base directory
    /// (normally the per-site directory).
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let storage = open_storage(base_dir, "metrics", create_metrics_migrator()).await?;
        Ok(Self { storage })
    }

    /// Returns the directory the metrics file is stored in.
    pub fn dir(&self) -> &Path {
        self.storage.base_path()
    }
}

#[async_trait]
impl MetricsRepository for AsyncDirMetricsRepository {
    async fn load(&self) -> attrix_core::Result<BehavioralMetrics> {
        match self
            .storage
            .load::<BehavioralMetrics>(ENTITY, METRICS_KEY)
            .await
        {
            Ok(metrics) => Ok(metrics),
            Err(e) => {
                let message = e.to_string();
                if is_not_found_message(&message) {
                    return Ok(BehavioralMetrics::default());
                }
                tracing::warn!("Resetting unreadable metrics: {message}");
                Ok(BehavioralMetrics::default())
            }
        }
    }

    async fn save(&self, metrics: &BehavioralMetrics) -> attrix_core::Result<()> {
        self.storage
            .save(ENTITY, METRICS_KEY, metrics)
            .await
            .map_err(|e| AttrixError::storage_unavailable(e.to_string()))
    }
}
