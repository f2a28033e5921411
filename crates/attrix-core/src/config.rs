//! Tracker configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AttrixError, Result};

fn default_identity_ttl_days() -> i64 {
    365
}

fn default_segment_refresh_hours() -> i64 {
    24
}

fn default_min_data_points() -> usize {
    3
}

fn default_enabled() -> bool {
    true
}

/// Configuration for a [`Tracker`](../../attrix_application/struct.Tracker.html)
/// instance, loadable from TOML.
///
/// Only `collector_endpoint` and `site` are required; everything else has
/// a sensible default. `data_dir`/`shared_dir` exist so embedders and
/// tests can pin storage to an explicit location instead of the
/// platform-default directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Collector URL events are POSTed to.
    pub collector_endpoint: String,
    /// Site (property) identifier this tracker instance reports for.
    pub site: String,
    /// Visitor identity lifetime. After this many days a fresh identity
    /// is minted.
    #[serde(default = "default_identity_ttl_days")]
    pub identity_ttl_days: i64,
    /// How long computed segments stay fresh before a wholesale refresh.
    #[serde(default = "default_segment_refresh_hours")]
    pub segment_refresh_hours: i64,
    /// Segmentation is skipped entirely below this many distinct metric
    /// kinds.
    #[serde(default = "default_min_data_points")]
    pub min_data_points_for_segmentation: usize,
    /// Optional per-request timeout for collector sends. Off by default:
    /// a hung request leaves the event queued for the next sync pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Master switch. A disabled tracker accepts calls and does nothing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Override for the per-site storage directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Override for the shared (cross-site) identity directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_dir: Option<PathBuf>,
}

impl TrackerConfig {
    /// Creates a config with defaults for everything but the required
    /// fields.
    pub fn new(collector_endpoint: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            collector_endpoint: collector_endpoint.into(),
            site: site.into(),
            identity_ttl_days: default_identity_ttl_days(),
            segment_refresh_hours: default_segment_refresh_hours(),
            min_data_points_for_segmentation: default_min_data_points(),
            request_timeout_secs: None,
            enabled: default_enabled(),
            data_dir: None,
            shared_dir: None,
        }
    }

    /// Parses a config from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates required fields and value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.collector_endpoint.trim().is_empty() {
            return Err(AttrixError::config("collector_endpoint must not be empty"));
        }
        if self.site.trim().is_empty() {
            return Err(AttrixError::config("site must not be empty"));
        }
        if self.identity_ttl_days <= 0 {
            return Err(AttrixError::config("identity_ttl_days must be positive"));
        }
        if self.segment_refresh_hours <= 0 {
            return Err(AttrixError::config("segment_refresh_hours must be positive"));
        }
        Ok(())
    }
}
