//! Tracker state repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::TrackerState;

/// Repository for the small per-site tracker state.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Loads the full state. Absent or malformed data loads as default.
    async fn load(&self) -> Result<TrackerState>;

    async fn last_site(&self) -> Option<String>;

    async fn set_last_site(&self, site: String) -> Result<()>;

    async fn intensity_preference(&self) -> Option<f64>;

    async fn set_intensity_preference(&self, value: f64) -> Result<()>;

    async fn clear_intensity_preference(&self) -> Result<()>;
}
