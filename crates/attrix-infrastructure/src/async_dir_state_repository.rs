//! AsyncDirStorage-based StateRepository implementation.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use version_migrate::AsyncDirStorage;

use attrix_core::error::AttrixError;
use attrix_core::state::{StateRepository, TrackerState};

use crate::dto::create_state_migrator;
use crate::storage::{is_not_found_message, open_storage};

const ENTITY: &str = "tracker_state";
const STATE_KEY: &str = "state";

/// AsyncDirStorage-based tracker state repository.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── state/
///     └── state.toml
/// ```
pub struct AsyncDirStateRepository {
    storage: AsyncDirStorage,
}

impl AsyncDirStateRepository {
    /// Creates a repository rooted at an explicit base directory
    /// (normally the per-site directory).
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let storage = open_storage(base_dir, "state", create_state_migrator()).await?;
        Ok(Self { storage })
    }

    /// Returns the directory the state file is stored in.
    pub fn dir(&self) -> &Path {
        self.storage.base_path()
    }

    async fn save_state(&self, state: &TrackerState) -> attrix_core::Result<()> {
        self.storage
            .save(ENTITY, STATE_KEY, state)
            .await
            .map_err(|e| AttrixError::storage_unavailable(e.to_string()))
    }
}

#[async_trait]
impl StateRepository for AsyncDirStateRepository {
    async fn load(&self) -> attrix_core::Result<TrackerState> {
        match self.storage.load::<TrackerState>(ENTITY, STATE_KEY).await {
            Ok(state) => Ok(state),
            Err(e) => {
                let message = e.to_string();
                if is_not_found_message(&message) {
                    return Ok(TrackerState::default());
                }
                tracing::warn!("Resetting unreadable tracker state: {message}");
                Ok(TrackerState::default())
            }
        }
    }

    async fn last_site(&self) -> Option<String> {
        self.load().await.ok().and_then(|state| state.last_site)
    }

    async fn set_last_site(&self, site: String) -> attrix_core::Result<()> {
        let mut state = self.load().await?;
        state.last_site = Some(site);
        self.save_state(&state).await
    }

    async fn intensity_preference(&self) -> Option<f64> {
        self.load()
            .await
            .ok()
            .and_then(|state| state.intensity_preference)
    }

    async fn set_intensity_preference(&self, value: f64) -> attrix_core::Result<()> {
        let mut state = self.load().await?;
        state.intensity_preference = Some(value.clamp(0.0, 1.0));
        self.save_state(&state).await
    }

    async fn clear_intensity_preference(&self) -> attrix_core::Result<()> {
        let mut state = self.load().await?;
        state.intensity_preference = None;
        self.save_state(&state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let temp_dir = TempDir::new().unwrap();
        let repository = AsyncDirStateRepository::new(temp_dir.path()).await.unwrap();

        assert_eq!(repository.last_site().await, None);
        assert_eq!(repository.intensity_preference().await, None);
    }

    #[tokio::test]
    async fn test_last_site_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repository = AsyncDirStateRepository::new(temp_dir.path()).await.unwrap();

        repository.set_last_site("landing".to_string()).await.unwrap();
        assert_eq!(repository.last_site().await, Some("landing".to_string()));
    }

    #[tokio::test]
    async fn test_intensity_preference_is_clamped_and_clearable() {
        let temp_dir = TempDir::new().unwrap();
        let repository = AsyncDirStateRepository::new(temp_dir.path()).await.unwrap();

        repository.set_intensity_preference(1.8).await.unwrap();
        assert_eq!(repository.intensity_preference().await, Some(1.0));

        repository.clear_intensity_preference().await.unwrap();
        assert_eq!(repository.intensity_preference().await, None);
    }

    #[tokio::test]
    async fn test_fields_do_not_clobber_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let repository = AsyncDirStateRepository::new(temp_dir.path()).await.unwrap();

        repository.set_last_site("landing".to_string()).await.unwrap();
        repository.set_intensity_preference(0.4).await.unwrap();

        assert_eq!(repository.last_site().await, Some("landing".to_string()));
        assert_eq!(repository.intensity_preference().await, Some(0.4));
    }
}
