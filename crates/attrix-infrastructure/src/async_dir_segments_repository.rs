//! AsyncDirStorage-based SegmentsRepository implementation.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use version_migrate::AsyncDirStorage;

use attrix_core::error::AttrixError;
use attrix_core::segments::{SegmentsRepository, VisitorSegments};

use crate::dto::create_segments_migrator;
use crate::storage::{is_not_found_message, open_storage};

const ENTITY: &str = "segments";
const SEGMENTS_KEY: &str = "segments";

/// AsyncDirStorage-based segments repository.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── segments/
///     └── segments.toml
/// ```
pub struct AsyncDirSegmentsRepository {
    storage: AsyncDirStorage,
}

impl AsyncDirSegmentsRepository {
    /// Creates a repository rooted at an explicit base directory
    /// (normally the per-site directory).
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let storage = open_storage(base_dir, "segments", create_segments_migrator()).await?;
        Ok(Self { storage })
    }

    /// Returns the directory the segments file is stored in.
    pub fn dir(&self) -> &Path {
        self.storage.base_path()
    }
}

#[async_trait]
impl SegmentsRepository for AsyncDirSegmentsRepository {
    async fn load(&self) -> attrix_core::Result<Option<VisitorSegments>> {
        match self
            .storage
            .load::<VisitorSegments>(ENTITY, SEGMENTS_KEY)
            .await
        {
            Ok(segments) => Ok(Some(segments)),
            Err(e) => {
                let message = e.to_string();
                if is_not_found_message(&message) {
                    return Ok(None);
                }
                // An unreadable assignment is recomputed on the next
                // refresh anyway.
                tracing::warn!("Resetting unreadable segments: {message}");
                Ok(None)
            }
        }
    }

    async fn replace(&self, segments: &VisitorSegments) -> attrix_core::Result<()> {
        self.storage
            .save(ENTITY, SEGMENTS_KEY, segments)
            .await
            .map_err(|e| AttrixError::storage_unavailable(e.to_string()))
    }
}
