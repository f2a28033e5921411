//! AsyncDirStorage-based EventCacheRepository implementation.
//!
//! The whole queue is one aggregate, rewritten on every mutation. That
//! keeps the durability contract simple (an event is on disk before any
//! delivery attempt) at the cost of last-writer-wins races between
//! concurrent processes.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use version_migrate::AsyncDirStorage;

use attrix_core::error::AttrixError;
use attrix_core::event::{EventCache, EventCacheRepository, TrackedEvent};

use crate::dto::create_event_cache_migrator;
use crate::storage::{is_not_found_message, open_storage};

const ENTITY: &str = "event_cache";
const CACHE_KEY: &str = "cache";

/// AsyncDirStorage-based event cache repository.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── events/
///     └── cache.toml
/// ```
pub struct AsyncDirEventCacheRepository {
    storage: AsyncDirStorage,
}

impl AsyncDirEventCacheRepository {
    /// Creates a repository rooted at an explicit base directory
    /// (normally the per-site directory).
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let storage = open_storage(base_dir, "events", create_event_cache_migrator()).await?;
        Ok(Self { storage })
    }

    /// Returns the directory the cache file is stored in.
    pub fn dir(&self) -> &Path {
        self.storage.base_path()
    }

    async fn load_cache(&self) -> attrix_core::Result<EventCache> {
        match self.storage.load::<EventCache>(ENTITY, CACHE_KEY).await {
            Ok(cache) => Ok(cache),
            Err(e) => {
                let message = e.to_string();
                if is_not_found_message(&message) {
                    return Ok(EventCache::default());
                }
                // A corrupt cache resets to empty; better to drop stale
                // analytics than to wedge the tracker.
                tracing::warn!("Resetting unreadable event cache: {message}");
                Ok(EventCache::default())
            }
        }
    }

    async fn save_cache(&self, cache: &EventCache) -> attrix_core::Result<()> {
        self.storage
            .save(ENTITY, CACHE_KEY, cache)
            .await
            .map_err(|e| AttrixError::storage_unavailable(e.to_string()))
    }
}

#[async_trait]
impl EventCacheRepository for AsyncDirEventCacheRepository {
    async fn append(&self, event: &TrackedEvent) -> attrix_core::Result<()> {
        let mut cache = self.load_cache().await?;
        if !cache.push(event.clone()) {
            tracing::debug!(event_id = %event.event_id, "Duplicate event id, not re-queueing");
            return Ok(());
        }
        self.save_cache(&cache).await
    }

    async fn snapshot(&self) -> attrix_core::Result<Vec<TrackedEvent>> {
        Ok(self.load_cache().await?.events)
    }

    async fn remove(&self, event_id: &str) -> attrix_core::Result<()> {
        let mut cache = self.load_cache().await?;
        if cache.remove(event_id) {
            self.save_cache(&cache).await?;
        }
        Ok(())
    }

    async fn contains(&self, event_id: &str) -> attrix_core::Result<bool> {
        Ok(self.load_cache().await?.contains(event_id))
    }

    async fn len(&self) -> attrix_core::Result<usize> {
        Ok(self.load_cache().await?.len())
    }
}
