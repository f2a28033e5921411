//! In-memory repository implementations.
//!
//! These back two things: the fail-open degraded mode (when directory
//! storage cannot be opened the tracker falls back to these, keeping the
//! session alive with session-only state) and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use attrix_core::error::Result;
use attrix_core::event::{EventCache, EventCacheRepository, TrackedEvent};
use attrix_core::identity::{IdentityRepository, VisitorIdentity};
use attrix_core::metrics::{BehavioralMetrics, MetricsRepository};
use attrix_core::segments::{SegmentsRepository, VisitorSegments};
use attrix_core::state::{StateRepository, TrackerState};

/// In-memory identity repository.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identity: RwLock<Option<VisitorIdentity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn load(&self) -> Result<Option<VisitorIdentity>> {
        Ok(self.identity.read().await.clone())
    }

    async fn store(&self, identity: &VisitorIdentity) -> Result<()> {
        *self.identity.write().await = Some(identity.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.identity.write().await = None;
        Ok(())
    }
}

/// In-memory event cache repository.
#[derive(Default)]
pub struct InMemoryEventCacheRepository {
    cache: RwLock<EventCache>,
}

impl InMemoryEventCacheRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventCacheRepository for InMemoryEventCacheRepository {
    async fn append(&self, event: &TrackedEvent) -> Result<()> {
        self.cache.write().await.push(event.clone());
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<TrackedEvent>> {
        Ok(self.cache.read().await.events.clone())
    }

    async fn remove(&self, event_id: &str) -> Result<()> {
        self.cache.write().await.remove(event_id);
        Ok(())
    }

    async fn contains(&self, event_id: &str) -> Result<bool> {
        Ok(self.cache.read().await.contains(event_id))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.cache.read().await.len())
    }
}

/// In-memory metrics repository.
#[derive(Default)]
pub struct InMemoryMetricsRepository {
    metrics: RwLock<BehavioralMetrics>,
}

impl InMemoryMetricsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetricsRepository for InMemoryMetricsRepository {
    async fn load(&self) -> Result<BehavioralMetrics> {
        Ok(self.metrics.read().await.clone())
    }

    async fn save(&self, metrics: &BehavioralMetrics) -> Result<()> {
        *self.metrics.write().await = metrics.clone();
        Ok(())
    }
}

/// In-memory segments repository.
#[derive(Default)]
pub struct InMemorySegmentsRepository {
    segments: RwLock<Option<VisitorSegments>>,
}

impl InMemorySegmentsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SegmentsRepository for InMemorySegmentsRepository {
    async fn load(&self) -> Result<Option<VisitorSegments>> {
        Ok(self.segments.read().await.clone())
    }

    async fn replace(&self, segments: &VisitorSegments) -> Result<()> {
        *self.segments.write().await = Some(segments.clone());
        Ok(())
    }
}

/// In-memory tracker state repository.
#[derive(Default)]
pub struct InMemoryStateRepository {
    state: RwLock<TrackerState>,
}

impl InMemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateRepository for InMemoryStateRepository {
    async fn load(&self) -> Result<TrackerState> {
        Ok(self.state.read().await.clone())
    }

    async fn last_site(&self) -> Option<String> {
        self.state.read().await.last_site.clone()
    }

    async fn set_last_site(&self, site: String) -> Result<()> {
        self.state.write().await.last_site = Some(site);
        Ok(())
    }

    async fn intensity_preference(&self) -> Option<f64> {
        self.state.read().await.intensity_preference
    }

    async fn set_intensity_preference(&self, value: f64) -> Result<()> {
        self.state.write().await.intensity_preference = Some(value.clamp(0.0, 1.0));
        Ok(())
    }

    async fn clear_intensity_preference(&self) -> Result<()> {
        self.state.write().await.intensity_preference = None;
        Ok(())
    }
}
