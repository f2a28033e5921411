//! The `Tracker` service.
//!
//! The single explicitly constructed object hosts embed. It owns the
//! visitor/session identities, the metric counters, the durable event
//! queue and the segmentation refresh cycle, behind a public API that
//! never surfaces errors: tracking can fail silently but must not break
//! the host.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use attrix_core::collector::EventSink;
use attrix_core::config::TrackerConfig;
use attrix_core::error::AttrixError;
use attrix_core::event::{EventCacheRepository, TrackedEvent};
use attrix_core::identity::{IdentityRepository, VisitorIdentity};
use attrix_core::metrics::{BehavioralMetrics, MetricsRepository};
use attrix_core::recommendation::{recommend, Recommendation};
use attrix_core::segmentation::update_segments;
use attrix_core::segments::{SegmentsRepository, VisitorSegments};
use attrix_core::state::StateRepository;
use attrix_core::trigger::{PersuasionEvent, TriggerKind};

use attrix_infrastructure::paths::AttrixPaths;
use attrix_infrastructure::{
    AsyncDirEventCacheRepository, AsyncDirIdentityRepository, AsyncDirMetricsRepository,
    AsyncDirSegmentsRepository, AsyncDirStateRepository, HttpCollector,
    InMemoryEventCacheRepository, InMemoryIdentityRepository, InMemoryMetricsRepository,
    InMemorySegmentsRepository, InMemoryStateRepository,
};

use crate::session::SessionContext;
use crate::sync::SyncEngine;

/// The repository handles a tracker runs against.
pub struct TrackerRepositories {
    pub identity: Arc<dyn IdentityRepository>,
    pub events: Arc<dyn EventCacheRepository>,
    pub metrics: Arc<dyn MetricsRepository>,
    pub segments: Arc<dyn SegmentsRepository>,
    pub state: Arc<dyn StateRepository>,
}

impl TrackerRepositories {
    /// Session-only repositories: nothing survives the process. Used as
    /// the degraded mode when directory storage cannot be opened, and in
    /// tests.
    pub fn in_memory() -> Self {
        Self {
            identity: Arc::new(InMemoryIdentityRepository::new()),
            events: Arc::new(InMemoryEventCacheRepository::new()),
            metrics: Arc::new(InMemoryMetricsRepository::new()),
            segments: Arc::new(InMemorySegmentsRepository::new()),
            state: Arc::new(InMemoryStateRepository::new()),
        }
    }

    /// Directory-backed repositories: identity in the shared scope,
    /// everything else in the per-site scope.
    async fn open_directories(config: &TrackerConfig) -> anyhow::Result<Self> {
        let shared_dir = match &config.shared_dir {
            Some(dir) => dir.clone(),
            None => AttrixPaths::shared_dir()
                .map_err(|e| anyhow::anyhow!("Failed to resolve shared directory: {}", e))?,
        };
        let site_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => AttrixPaths::site_dir(&config.site)
                .map_err(|e| anyhow::anyhow!("Failed to resolve site directory: {}", e))?,
        };

        Ok(Self {
            identity: Arc::new(AsyncDirIdentityRepository::new(&shared_dir).await?),
            events: Arc::new(AsyncDirEventCacheRepository::new(&site_dir).await?),
            metrics: Arc::new(AsyncDirMetricsRepository::new(&site_dir).await?),
            segments: Arc::new(AsyncDirSegmentsRepository::new(&site_dir).await?),
            state: Arc::new(AsyncDirStateRepository::new(&site_dir).await?),
        })
    }
}

/// Sink used when the HTTP client cannot be built. Every delivery fails,
/// so events accumulate in the cache for a later, healthier process.
struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn deliver(&self, _event: &TrackedEvent) -> attrix_core::Result<()> {
        Err(AttrixError::network("collector client unavailable"))
    }
}

/// The tracking service.
///
/// Construction is infallible by design: storage trouble degrades to
/// in-memory repositories, collector trouble leaves events queued. See
/// [`Tracker::initialize`].
pub struct Tracker {
    config: TrackerConfig,
    visitor: VisitorIdentity,
    session: SessionContext,
    metrics_repo: Arc<dyn MetricsRepository>,
    segments_repo: Arc<dyn SegmentsRepository>,
    state_repo: Arc<dyn StateRepository>,
    sync: SyncEngine,
}

impl Tracker {
    /// Builds a tracker with directory-backed storage and the HTTP
    /// collector, falling back to in-memory parts on failure. On
    /// construction the tracker resolves the visitor identity, starts a
    /// session, counts the visit, records a cross-site transition when
    /// one happened, and re-attempts delivery of any cached events.
    pub async fn initialize(config: TrackerConfig) -> Self {
        let repositories = match TrackerRepositories::open_directories(&config).await {
            Ok(repositories) => repositories,
            Err(e) => {
                tracing::warn!("Storage unavailable, tracking is session-only: {e:#}");
                TrackerRepositories::in_memory()
            }
        };

        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let sink: Arc<dyn EventSink> =
            match HttpCollector::new(&config.collector_endpoint, timeout) {
                Ok(collector) => Arc::new(collector),
                Err(e) => {
                    tracing::warn!("Collector client unavailable, events will queue: {e}");
                    Arc::new(NullSink)
                }
            };

        Self::with_repositories(config, repositories, sink).await
    }

    /// Builds a tracker from explicit parts. The seam tests and
    /// embedders with custom storage use.
    pub async fn with_repositories(
        config: TrackerConfig,
        repositories: TrackerRepositories,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let visitor = resolve_identity(&repositories.identity, config.identity_ttl_days).await;
        let previous_site = repositories.state.last_site().await;
        let session = SessionContext::start(&config.site, previous_site);

        let tracker = Self {
            sync: SyncEngine::new(repositories.events, sink),
            metrics_repo: repositories.metrics,
            segments_repo: repositories.segments,
            state_repo: repositories.state,
            config,
            visitor,
            session,
        };

        if tracker.config.enabled {
            tracker.begin_visit().await;
            tracker.sync_cached_events().await;
        }
        tracker
    }

    /// Visit accounting done once per construction: bump the visit
    /// counter, emit a cross-site transition event when the session
    /// crossed over from another site, and remember the current site.
    async fn begin_visit(&self) {
        self.update_metrics(|metrics| metrics.record_visit()).await;

        if let Some(from) = self.session.entered_from.clone() {
            let mut data = HashMap::new();
            data.insert("from".to_string(), Value::String(from));
            data.insert("to".to_string(), Value::String(self.session.site.clone()));
            self.track_event("cross_site_transition", data).await;
        }

        if let Err(e) = self
            .state_repo
            .set_last_site(self.session.site.clone())
            .await
        {
            tracing::warn!("Could not persist current site: {e}");
        }
    }

    // ── Identity ──────────────────────────────────────────────────────────

    /// The durable visitor id events are attributed to.
    pub fn visitor_id(&self) -> &str {
        &self.visitor.id
    }

    /// The id of the current process session.
    pub fn session_id(&self) -> &str {
        &self.session.session.id
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // ── Recording ─────────────────────────────────────────────────────────

    /// Records a generic analytics event. The event is persisted to the
    /// cache before the delivery attempt; failures are logged, never
    /// returned.
    pub async fn track_event(&self, event_type: &str, data: HashMap<String, Value>) {
        if !self.config.enabled {
            return;
        }
        let event = TrackedEvent::new(&self.visitor.id, event_type, self.with_session_data(data));
        if let Err(e) = self.sync.submit(event).await {
            tracing::warn!(event_type, "Tracking failed: {e}");
        }
    }

    /// Records a persuasion-trigger event reported by a host UI
    /// component. Impressions carry a deterministic event id and are
    /// deduplicated; interactions additionally feed the psychographic
    /// response history.
    pub async fn record_trigger_event(&self, event: PersuasionEvent) {
        if !self.config.enabled {
            return;
        }

        if event.interaction {
            let trigger = event.trigger;
            let strength = event.intensity;
            self.update_metrics(|metrics| metrics.record_trigger_response(trigger, strength))
                .await;
        }

        let event_type = if event.interaction {
            "trigger_interaction"
        } else {
            "trigger_impression"
        };
        let tracked = TrackedEvent::with_event_id(
            event.event_id(),
            &self.visitor.id,
            event_type,
            self.with_session_data(event.event_data()),
        );
        if let Err(e) = self.sync.submit(tracked).await {
            tracing::warn!(event_type, "Tracking failed: {e}");
        }
    }

    /// Records a page view in the given content category.
    pub async fn record_page_view(&self, category: &str) {
        if !self.config.enabled {
            return;
        }
        self.update_metrics(|metrics| metrics.record_page_view(category))
            .await;

        let mut data = HashMap::new();
        data.insert("category".to_string(), Value::String(category.to_string()));
        self.track_event("page_view", data).await;
    }

    /// Records the deepest scroll position reached, 0-100.
    pub async fn record_scroll_depth(&self, depth: f64) {
        if !self.config.enabled {
            return;
        }
        self.update_metrics(|metrics| metrics.record_scroll_depth(depth))
            .await;
    }

    /// Records a time-on-page sample in seconds.
    pub async fn record_time_on_page(&self, seconds: f64) {
        if !self.config.enabled {
            return;
        }
        self.update_metrics(|metrics| metrics.record_time_on_page(seconds))
            .await;
    }

    /// Records a click, optionally attributed to an element.
    pub async fn record_click(&self, element_id: Option<&str>) {
        if !self.config.enabled {
            return;
        }
        self.update_metrics(|metrics| metrics.record_click()).await;

        let mut data = HashMap::new();
        if let Some(element_id) = element_id {
            data.insert(
                "element_id".to_string(),
                Value::String(element_id.to_string()),
            );
        }
        self.track_event("click", data).await;
    }

    /// Records a conversion of the given kind (signup, purchase, ...).
    pub async fn record_conversion(&self, kind: &str) {
        if !self.config.enabled {
            return;
        }
        self.update_metrics(|metrics| metrics.record_conversion())
            .await;

        let mut data = HashMap::new();
        data.insert("kind".to_string(), Value::String(kind.to_string()));
        self.track_event("conversion", data).await;
    }

    /// Directly records a trigger response for psychographic scoring,
    /// for hosts that measure response strength themselves.
    pub async fn record_trigger_response(&self, trigger: TriggerKind, strength: f64) {
        if !self.config.enabled {
            return;
        }
        self.update_metrics(|metrics| metrics.record_trigger_response(trigger, strength))
            .await;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The visitor's current segment assignment, refreshed when stale.
    /// `None` until enough metrics accumulate for a first assignment.
    pub async fn segments(&self) -> Option<VisitorSegments> {
        if !self.config.enabled {
            return None;
        }
        let previous = match self.segments_repo.load().await {
            Ok(previous) => previous,
            Err(e) => {
                tracing::warn!("Could not load segments: {e}");
                None
            }
        };

        match &previous {
            Some(segments) if !segments.is_stale(self.config.segment_refresh_hours) => previous,
            _ => self.refresh_segments(previous).await,
        }
    }

    /// The current trigger recommendation, derived from segments and the
    /// stored intensity preference.
    pub async fn recommendation(&self) -> Recommendation {
        let preference = self.state_repo.intensity_preference().await;
        match self.segments().await {
            Some(segments) => recommend(&segments, preference),
            None => Recommendation::unsegmented(),
        }
    }

    pub async fn intensity_preference(&self) -> Option<f64> {
        self.state_repo.intensity_preference().await
    }

    /// Stores the visitor's intensity preference (clamped to 0-1).
    pub async fn set_intensity_preference(&self, value: f64) {
        if let Err(e) = self.state_repo.set_intensity_preference(value).await {
            tracing::warn!("Could not persist intensity preference: {e}");
        }
    }

    /// Number of events still awaiting confirmed delivery.
    pub async fn pending_events(&self) -> usize {
        match self.sync.pending().await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!("Could not read event cache: {e}");
                0
            }
        }
    }

    /// Re-attempts delivery of everything still queued. Useful as a
    /// teardown hook before process exit; returns how many events were
    /// confirmed.
    pub async fn flush(&self) -> usize {
        self.sync_cached_events().await
    }

    // ── Internals ─────────────────────────────────────────────────────────

    async fn sync_cached_events(&self) -> usize {
        match self.sync.sync_cached().await {
            Ok(delivered) => delivered,
            Err(e) => {
                tracing::warn!("Event resync failed: {e}");
                0
            }
        }
    }

    /// Recomputes and stores the segment assignment. Below the minimum
    /// data points this is a silent no-op that keeps the previous
    /// assignment.
    async fn refresh_segments(&self, previous: Option<VisitorSegments>) -> Option<VisitorSegments> {
        let metrics = match self.metrics_repo.load().await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!("Could not load metrics for segmentation: {e}");
                return previous;
            }
        };

        match update_segments(&metrics, self.config.min_data_points_for_segmentation) {
            Ok(segments) => {
                if let Err(e) = self.segments_repo.replace(&segments).await {
                    tracing::warn!("Could not persist segments: {e}");
                }
                Some(segments)
            }
            Err(e) if e.is_insufficient_data() => {
                tracing::debug!("Segmentation skipped: {e}");
                previous
            }
            Err(e) => {
                tracing::warn!("Segmentation failed: {e}");
                previous
            }
        }
    }

    async fn update_metrics<F>(&self, apply: F)
    where
        F: FnOnce(&mut BehavioralMetrics),
    {
        match self.metrics_repo.load().await {
            Ok(mut metrics) => {
                apply(&mut metrics);
                if let Err(e) = self.metrics_repo.save(&metrics).await {
                    tracing::warn!("Could not persist metrics: {e}");
                }
            }
            Err(e) => tracing::warn!("Could not load metrics: {e}"),
        }
    }

    /// Stamps the session id and site onto an event payload.
    fn with_session_data(&self, mut data: HashMap<String, Value>) -> HashMap<String, Value> {
        data.insert(
            "session_id".to_string(),
            Value::String(self.session.session.id.clone()),
        );
        data.insert(
            "site".to_string(),
            Value::String(self.session.site.clone()),
        );
        data
    }
}

/// Resolves the durable visitor identity, minting and persisting a fresh
/// one when absent or expired. Fails open: if the store cannot be read or
/// written, the freshly generated in-memory identity is still used for
/// the rest of the process life.
async fn resolve_identity(
    repository: &Arc<dyn IdentityRepository>,
    ttl_days: i64,
) -> VisitorIdentity {
    match repository.load().await {
        Ok(Some(identity)) if !identity.is_expired(ttl_days) => identity,
        Ok(_) => {
            let fresh = VisitorIdentity::generate();
            if let Err(e) = repository.store(&fresh).await {
                tracing::warn!("Could not persist visitor identity, session-only: {e}");
            }
            fresh
        }
        Err(e) => {
            tracing::warn!("Identity store unavailable: {e}");
            VisitorIdentity::generate()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use attrix_core::segments::SegmentCategory;
    use attrix_infrastructure::memory::InMemoryStateRepository;
    use tempfile::TempDir;

    // Recording sink that can be switched between healthy and failing.
    struct RecordingSink {
        delivered: Mutex<Vec<TrackedEvent>>,
        healthy: AtomicBool,
    }

    impl RecordingSink {
        fn new(healthy: bool) -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                healthy: AtomicBool::new(healthy),
            }
        }

        fn set_healthy(&self, healthy: bool) {
            self.healthy.store(healthy, Ordering::SeqCst);
        }

        fn delivered(&self) -> Vec<TrackedEvent> {
            self.delivered.lock().unwrap().clone()
        }

        fn delivered_of_type(&self, event_type: &str) -> Vec<TrackedEvent> {
            self.delivered()
                .into_iter()
                .filter(|e| e.event_type == event_type)
                .collect()
        }
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn deliver(&self, event: &TrackedEvent) -> attrix_core::Result<()> {
            if !self.healthy.load(Ordering::SeqCst) {
                return Err(AttrixError::network("collector unreachable"));
            }
            self.delivered.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    // Identity store with the disk pulled out.
    struct FailingIdentityRepository;

    #[async_trait]
    impl IdentityRepository for FailingIdentityRepository {
        async fn load(&self) -> attrix_core::Result<Option<VisitorIdentity>> {
            Err(AttrixError::storage_unavailable("no disk"))
        }

        async fn store(&self, _identity: &VisitorIdentity) -> attrix_core::Result<()> {
            Err(AttrixError::storage_unavailable("no disk"))
        }

        async fn clear(&self) -> attrix_core::Result<()> {
            Err(AttrixError::storage_unavailable("no disk"))
        }
    }

    fn test_config() -> TrackerConfig {
        TrackerConfig::new("https://collector.example.com/events", "landing")
    }

    async fn test_tracker(healthy: bool) -> (Tracker, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new(healthy));
        let tracker = Tracker::with_repositories(
            test_config(),
            TrackerRepositories::in_memory(),
            sink.clone(),
        )
        .await;
        (tracker, sink)
    }

    #[tokio::test]
    async fn test_confirmed_event_leaves_the_cache() {
        let (tracker, sink) = test_tracker(true).await;

        tracker.track_event("page_view", HashMap::new()).await;

        assert_eq!(tracker.pending_events().await, 0);
        let delivered = sink.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].event_type, "page_view");
        assert_eq!(delivered[0].tracking_id, tracker.visitor_id());
        // The session stamp rides along in the payload.
        assert_eq!(
            delivered[0].event_data["session_id"],
            tracker.session_id()
        );
        assert_eq!(delivered[0].event_data["site"], "landing");
    }

    #[tokio::test]
    async fn test_failed_send_keeps_event_until_resync() {
        let (tracker, sink) = test_tracker(false).await;

        tracker.track_event("page_view", HashMap::new()).await;
        assert_eq!(tracker.pending_events().await, 1);
        assert!(sink.delivered().is_empty());

        sink.set_healthy(true);
        assert_eq!(tracker.flush().await, 1);
        assert_eq!(tracker.pending_events().await, 0);
        assert_eq!(sink.delivered().len(), 1);
    }

    #[tokio::test]
    async fn test_identical_impressions_are_deduplicated() {
        let (tracker, sink) = test_tracker(true).await;

        let impression = || {
            PersuasionEvent::impression(TriggerKind::Scarcity, "shown")
                .with_subtype("counter")
                .with_element_id("hero-banner")
        };
        tracker.record_trigger_event(impression()).await;
        tracker.record_trigger_event(impression()).await;

        assert_eq!(sink.delivered_of_type("trigger_impression").len(), 1);
        assert_eq!(tracker.pending_events().await, 0);
    }

    #[tokio::test]
    async fn test_interactions_are_always_distinct() {
        let (tracker, sink) = test_tracker(true).await;

        let interaction = || PersuasionEvent::interaction(TriggerKind::Commitment, "clicked");
        tracker.record_trigger_event(interaction()).await;
        tracker.record_trigger_event(interaction()).await;

        assert_eq!(sink.delivered_of_type("trigger_interaction").len(), 2);
    }

    #[tokio::test]
    async fn test_visitor_identity_is_stable_across_trackers() {
        let identity: Arc<dyn IdentityRepository> = Arc::new(InMemoryIdentityRepository::new());
        let sink = Arc::new(RecordingSink::new(true));

        let repositories = |identity: Arc<dyn IdentityRepository>| TrackerRepositories {
            identity,
            ..TrackerRepositories::in_memory()
        };

        let first =
            Tracker::with_repositories(test_config(), repositories(identity.clone()), sink.clone())
                .await;
        let second =
            Tracker::with_repositories(test_config(), repositories(identity), sink).await;

        assert_eq!(first.visitor_id(), second.visitor_id());
        assert_ne!(first.session_id(), second.session_id());
    }

    #[tokio::test]
    async fn test_expired_identity_is_replaced() {
        use chrono::{Duration, Utc};

        let identity_repo: Arc<dyn IdentityRepository> =
            Arc::new(InMemoryIdentityRepository::new());
        let expired = VisitorIdentity {
            id: "00000000-0000-4000-8000-000000000000".to_string(),
            created_at: Utc::now() - Duration::days(400),
        };
        identity_repo.store(&expired).await.unwrap();

        let sink = Arc::new(RecordingSink::new(true));
        let tracker = Tracker::with_repositories(
            test_config(),
            TrackerRepositories {
                identity: identity_repo.clone(),
                ..TrackerRepositories::in_memory()
            },
            sink,
        )
        .await;

        assert_ne!(tracker.visitor_id(), expired.id);
        // The fresh identity was persisted back.
        let stored = identity_repo.load().await.unwrap().unwrap();
        assert_eq!(stored.id, tracker.visitor_id());
    }

    #[tokio::test]
    async fn test_cross_site_transition_is_tracked() {
        let state: Arc<dyn StateRepository> = Arc::new(InMemoryStateRepository::new());
        state.set_last_site("landing".to_string()).await.unwrap();

        let sink = Arc::new(RecordingSink::new(true));
        let mut config = test_config();
        config.site = "docs".to_string();

        let tracker = Tracker::with_repositories(
            config,
            TrackerRepositories {
                state: state.clone(),
                ..TrackerRepositories::in_memory()
            },
            sink.clone(),
        )
        .await;

        let transitions = sink.delivered_of_type("cross_site_transition");
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].event_data["from"], "landing");
        assert_eq!(transitions[0].event_data["to"], "docs");

        assert_eq!(state.last_site().await, Some("docs".to_string()));
        assert_eq!(tracker.session_id().is_empty(), false);
    }

    #[tokio::test]
    async fn test_same_site_visit_emits_no_transition() {
        let state: Arc<dyn StateRepository> = Arc::new(InMemoryStateRepository::new());
        state.set_last_site("landing".to_string()).await.unwrap();

        let sink = Arc::new(RecordingSink::new(true));
        let _tracker = Tracker::with_repositories(
            test_config(),
            TrackerRepositories {
                state,
                ..TrackerRepositories::in_memory()
            },
            sink.clone(),
        )
        .await;

        assert!(sink.delivered_of_type("cross_site_transition").is_empty());
    }

    #[tokio::test]
    async fn test_segments_require_minimum_data() {
        let (tracker, _sink) = test_tracker(true).await;

        // Only the visit counter has a signal so far.
        assert!(tracker.segments().await.is_none());

        tracker.record_scroll_depth(20.0).await;
        tracker.record_time_on_page(10.0).await;

        let segments = tracker.segments().await.expect("three metric kinds");
        assert_eq!(
            segments.behavioral[&SegmentCategory::Engagement],
            "lurker"
        );
    }

    #[tokio::test]
    async fn test_recommendation_before_segmentation_avoids_everything() {
        let (tracker, _sink) = test_tracker(true).await;

        let recommendation = tracker.recommendation().await;
        assert!(recommendation.primary.is_empty());
        assert_eq!(recommendation.avoid.len(), 8);
    }

    #[tokio::test]
    async fn test_recommendation_applies_intensity_preference() {
        let (tracker, _sink) = test_tracker(true).await;
        tracker.record_scroll_depth(20.0).await;
        tracker.record_time_on_page(10.0).await;

        let neutral = tracker.recommendation().await;
        assert!(neutral.primary.contains(&TriggerKind::Curiosity));
        assert!(neutral.primary.contains(&TriggerKind::Scarcity));

        tracker.set_intensity_preference(0.5).await;
        let damped = tracker.recommendation().await;
        assert!(
            (damped.intensity_multiplier - neutral.intensity_multiplier * 0.5).abs() < 1e-9
        );
    }

    #[tokio::test]
    async fn test_disabled_tracker_is_inert() {
        let sink = Arc::new(RecordingSink::new(true));
        let mut config = test_config();
        config.enabled = false;

        let tracker = Tracker::with_repositories(
            config,
            TrackerRepositories::in_memory(),
            sink.clone(),
        )
        .await;

        tracker.track_event("page_view", HashMap::new()).await;
        tracker.record_page_view("pricing").await;

        assert_eq!(tracker.pending_events().await, 0);
        assert!(sink.delivered().is_empty());
        assert!(tracker.segments().await.is_none());
    }

    #[tokio::test]
    async fn test_identity_store_failure_fails_open() {
        let sink = Arc::new(RecordingSink::new(true));
        let tracker = Tracker::with_repositories(
            test_config(),
            TrackerRepositories {
                identity: Arc::new(FailingIdentityRepository),
                ..TrackerRepositories::in_memory()
            },
            sink.clone(),
        )
        .await;

        // Tracking continues against the in-memory identity.
        assert!(!tracker.visitor_id().is_empty());
        tracker.track_event("page_view", HashMap::new()).await;
        assert_eq!(sink.delivered().len(), 1);
    }

    #[tokio::test]
    async fn test_initialize_persists_identity_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config();
        config.shared_dir = Some(temp_dir.path().join("shared"));
        config.data_dir = Some(temp_dir.path().join("site"));

        let first = Tracker::initialize(config.clone()).await;
        let first_id = first.visitor_id().to_string();
        drop(first);

        let second = Tracker::initialize(config).await;
        assert_eq!(second.visitor_id(), first_id);
    }
}
