//! EventCache DTOs and migrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

use attrix_core::event::{EventCache, TrackedEvent};

/// A single queued event as persisted.
///
/// `event_data` is stored as a JSON-encoded string: TOML has no null and
/// event payloads are arbitrary JSON, so the payload is opaque at the
/// storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecordV1_0_0 {
    pub event_id: String,
    pub tracking_id: String,
    pub event_type: String,
    /// JSON-serialized event payload.
    #[serde(default)]
    pub event_data: String,
    pub queued_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

impl From<TrackedEvent> for EventRecordV1_0_0 {
    fn from(event: TrackedEvent) -> Self {
        Self {
            event_id: event.event_id,
            tracking_id: event.tracking_id,
            event_type: event.event_type,
            event_data: serde_json::to_string(&event.event_data).unwrap_or_default(),
            queued_at: event.queued_at,
            timestamp: event.timestamp,
        }
    }
}

impl From<EventRecordV1_0_0> for TrackedEvent {
    fn from(record: EventRecordV1_0_0) -> Self {
        TrackedEvent {
            event_id: record.event_id,
            tracking_id: record.tracking_id,
            event_type: record.event_type,
            // An unreadable payload degrades to an empty one rather than
            // poisoning the whole cache.
            event_data: serde_json::from_str(&record.event_data).unwrap_or_default(),
            queued_at: record.queued_at,
            timestamp: record.timestamp,
        }
    }
}

/// Event cache schema V1.0.0 (initial version).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct EventCacheV1_0_0 {
    #[serde(default)]
    pub events: Vec<EventRecordV1_0_0>,
}

/// Convert DTO to domain model.
impl IntoDomain<EventCache> for EventCacheV1_0_0 {
    fn into_domain(self) -> EventCache {
        EventCache {
            events: self.events.into_iter().map(Into::into).collect(),
        }
    }
}

/// Convert domain model to DTO for persistence.
impl version_migrate::FromDomain<EventCache> for EventCacheV1_0_0 {
    fn from_domain(cache: EventCache) -> Self {
        Self {
            events: cache.events.into_iter().map(Into::into).collect(),
        }
    }
}

/// Creates and configures a Migrator instance for the event cache.
pub fn create_event_cache_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    // Register migration path: V1.0.0 -> EventCache
    let cache_path = version_migrate::Migrator::define("event_cache")
        .from::<EventCacheV1_0_0>()
        .into_with_save::<EventCache>();

    migrator
        .register(cache_path)
        .expect("Failed to register event_cache migration path");

    migrator
}
