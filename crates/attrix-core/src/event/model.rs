//! Event models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single analytics event.
///
/// Events are append-only: created on a tracked interaction, never
/// mutated, and removed from the cache only after the collector confirms
/// receipt with a 2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedEvent {
    /// Queue/dedup identity. Random for interactions, deterministic for
    /// trigger impressions.
    pub event_id: String,
    /// The visitor this event is attributed to.
    pub tracking_id: String,
    pub event_type: String,
    #[serde(default)]
    pub event_data: HashMap<String, Value>,
    /// When the event entered the local cache.
    pub queued_at: DateTime<Utc>,
    /// When the tracked interaction happened.
    pub timestamp: DateTime<Utc>,
}

impl TrackedEvent {
    /// Creates an event with a random id.
    pub fn new(
        tracking_id: impl Into<String>,
        event_type: impl Into<String>,
        event_data: HashMap<String, Value>,
    ) -> Self {
        Self::with_event_id(
            Uuid::new_v4().to_string(),
            tracking_id,
            event_type,
            event_data,
        )
    }

    /// Creates an event with a caller-supplied id (used for deduplicated
    /// trigger impressions).
    pub fn with_event_id(
        event_id: impl Into<String>,
        tracking_id: impl Into<String>,
        event_type: impl Into<String>,
        event_data: HashMap<String, Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            event_id: event_id.into(),
            tracking_id: tracking_id.into(),
            event_type: event_type.into(),
            event_data,
            queued_at: now,
            timestamp: now,
        }
    }
}

/// The durable local queue of not-yet-confirmed events.
///
/// Persisted as one aggregate and replaced wholesale on every mutation,
/// which keeps the write path simple at the cost of last-writer-wins races
/// between concurrent processes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCache {
    #[serde(default)]
    pub events: Vec<TrackedEvent>,
}

impl EventCache {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.events.iter().any(|e| e.event_id == event_id)
    }

    /// Appends an event. Duplicate ids are rejected so a deterministic
    /// impression id can only occupy one slot.
    pub fn push(&mut self, event: TrackedEvent) -> bool {
        if self.contains(&event.event_id) {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Removes the event with the given id. Returns whether anything was
    /// removed.
    pub fn remove(&mut self, event_id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.event_id != event_id);
        self.events.len() != before
    }
}
