//! Event cache repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::event::TrackedEvent;

/// An abstract durable queue of not-yet-confirmed events.
///
/// The contract backing the no-silent-loss invariant: an event must be
/// appended (and persisted) before any delivery attempt, and removed only
/// after a confirmed delivery.
#[async_trait]
pub trait EventCacheRepository: Send + Sync {
    /// Appends an event to the queue. A duplicate `event_id` is a no-op.
    async fn append(&self, event: &TrackedEvent) -> Result<()>;

    /// Returns a point-in-time copy of the queued events, oldest first.
    async fn snapshot(&self) -> Result<Vec<TrackedEvent>>;

    /// Removes the event with the given id after confirmed delivery.
    async fn remove(&self, event_id: &str) -> Result<()>;

    /// Whether an event with the given id is currently queued.
    async fn contains(&self, event_id: &str) -> Result<bool>;

    /// Number of queued events.
    async fn len(&self) -> Result<usize>;
}
