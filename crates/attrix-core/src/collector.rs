//! The collector delivery seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::event::TrackedEvent;

/// An abstract sink events are delivered to.
///
/// The production implementation POSTs to the remote collector over HTTP;
/// tests substitute recording or failing sinks. A returned error means
/// "not delivered" — the event must stay queued.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Attempts to deliver one event. `Ok(())` confirms receipt and the
    /// event may be removed from the cache; any error leaves it queued.
    async fn deliver(&self, event: &TrackedEvent) -> Result<()>;
}
