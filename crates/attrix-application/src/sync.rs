//! The sync engine: durable queueing plus best-effort delivery.
//!
//! Per-event state machine: `QUEUED -> SENDING -> CONFIRMED (removed)` or
//! `QUEUED -> SENDING -> FAILED -> QUEUED` (retried on the next sync pass
//! or the next process start). An event is always persisted before the
//! first delivery attempt and removed only after a confirmed 2xx.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use attrix_core::collector::EventSink;
use attrix_core::error::Result;
use attrix_core::event::{EventCacheRepository, TrackedEvent};

/// Queues events durably and pushes them to the collector.
pub struct SyncEngine {
    cache: Arc<dyn EventCacheRepository>,
    sink: Arc<dyn EventSink>,
    /// Every event id handled this process, delivered or not. Keeps a
    /// deterministic impression id from being re-queued after its first
    /// submission was already confirmed and removed from the cache.
    seen: RwLock<HashSet<String>>,
}

impl SyncEngine {
    pub fn new(cache: Arc<dyn EventCacheRepository>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            cache,
            sink,
            seen: RwLock::new(HashSet::new()),
        }
    }

    /// Queues an event and attempts immediate delivery.
    ///
    /// Returns `Ok(false)` when the event was dropped as a duplicate
    /// (same id already handled this process or already queued). Delivery
    /// failure is not an error here — the event simply stays queued.
    pub async fn submit(&self, event: TrackedEvent) -> Result<bool> {
        {
            let mut seen = self.seen.write().await;
            if seen.contains(&event.event_id) {
                tracing::debug!(event_id = %event.event_id, "Duplicate event, dropped");
                return Ok(false);
            }
            seen.insert(event.event_id.clone());
        }

        if self.cache.contains(&event.event_id).await? {
            // Queued by an earlier process; the next sync pass owns it.
            return Ok(false);
        }

        // Durability before delivery.
        if let Err(e) = self.cache.append(&event).await {
            self.seen.write().await.remove(&event.event_id);
            return Err(e);
        }

        self.try_send(&event).await;
        Ok(true)
    }

    /// One delivery attempt. Confirmed events are removed from the cache;
    /// failures leave them queued and only log.
    async fn try_send(&self, event: &TrackedEvent) -> bool {
        match self.sink.deliver(event).await {
            Ok(()) => {
                if let Err(e) = self.cache.remove(&event.event_id).await {
                    tracing::warn!(
                        event_id = %event.event_id,
                        "Delivered but could not dequeue: {e}"
                    );
                }
                true
            }
            Err(e) => {
                tracing::warn!(
                    event_id = %event.event_id,
                    "Delivery failed, event stays queued: {e}"
                );
                false
            }
        }
    }

    /// Re-attempts delivery for a snapshot of the queue, one event at a
    /// time.
    ///
    /// Sequential on purpose — no parallel fan-out, and no backoff or
    /// max-retry cutoff: an undeliverable event is retried once per pass
    /// for as long as it stays queued.
    pub async fn sync_cached(&self) -> Result<usize> {
        let snapshot = self.cache.snapshot().await?;
        if snapshot.is_empty() {
            return Ok(0);
        }
        tracing::debug!(pending = snapshot.len(), "Syncing cached events");

        let mut delivered = 0;
        for event in snapshot {
            self.seen.write().await.insert(event.event_id.clone());
            if self.try_send(&event).await {
                delivered += 1;
            }
        }
        Ok(delivered)
    }

    /// Number of events still awaiting confirmation.
    pub async fn pending(&self) -> Result<usize> {
        self.cache.len().await
    }
}
