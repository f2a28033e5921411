//! Domain core of the Attrix tracking SDK.
//!
//! Models, repository traits and the pure segmentation/recommendation
//! engines. No I/O lives here — storage and network implementations are
//! provided by `attrix-infrastructure` and orchestrated by
//! `attrix-application`.

pub mod collector;
pub mod config;
pub mod error;
pub mod event;
pub mod identity;
pub mod metrics;
pub mod recommendation;
pub mod segmentation;
pub mod segments;
pub mod state;
pub mod trigger;

// Re-export the types hosts touch most.
pub use collector::EventSink;
pub use config::TrackerConfig;
pub use error::{AttrixError, Result};
pub use event::{EventCache, EventCacheRepository, TrackedEvent};
pub use identity::{IdentityRepository, SessionIdentity, VisitorIdentity};
pub use metrics::{BehavioralMetrics, MetricsRepository, TriggerResponse};
pub use recommendation::{recommend, Recommendation};
pub use segments::{SegmentCategory, SegmentsRepository, VisitorSegments};
pub use state::{StateRepository, TrackerState};
pub use trigger::{PersuasionEvent, TriggerKind};
