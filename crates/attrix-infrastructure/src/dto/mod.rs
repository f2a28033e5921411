//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema for persisting tracking
//! data. They are private to the infrastructure layer and handle the
//! evolution of the storage format over time. Domain types never touch
//! disk directly — every aggregate passes through its DTO and migrator.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//!
//! ### Version History
//! - VisitorIdentity **1.0.0**: initial schema
//! - EventCache **1.0.0**: initial schema (event_data stored as a JSON
//!   string to sidestep TOML's lack of null)
//! - Metrics **1.0.0**: counters only; **1.1.0**: added trigger_responses
//!   and conversion_count
//! - Segments **1.0.0**: initial schema (string-keyed category maps)
//! - TrackerState **1.0.0**: last_site only; **1.1.0**: added
//!   intensity_preference

mod event_cache;
mod identity;
mod metrics;
mod segments;
mod state;

// Re-export identity DTOs and migrator
pub use identity::{create_identity_migrator, VisitorIdentityV1_0_0};

// Re-export event cache DTOs and migrator
pub use event_cache::{create_event_cache_migrator, EventCacheV1_0_0, EventRecordV1_0_0};

// Re-export metrics DTOs and migrator
pub use metrics::{create_metrics_migrator, MetricsV1_0_0, MetricsV1_1_0, TriggerResponseDTO};

// Re-export segments DTOs and migrator
pub use segments::{create_segments_migrator, SegmentsV1_0_0};

// Re-export tracker state DTOs and migrator
pub use state::{create_state_migrator, TrackerStateV1_0_0, TrackerStateV1_1_0};
