//! Infrastructure layer of the Attrix SDK: versioned persistence,
//! in-memory fallbacks, and the HTTP collector client.

pub mod async_dir_event_cache_repository;
pub mod async_dir_identity_repository;
pub mod async_dir_metrics_repository;
pub mod async_dir_segments_repository;
pub mod async_dir_state_repository;
pub mod collector;
pub mod dto;
pub mod memory;
pub mod paths;

mod storage;

pub use crate::async_dir_event_cache_repository::AsyncDirEventCacheRepository;
pub use crate::async_dir_identity_repository::AsyncDirIdentityRepository;
pub use crate::async_dir_metrics_repository::AsyncDirMetricsRepository;
pub use crate::async_dir_segments_repository::AsyncDirSegmentsRepository;
pub use crate::async_dir_state_repository::AsyncDirStateRepository;
pub use crate::collector::HttpCollector;
pub use crate::memory::{
    InMemoryEventCacheRepository, InMemoryIdentityRepository, InMemoryMetricsRepository,
    InMemorySegmentsRepository, InMemoryStateRepository,
};
