//! Locally accumulated behavioral metrics.

mod model;
mod repository;

pub use model::{BehavioralMetrics, TriggerResponse, PAGE_CATEGORY_FRAMEWORK, PAGE_CATEGORY_PRICING};
pub use repository::MetricsRepository;
