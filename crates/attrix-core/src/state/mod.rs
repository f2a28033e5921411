//! Per-site persisted tracker state.

mod model;
mod repository;

pub use model::TrackerState;
pub use repository::StateRepository;
