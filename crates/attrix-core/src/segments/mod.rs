//! Visitor segment assignments.

mod model;
mod repository;

pub use model::{SegmentCategory, VisitorSegments};
pub use repository::SegmentsRepository;
