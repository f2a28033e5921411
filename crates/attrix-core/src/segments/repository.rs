//! Segments repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::segments::VisitorSegments;

/// An abstract store for the computed segment assignment.
#[async_trait]
pub trait SegmentsRepository: Send + Sync {
    /// Loads the last computed assignment, if one exists.
    async fn load(&self) -> Result<Option<VisitorSegments>>;

    /// Atomically replaces the stored assignment. Partial merges are not
    /// part of the contract — refreshes are all-or-nothing.
    async fn replace(&self, segments: &VisitorSegments) -> Result<()>;
}
