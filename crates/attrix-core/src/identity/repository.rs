//! Identity repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::identity::VisitorIdentity;

/// An abstract store for the durable visitor identity.
///
/// Implementations persist to the shared cross-site scope so that every
/// embedding site resolves the same visitor. Storage failures must not be
/// fatal — the identity store fails open and callers fall back to an
/// in-memory identity for the rest of the process life.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Loads the persisted identity, if any.
    ///
    /// Malformed stored data is treated as absent, not as an error.
    async fn load(&self) -> Result<Option<VisitorIdentity>>;

    /// Persists the identity, replacing any previous one.
    async fn store(&self, identity: &VisitorIdentity) -> Result<()>;

    /// Removes the persisted identity.
    async fn clear(&self) -> Result<()>;
}
