//! Identity models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A durable per-visitor identity.
///
/// Created once and persisted in the shared (cross-site) scope, so every
/// Attrix-embedding site on the device attributes events to the same
/// visitor. Immutable for its lifetime; after `identity_ttl_days` a fresh
/// identity replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorIdentity {
    /// UUIDv4, stored as a string.
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl VisitorIdentity {
    /// Mints a fresh identity.
    pub fn generate() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }

    /// True once the identity has outlived its TTL.
    pub fn is_expired(&self, ttl_days: i64) -> bool {
        Utc::now() - self.created_at > Duration::days(ttl_days)
    }
}

/// A per-process session identity, regenerated on every tracker
/// construction and never persisted. Groups events temporally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: String,
    pub started_at: DateTime<Utc>,
}

impl SessionIdentity {
    pub fn generate() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_identities_are_unique() {
        let a = VisitorIdentity::generate();
        let b = VisitorIdentity::generate();
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_fresh_identity_is_not_expired() {
        let identity = VisitorIdentity::generate();
        assert!(!identity.is_expired(365));
    }

    #[test]
    fn test_old_identity_is_expired() {
        let identity = VisitorIdentity {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now() - Duration::days(366),
        };
        assert!(identity.is_expired(365));
        assert!(!identity.is_expired(400));
    }
}
