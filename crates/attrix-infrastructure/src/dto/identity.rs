//! VisitorIdentity DTOs and migrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

use attrix_core::identity::VisitorIdentity;

/// Visitor identity schema V1.0.0 (initial version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct VisitorIdentityV1_0_0 {
    /// UUIDv4, stored as a string.
    pub id: String,
    /// When the identity was minted; drives TTL expiry.
    pub created_at: DateTime<Utc>,
}

/// Convert DTO to domain model.
impl IntoDomain<VisitorIdentity> for VisitorIdentityV1_0_0 {
    fn into_domain(self) -> VisitorIdentity {
        VisitorIdentity {
            id: self.id,
            created_at: self.created_at,
        }
    }
}

/// Convert domain model to DTO for persistence.
impl version_migrate::FromDomain<VisitorIdentity> for VisitorIdentityV1_0_0 {
    fn from_domain(identity: VisitorIdentity) -> Self {
        Self {
            id: identity.id,
            created_at: identity.created_at,
        }
    }
}

/// Creates and configures a Migrator instance for visitor identities.
pub fn create_identity_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    // Register migration path: V1.0.0 -> VisitorIdentity
    let identity_path = version_migrate::Migrator::define("visitor_identity")
        .from::<VisitorIdentityV1_0_0>()
        .into_with_save::<VisitorIdentity>();

    migrator
        .register(identity_path)
        .expect("Failed to register visitor_identity migration path");

    migrator
}

#[cfg(test)]
mod tests {
    use super::*;
    use version_migrate::FromDomain;

    #[test]
    fn test_dto_round_trip() {
        let identity = VisitorIdentity::generate();
        let dto = VisitorIdentityV1_0_0::from_domain(identity.clone());
        let back: VisitorIdentity = dto.into_domain();
        assert_eq!(back, identity);
    }

    #[test]
    fn test_migrator_registers() {
        let _migrator = create_identity_migrator();
    }
}
