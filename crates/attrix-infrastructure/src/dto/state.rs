//! TrackerState DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, MigratesTo, Versioned};

use attrix_core::state::TrackerState;

/// Tracker state schema V1.0.0 (initial version).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct TrackerStateV1_0_0 {
    /// The site the visitor was last seen on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_site: Option<String>,
}

/// Tracker state schema V1.1.0.
///
/// Added intensity_preference for the stored psychological-intensity
/// damper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct TrackerStateV1_1_0 {
    /// The site the visitor was last seen on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_site: Option<String>,

    /// Stored intensity preference, 0.0-1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_preference: Option<f64>,
}

/// Migration from V1.0.0 to V1.1.0.
/// Adds intensity_preference with default value (None).
impl MigratesTo<TrackerStateV1_1_0> for TrackerStateV1_0_0 {
    fn migrate(self) -> TrackerStateV1_1_0 {
        TrackerStateV1_1_0 {
            last_site: self.last_site,
            intensity_preference: None,
        }
    }
}

/// Convert DTO to domain model.
impl IntoDomain<TrackerState> for TrackerStateV1_1_0 {
    fn into_domain(self) -> TrackerState {
        TrackerState {
            last_site: self.last_site,
            intensity_preference: self.intensity_preference,
        }
    }
}

/// Convert domain model to DTO for persistence.
impl version_migrate::FromDomain<TrackerState> for TrackerStateV1_1_0 {
    fn from_domain(state: TrackerState) -> Self {
        Self {
            last_site: state.last_site,
            intensity_preference: state.intensity_preference,
        }
    }
}

/// Creates and configures a Migrator instance for tracker state.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: adds intensity_preference
/// - V1.1.0 → TrackerState: converts DTO to domain model
pub fn create_state_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let state_path = version_migrate::Migrator::define("tracker_state")
        .from::<TrackerStateV1_0_0>()
        .step::<TrackerStateV1_1_0>()
        .into_with_save::<TrackerState>();

    migrator
        .register(state_path)
        .expect("Failed to register tracker_state migration path");

    migrator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_0_migrates_without_preference() {
        let old = TrackerStateV1_0_0 {
            last_site: Some("landing".to_string()),
        };
        let new: TrackerStateV1_1_0 = old.migrate();
        assert_eq!(new.last_site.as_deref(), Some("landing"));
        assert_eq!(new.intensity_preference, None);
    }

    #[test]
    fn test_migrator_registers() {
        let _migrator = create_state_migrator();
    }
}
