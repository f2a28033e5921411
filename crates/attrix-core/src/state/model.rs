//! Tracker state model.

use serde::{Deserialize, Serialize};

/// Small per-site persisted odds and ends that belong to no other
/// aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    /// The site the visitor was last seen on. Used to detect cross-site
    /// transitions at tracker startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_site: Option<String>,

    /// The visitor's stored psychological-intensity preference, 0.0-1.0.
    /// Dampens the recommendation multiplier when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_preference: Option<f64>,
}
