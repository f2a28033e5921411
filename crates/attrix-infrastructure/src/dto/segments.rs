//! VisitorSegments DTOs and migrations

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

use attrix_core::segments::{SegmentCategory, VisitorSegments};

/// Segments schema V1.0.0 (initial version).
///
/// Category maps are string-keyed in storage; keys that no longer parse
/// as a [`SegmentCategory`] are dropped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct SegmentsV1_0_0 {
    #[serde(default)]
    pub behavioral: HashMap<String, String>,
    #[serde(default)]
    pub psychographic: HashMap<String, String>,
    #[serde(default)]
    pub confidence_scores: HashMap<String, f64>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub data_points: u64,
}

impl Default for SegmentsV1_0_0 {
    fn default() -> Self {
        Self {
            behavioral: HashMap::new(),
            psychographic: HashMap::new(),
            confidence_scores: HashMap::new(),
            last_updated: Utc::now(),
            data_points: 0,
        }
    }
}

fn parse_keys<V>(map: HashMap<String, V>) -> HashMap<SegmentCategory, V> {
    map.into_iter()
        .filter_map(|(key, value)| Some((SegmentCategory::from_str(&key).ok()?, value)))
        .collect()
}

fn render_keys<V>(map: HashMap<SegmentCategory, V>) -> HashMap<String, V> {
    map.into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Convert DTO to domain model.
impl IntoDomain<VisitorSegments> for SegmentsV1_0_0 {
    fn into_domain(self) -> VisitorSegments {
        VisitorSegments {
            behavioral: parse_keys(self.behavioral),
            psychographic: parse_keys(self.psychographic),
            confidence_scores: parse_keys(self.confidence_scores),
            last_updated: self.last_updated,
            data_points: self.data_points as usize,
        }
    }
}

/// Convert domain model to DTO for persistence.
impl version_migrate::FromDomain<VisitorSegments> for SegmentsV1_0_0 {
    fn from_domain(segments: VisitorSegments) -> Self {
        Self {
            behavioral: render_keys(segments.behavioral),
            psychographic: render_keys(segments.psychographic),
            confidence_scores: render_keys(segments.confidence_scores),
            last_updated: segments.last_updated,
            data_points: segments.data_points as u64,
        }
    }
}

/// Creates and configures a Migrator instance for visitor segments.
pub fn create_segments_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    // Register migration path: V1.0.0 -> VisitorSegments
    let segments_path = version_migrate::Migrator::define("segments")
        .from::<SegmentsV1_0_0>()
        .into_with_save::<VisitorSegments>();

    migrator
        .register(segments_path)
        .expect("Failed to register segments migration path");

    migrator
}
