//! Segment models.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The categories a visitor is bucketed under.
///
/// Behavioral categories derive from hard counters; psychographic ones
/// from recorded trigger responses. The declaration order of the
/// `behavioral()`/`psychographic()` slices is the order recommendation
/// lists are assembled in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SegmentCategory {
    Engagement,
    VisitFrequency,
    ConversionProximity,
    CognitiveStyle,
    Motivation,
    DecisionStyle,
}

impl SegmentCategory {
    /// Behavioral categories, in recommendation order.
    pub const fn behavioral() -> [SegmentCategory; 3] {
        [
            SegmentCategory::Engagement,
            SegmentCategory::VisitFrequency,
            SegmentCategory::ConversionProximity,
        ]
    }

    /// Psychographic categories, in recommendation order.
    pub const fn psychographic() -> [SegmentCategory; 3] {
        [
            SegmentCategory::CognitiveStyle,
            SegmentCategory::Motivation,
            SegmentCategory::DecisionStyle,
        ]
    }

    pub fn is_behavioral(&self) -> bool {
        Self::behavioral().contains(self)
    }
}

/// The visitor's current segment assignments.
///
/// Recomputed wholesale on refresh and replaced atomically; the maps are
/// never partially merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorSegments {
    pub behavioral: HashMap<SegmentCategory, String>,
    pub psychographic: HashMap<SegmentCategory, String>,
    /// Per-category confidence, 0.0-1.0 (in practice clamped to
    /// [0.5, 0.95] by the scoring formula).
    pub confidence_scores: HashMap<SegmentCategory, f64>,
    pub last_updated: DateTime<Utc>,
    /// Observation count the assignment was computed from.
    pub data_points: usize,
}

impl VisitorSegments {
    /// The assigned segment label for a category, behavioral or
    /// psychographic.
    pub fn segment(&self, category: SegmentCategory) -> Option<&str> {
        self.behavioral
            .get(&category)
            .or_else(|| self.psychographic.get(&category))
            .map(String::as_str)
    }

    pub fn confidence(&self, category: SegmentCategory) -> Option<f64> {
        self.confidence_scores.get(&category).copied()
    }

    /// True once the assignment is older than the refresh interval.
    pub fn is_stale(&self, refresh_hours: i64) -> bool {
        Utc::now() - self.last_updated > Duration::hours(refresh_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_partition() {
        for category in SegmentCategory::behavioral() {
            assert!(category.is_behavioral());
        }
        for category in SegmentCategory::psychographic() {
            assert!(!category.is_behavioral());
        }
    }

    #[test]
    fn test_segment_lookup_spans_both_maps() {
        let mut behavioral = HashMap::new();
        behavioral.insert(SegmentCategory::Engagement, "lurker".to_string());
        let mut psychographic = HashMap::new();
        psychographic.insert(SegmentCategory::Motivation, "belonging".to_string());

        let segments = VisitorSegments {
            behavioral,
            psychographic,
            confidence_scores: HashMap::new(),
            last_updated: Utc::now(),
            data_points: 5,
        };

        assert_eq!(segments.segment(SegmentCategory::Engagement), Some("lurker"));
        assert_eq!(
            segments.segment(SegmentCategory::Motivation),
            Some("belonging")
        );
        assert_eq!(segments.segment(SegmentCategory::DecisionStyle), None);
    }

    #[test]
    fn test_staleness() {
        let fresh = VisitorSegments {
            behavioral: HashMap::new(),
            psychographic: HashMap::new(),
            confidence_scores: HashMap::new(),
            last_updated: Utc::now(),
            data_points: 0,
        };
        assert!(!fresh.is_stale(24));

        let old = VisitorSegments {
            last_updated: Utc::now() - Duration::hours(25),
            ..fresh
        };
        assert!(old.is_stale(24));
    }
}
