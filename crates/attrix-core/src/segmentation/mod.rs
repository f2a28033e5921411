//! The segmentation engine.
//!
//! Everything here is a pure function over [`BehavioralMetrics`] driven by
//! declaration-ordered static tables. Matching is first-fit and scoring
//! tie-breaks resolve to the first-declared entry, so table order is
//! behavior — reorder a table and you change assignments.
//!
//! [`BehavioralMetrics`]: crate::metrics::BehavioralMetrics

mod definitions;
mod engine;

pub use definitions::{
    behavioral_entry, metric_value, psychographic_entry, psychographic_table, Metric, MetricRange,
    ProximityStage, PsychographicSegment, ThresholdSegment, COGNITIVE_STYLE_SEGMENTS,
    DECISION_STYLE_SEGMENTS, ENGAGEMENT_SEGMENTS, MOTIVATION_SEGMENTS, PROXIMITY_STAGES,
    VISIT_FREQUENCY_SEGMENTS,
};
pub use engine::{
    confidence_score, determine_proximity_stage, determine_psychographic_segment,
    determine_segment_by_thresholds, update_segments,
};
