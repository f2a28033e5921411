//! Pure segment-assignment functions.

use std::collections::HashMap;

use chrono::Utc;

use crate::error::{AttrixError, Result};
use crate::metrics::{BehavioralMetrics, TriggerResponse};
use crate::segmentation::definitions::{
    metric_value, psychographic_table, ProximityStage, PsychographicSegment, ThresholdSegment,
    ENGAGEMENT_SEGMENTS, PROXIMITY_STAGES, VISIT_FREQUENCY_SEGMENTS,
};
use crate::segments::{SegmentCategory, VisitorSegments};
use crate::trigger::TriggerKind;

/// Selects the first segment whose ranges all contain the visitor's
/// metrics. First-fit, not closest-fit: the scan stops at the first match
/// and falls back to the first declared segment when nothing matches.
///
/// The table must be non-empty.
pub fn determine_segment_by_thresholds<'a>(
    table: &'a [ThresholdSegment],
    metrics: &BehavioralMetrics,
) -> &'a ThresholdSegment {
    table
        .iter()
        .find(|segment| {
            segment
                .ranges
                .iter()
                .all(|(metric, range)| range.contains(metric_value(metrics, *metric)))
        })
        .unwrap_or(&table[0])
}

/// Counts each stage's true signals and keeps the stage with the most.
/// Ties keep the earliest stage in scan order (cold first).
pub fn determine_proximity_stage(metrics: &BehavioralMetrics) -> &'static ProximityStage {
    let mut best = &PROXIMITY_STAGES[0];
    let mut best_count = 0;
    for stage in PROXIMITY_STAGES {
        let count = (stage.signals)(metrics).iter().filter(|s| **s).count();
        if count > best_count {
            best = stage;
            best_count = count;
        }
    }
    best
}

/// Ranks the visitor's strongest response per trigger type and scores
/// each segment by summing reciprocal-rank weights (`1/position`) of the
/// triggers it declares. The highest-scoring segment wins; ties resolve
/// to the first-declared segment. With no responses at all the first
/// declared segment is returned.
pub fn determine_psychographic_segment<'a>(
    table: &'a [PsychographicSegment],
    responses: &[TriggerResponse],
) -> &'a PsychographicSegment {
    // Collapse history to the strongest response per trigger type.
    let mut strongest: Vec<(TriggerKind, f64)> = Vec::new();
    for response in responses {
        match strongest.iter_mut().find(|(t, _)| *t == response.trigger) {
            Some((_, s)) => {
                if response.strength > *s {
                    *s = response.strength;
                }
            }
            None => strongest.push((response.trigger, response.strength)),
        }
    }
    // Stable sort: equal strengths keep first-recorded order.
    strongest.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut best = &table[0];
    let mut best_score = 0.0;
    for segment in table {
        let score: f64 = strongest
            .iter()
            .enumerate()
            .filter(|(_, (trigger, _))| segment.triggers.contains(trigger))
            .map(|(position, _)| 1.0 / (position as f64 + 1.0))
            .sum();
        if score > best_score {
            best = segment;
            best_score = score;
        }
    }
    best
}

/// Deterministic confidence for a category's assignment.
///
/// `0.5 + min(0.3, data_points/30) + bonus`, clamped to 0.95. The bonus
/// depends on the category: interaction rate for engagement, visit count
/// for visit frequency, page-view presence for everything else.
pub fn confidence_score(category: SegmentCategory, metrics: &BehavioralMetrics) -> f64 {
    let mut score = 0.5 + (metrics.data_points() as f64 / 30.0).min(0.3);
    score += match category {
        SegmentCategory::Engagement => (metrics.click_rate() * 0.25).min(0.1),
        SegmentCategory::VisitFrequency => (f64::from(metrics.visit_count) / 20.0).min(0.1),
        _ => {
            if metrics.page_view_count > 0 {
                0.05
            } else {
                0.0
            }
        }
    };
    score.min(0.95)
}

/// Computes a fresh, complete segment assignment from the metrics.
///
/// All-or-nothing: with fewer than `min_metric_kinds` distinct metric
/// kinds available the refresh is skipped entirely and
/// [`AttrixError::InsufficientData`] is returned (callers treat it as a
/// silent no-op, keeping the previous assignment).
pub fn update_segments(
    metrics: &BehavioralMetrics,
    min_metric_kinds: usize,
) -> Result<VisitorSegments> {
    let available = metrics.available_metric_kinds();
    if available < min_metric_kinds {
        return Err(AttrixError::insufficient_data(min_metric_kinds, available));
    }

    let mut behavioral = HashMap::new();
    behavioral.insert(
        SegmentCategory::Engagement,
        determine_segment_by_thresholds(ENGAGEMENT_SEGMENTS, metrics)
            .name
            .to_string(),
    );
    behavioral.insert(
        SegmentCategory::VisitFrequency,
        determine_segment_by_thresholds(VISIT_FREQUENCY_SEGMENTS, metrics)
            .name
            .to_string(),
    );
    behavioral.insert(
        SegmentCategory::ConversionProximity,
        determine_proximity_stage(metrics).name.to_string(),
    );

    let mut psychographic = HashMap::new();
    for category in SegmentCategory::psychographic() {
        let table = psychographic_table(category)
            .ok_or_else(|| AttrixError::internal(format!("no table for {category}")))?;
        psychographic.insert(
            category,
            determine_psychographic_segment(table, &metrics.trigger_responses)
                .name
                .to_string(),
        );
    }

    let mut confidence_scores = HashMap::new();
    for category in SegmentCategory::behavioral()
        .into_iter()
        .chain(SegmentCategory::psychographic())
    {
        confidence_scores.insert(category, confidence_score(category, metrics));
    }

    Ok(VisitorSegments {
        behavioral,
        psychographic,
        confidence_scores,
        last_updated: Utc::now(),
        data_points: metrics.data_points(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PAGE_CATEGORY_PRICING;

    fn lurker_metrics() -> BehavioralMetrics {
        let mut metrics = BehavioralMetrics::default();
        metrics.record_visit();
        metrics.record_scroll_depth(20.0);
        metrics.record_time_on_page(10.0);
        metrics
    }

    #[test]
    fn test_lurker_scenario() {
        let metrics = lurker_metrics();
        assert_eq!(metrics.click_rate(), 0.0);

        let segment = determine_segment_by_thresholds(ENGAGEMENT_SEGMENTS, &metrics);
        assert_eq!(segment.name, "lurker");
        assert!((segment.intensity - 0.7).abs() < f64::EPSILON);
        assert!(segment.triggers.contains(&TriggerKind::Curiosity));
        assert!(segment.triggers.contains(&TriggerKind::Scarcity));
    }

    #[test]
    fn test_threshold_matching_is_first_fit_not_closest() {
        // scroll 65 / click 0.2 / time 80 satisfies both "scanner" and
        // (nearly) "reader"; the scan must stop at scanner.
        let mut metrics = BehavioralMetrics::default();
        metrics.record_scroll_depth(65.0);
        metrics.record_time_on_page(80.0);
        for _ in 0..10 {
            metrics.record_page_view("landing");
        }
        metrics.record_click();
        metrics.record_click();

        let segment = determine_segment_by_thresholds(ENGAGEMENT_SEGMENTS, &metrics);
        assert_eq!(segment.name, "scanner");
    }

    #[test]
    fn test_threshold_matching_is_idempotent() {
        let metrics = lurker_metrics();
        let first = determine_segment_by_thresholds(ENGAGEMENT_SEGMENTS, &metrics).name;
        let second = determine_segment_by_thresholds(ENGAGEMENT_SEGMENTS, &metrics).name;
        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_fallback_is_first_declared() {
        // click rate 0.9 with shallow scroll matches no engagement
        // segment; the first declared one is the fallback.
        let mut metrics = BehavioralMetrics::default();
        metrics.record_scroll_depth(10.0);
        metrics.record_page_view("landing");
        for _ in 0..9 {
            metrics.record_click();
        }
        metrics.record_time_on_page(300.0);

        let segment = determine_segment_by_thresholds(ENGAGEMENT_SEGMENTS, &metrics);
        assert_eq!(segment.name, "lurker");
    }

    #[test]
    fn test_proximity_new_visitor_is_cold() {
        let metrics = BehavioralMetrics::default();
        assert_eq!(determine_proximity_stage(&metrics).name, "cold");
    }

    #[test]
    fn test_proximity_tie_keeps_earliest_stage() {
        // visits 2, scroll 70, time 30, no framework views: cold scores 2
        // (no framework views, short time) and warming scores 2 (repeat
        // visits, deep scroll). The scan keeps cold.
        let mut metrics = BehavioralMetrics::default();
        metrics.record_visit();
        metrics.record_visit();
        metrics.record_scroll_depth(70.0);
        metrics.record_time_on_page(30.0);

        assert_eq!(determine_proximity_stage(&metrics).name, "cold");
    }

    #[test]
    fn test_proximity_hot_stage_wins_with_signals() {
        // Pricing view + high click rate + repeat visits: hot scores 3,
        // warming at most 1 (no framework views, shallow scroll).
        let mut metrics = BehavioralMetrics::default();
        for _ in 0..4 {
            metrics.record_visit();
        }
        metrics.record_page_view(PAGE_CATEGORY_PRICING);
        metrics.record_click();
        metrics.record_scroll_depth(40.0);

        let stage = determine_proximity_stage(&metrics);
        assert_eq!(stage.name, "hot");
    }

    #[test]
    fn test_psychographic_reciprocal_rank() {
        use crate::segmentation::definitions::COGNITIVE_STYLE_SEGMENTS;

        let mut metrics = BehavioralMetrics::default();
        // authority strongest, social_proof second, curiosity third:
        // analytical = 1/1, social = 1/2, intuitive = 1/3.
        metrics.record_trigger_response(TriggerKind::Authority, 0.9);
        metrics.record_trigger_response(TriggerKind::SocialProof, 0.6);
        metrics.record_trigger_response(TriggerKind::Curiosity, 0.3);

        let segment =
            determine_psychographic_segment(COGNITIVE_STYLE_SEGMENTS, &metrics.trigger_responses);
        assert_eq!(segment.name, "analytical");
    }

    #[test]
    fn test_psychographic_equal_strength_keeps_recorded_order() {
        use crate::segmentation::definitions::MOTIVATION_SEGMENTS;

        // Equal strengths: the stable sort keeps commitment (recorded
        // first) at rank 1, so achievement outscores belonging 1.0 to 0.5.
        let mut metrics = BehavioralMetrics::default();
        metrics.record_trigger_response(TriggerKind::Commitment, 0.5);
        metrics.record_trigger_response(TriggerKind::SocialProof, 0.5);

        let segment =
            determine_psychographic_segment(MOTIVATION_SEGMENTS, &metrics.trigger_responses);
        assert_eq!(segment.name, "achievement");
    }

    #[test]
    fn test_psychographic_zero_score_tie_resolves_to_first_declared() {
        use crate::segmentation::definitions::COGNITIVE_STYLE_SEGMENTS;

        // scarcity appears in no cognitive-style segment, so every
        // segment scores zero and the first declared one wins.
        let mut metrics = BehavioralMetrics::default();
        metrics.record_trigger_response(TriggerKind::Scarcity, 0.9);

        let segment =
            determine_psychographic_segment(COGNITIVE_STYLE_SEGMENTS, &metrics.trigger_responses);
        assert_eq!(segment.name, "analytical");
    }

    #[test]
    fn test_psychographic_no_responses_falls_back_to_first() {
        use crate::segmentation::definitions::DECISION_STYLE_SEGMENTS;

        let segment = determine_psychographic_segment(DECISION_STYLE_SEGMENTS, &[]);
        assert_eq!(segment.name, "deliberate");
    }

    #[test]
    fn test_confidence_bounds() {
        let empty = BehavioralMetrics::default();
        for category in SegmentCategory::behavioral()
            .into_iter()
            .chain(SegmentCategory::psychographic())
        {
            let score = confidence_score(category, &empty);
            assert!((0.5..=0.95).contains(&score), "{category}: {score}");
        }

        // Saturate every bonus and verify the ceiling holds.
        let mut heavy = BehavioralMetrics::default();
        for _ in 0..50 {
            heavy.record_visit();
            heavy.record_page_view("landing");
            heavy.record_click();
        }
        for category in SegmentCategory::behavioral()
            .into_iter()
            .chain(SegmentCategory::psychographic())
        {
            let score = confidence_score(category, &heavy);
            assert!((0.5..=0.95).contains(&score), "{category}: {score}");
        }
    }

    #[test]
    fn test_confidence_is_deterministic() {
        let metrics = lurker_metrics();
        let a = confidence_score(SegmentCategory::Engagement, &metrics);
        let b = confidence_score(SegmentCategory::Engagement, &metrics);
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_segments_skips_below_minimum() {
        let mut metrics = BehavioralMetrics::default();
        metrics.record_visit();

        let err = update_segments(&metrics, 3).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_update_segments_assigns_every_category() {
        let metrics = lurker_metrics();
        let segments = update_segments(&metrics, 3).unwrap();

        for category in SegmentCategory::behavioral() {
            assert!(segments.behavioral.contains_key(&category));
        }
        for category in SegmentCategory::psychographic() {
            assert!(segments.psychographic.contains_key(&category));
        }
        assert_eq!(segments.confidence_scores.len(), 6);
        assert_eq!(segments.data_points, metrics.data_points());
        assert_eq!(
            segments.behavioral[&SegmentCategory::Engagement],
            "lurker"
        );
    }
}
