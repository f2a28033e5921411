//! Segment definition tables.
//!
//! Declaration order is load-bearing: threshold matching is first-fit and
//! score ties resolve to the earliest entry.

use crate::metrics::{BehavioralMetrics, PAGE_CATEGORY_FRAMEWORK, PAGE_CATEGORY_PRICING};
use crate::segments::SegmentCategory;
use crate::trigger::TriggerKind;

/// An inclusive numeric range.
#[derive(Debug, Clone, Copy)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The metrics threshold segments range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    ScrollDepth,
    ClickRate,
    TimeOnPage,
    VisitCount,
}

/// Reads the value a [`Metric`] refers to.
pub fn metric_value(metrics: &BehavioralMetrics, metric: Metric) -> f64 {
    match metric {
        Metric::ScrollDepth => metrics.max_scroll_depth,
        Metric::ClickRate => metrics.click_rate(),
        Metric::TimeOnPage => metrics.average_time_on_page,
        Metric::VisitCount => f64::from(metrics.visit_count),
    }
}

/// A behavioral segment declared as per-metric inclusive ranges.
#[derive(Debug)]
pub struct ThresholdSegment {
    pub name: &'static str,
    pub ranges: &'static [(Metric, MetricRange)],
    /// Triggers this segment recommends.
    pub triggers: &'static [TriggerKind],
    /// Contribution to the recommendation intensity multiplier.
    pub intensity: f64,
}

/// Engagement segments, first-fit order.
pub static ENGAGEMENT_SEGMENTS: &[ThresholdSegment] = &[
    ThresholdSegment {
        name: "lurker",
        ranges: &[
            (Metric::ScrollDepth, MetricRange::new(0.0, 30.0)),
            (Metric::ClickRate, MetricRange::new(0.0, 0.1)),
            (Metric::TimeOnPage, MetricRange::new(0.0, 45.0)),
        ],
        triggers: &[TriggerKind::Curiosity, TriggerKind::Scarcity],
        intensity: 0.7,
    },
    ThresholdSegment {
        name: "scanner",
        ranges: &[
            (Metric::ScrollDepth, MetricRange::new(30.0, 70.0)),
            (Metric::ClickRate, MetricRange::new(0.0, 0.3)),
            (Metric::TimeOnPage, MetricRange::new(0.0, 90.0)),
        ],
        triggers: &[TriggerKind::SocialProof, TriggerKind::Urgency],
        intensity: 0.85,
    },
    ThresholdSegment {
        name: "reader",
        ranges: &[
            (Metric::ScrollDepth, MetricRange::new(60.0, 100.0)),
            (Metric::ClickRate, MetricRange::new(0.0, 0.5)),
            (Metric::TimeOnPage, MetricRange::new(90.0, 600.0)),
        ],
        triggers: &[TriggerKind::Authority, TriggerKind::Identity],
        intensity: 1.0,
    },
    ThresholdSegment {
        name: "engager",
        ranges: &[
            (Metric::ScrollDepth, MetricRange::new(50.0, 100.0)),
            (Metric::ClickRate, MetricRange::new(0.3, 1.0)),
            (Metric::TimeOnPage, MetricRange::new(60.0, 900.0)),
        ],
        triggers: &[TriggerKind::Commitment, TriggerKind::Identity],
        intensity: 1.2,
    },
];

/// Visit-frequency segments, first-fit order.
pub static VISIT_FREQUENCY_SEGMENTS: &[ThresholdSegment] = &[
    ThresholdSegment {
        name: "first_time",
        ranges: &[(Metric::VisitCount, MetricRange::new(0.0, 1.0))],
        triggers: &[TriggerKind::Curiosity, TriggerKind::SocialProof],
        intensity: 1.0,
    },
    ThresholdSegment {
        name: "returning",
        ranges: &[(Metric::VisitCount, MetricRange::new(2.0, 4.0))],
        triggers: &[TriggerKind::Consistency, TriggerKind::Scarcity],
        intensity: 1.0,
    },
    ThresholdSegment {
        name: "frequent",
        ranges: &[(Metric::VisitCount, MetricRange::new(5.0, 10000.0))],
        triggers: &[TriggerKind::Identity, TriggerKind::Commitment],
        intensity: 1.1,
    },
];

/// A conversion-proximity stage with three independent signals.
#[derive(Debug)]
pub struct ProximityStage {
    pub name: &'static str,
    pub triggers: &'static [TriggerKind],
    pub intensity: f64,
    pub signals: fn(&BehavioralMetrics) -> [bool; 3],
}

fn cold_signals(m: &BehavioralMetrics) -> [bool; 3] {
    [
        m.visit_count <= 1,
        m.views_in(PAGE_CATEGORY_FRAMEWORK) == 0,
        m.average_time_on_page < 60.0,
    ]
}

fn warming_signals(m: &BehavioralMetrics) -> [bool; 3] {
    [
        m.visit_count >= 2,
        m.views_in(PAGE_CATEGORY_FRAMEWORK) >= 1,
        m.max_scroll_depth >= 50.0,
    ]
}

fn hot_signals(m: &BehavioralMetrics) -> [bool; 3] {
    [
        m.views_in(PAGE_CATEGORY_PRICING) >= 1,
        m.click_rate() >= 0.3,
        m.visit_count >= 3,
    ]
}

fn converted_signals(m: &BehavioralMetrics) -> [bool; 3] {
    [
        m.conversion_count >= 1,
        m.views_in(PAGE_CATEGORY_PRICING) >= 2,
        m.visit_count >= 5,
    ]
}

/// Conversion-proximity stages, scan order. Ties keep the earliest stage.
pub static PROXIMITY_STAGES: &[ProximityStage] = &[
    ProximityStage {
        name: "cold",
        triggers: &[TriggerKind::Curiosity, TriggerKind::SocialProof],
        intensity: 0.9,
        signals: cold_signals,
    },
    ProximityStage {
        name: "warming",
        triggers: &[TriggerKind::Scarcity, TriggerKind::Authority],
        intensity: 1.0,
        signals: warming_signals,
    },
    ProximityStage {
        name: "hot",
        triggers: &[TriggerKind::Urgency, TriggerKind::Scarcity],
        intensity: 1.25,
        signals: hot_signals,
    },
    ProximityStage {
        name: "converted",
        triggers: &[TriggerKind::Identity, TriggerKind::Consistency],
        intensity: 0.5,
        signals: converted_signals,
    },
];

/// A psychographic segment declared by the triggers it resonates with.
/// The trigger list doubles as the segment's recommended triggers.
#[derive(Debug)]
pub struct PsychographicSegment {
    pub name: &'static str,
    pub triggers: &'static [TriggerKind],
}

pub static COGNITIVE_STYLE_SEGMENTS: &[PsychographicSegment] = &[
    PsychographicSegment {
        name: "analytical",
        triggers: &[TriggerKind::Authority, TriggerKind::Consistency],
    },
    PsychographicSegment {
        name: "intuitive",
        triggers: &[TriggerKind::Curiosity, TriggerKind::Identity],
    },
    PsychographicSegment {
        name: "social",
        triggers: &[TriggerKind::SocialProof, TriggerKind::Urgency],
    },
];

pub static MOTIVATION_SEGMENTS: &[PsychographicSegment] = &[
    PsychographicSegment {
        name: "achievement",
        triggers: &[TriggerKind::Commitment, TriggerKind::Scarcity],
    },
    PsychographicSegment {
        name: "belonging",
        triggers: &[TriggerKind::SocialProof, TriggerKind::Identity],
    },
    PsychographicSegment {
        name: "security",
        triggers: &[TriggerKind::Authority, TriggerKind::Consistency],
    },
];

pub static DECISION_STYLE_SEGMENTS: &[PsychographicSegment] = &[
    PsychographicSegment {
        name: "deliberate",
        triggers: &[TriggerKind::Consistency, TriggerKind::Authority],
    },
    PsychographicSegment {
        name: "spontaneous",
        triggers: &[TriggerKind::Urgency, TriggerKind::Scarcity],
    },
    PsychographicSegment {
        name: "consensus",
        triggers: &[TriggerKind::SocialProof, TriggerKind::Identity],
    },
];

/// The psychographic table for a category. Returns `None` for behavioral
/// categories.
pub fn psychographic_table(category: SegmentCategory) -> Option<&'static [PsychographicSegment]> {
    match category {
        SegmentCategory::CognitiveStyle => Some(COGNITIVE_STYLE_SEGMENTS),
        SegmentCategory::Motivation => Some(MOTIVATION_SEGMENTS),
        SegmentCategory::DecisionStyle => Some(DECISION_STYLE_SEGMENTS),
        _ => None,
    }
}

/// Looks up a behavioral segment's recommended triggers and intensity by
/// its assigned label.
pub fn behavioral_entry(
    category: SegmentCategory,
    name: &str,
) -> Option<(&'static [TriggerKind], f64)> {
    match category {
        SegmentCategory::Engagement => ENGAGEMENT_SEGMENTS
            .iter()
            .find(|s| s.name == name)
            .map(|s| (s.triggers, s.intensity)),
        SegmentCategory::VisitFrequency => VISIT_FREQUENCY_SEGMENTS
            .iter()
            .find(|s| s.name == name)
            .map(|s| (s.triggers, s.intensity)),
        SegmentCategory::ConversionProximity => PROXIMITY_STAGES
            .iter()
            .find(|s| s.name == name)
            .map(|s| (s.triggers, s.intensity)),
        _ => None,
    }
}

/// Looks up a psychographic segment's recommended triggers by its
/// assigned label.
pub fn psychographic_entry(
    category: SegmentCategory,
    name: &str,
) -> Option<&'static [TriggerKind]> {
    psychographic_table(category)?
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.triggers)
}
