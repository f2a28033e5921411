//! The recommendation engine.
//!
//! A pure function of the current segment assignment: no storage access,
//! no side effects.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::segmentation::{behavioral_entry, psychographic_entry};
use crate::segments::{SegmentCategory, VisitorSegments};
use crate::trigger::TriggerKind;

/// A ranked trigger recommendation for the host UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Triggers recommended by the behavioral segments, strongest signal
    /// first.
    pub primary: Vec<TriggerKind>,
    /// Triggers recommended by the psychographic segments, excluding any
    /// already in `primary`.
    pub secondary: Vec<TriggerKind>,
    /// The rest of the vocabulary: triggers with no supporting segment.
    pub avoid: Vec<TriggerKind>,
    /// Product of the behavioral segments' intensity multipliers, damped
    /// by the visitor's stored intensity preference when one is set.
    pub intensity_multiplier: f64,
}

impl Recommendation {
    /// The recommendation for a visitor with no segment assignment yet:
    /// nothing recommended, everything avoided, neutral intensity.
    pub fn unsegmented() -> Self {
        Self {
            primary: Vec::new(),
            secondary: Vec::new(),
            avoid: TriggerKind::iter().collect(),
            intensity_multiplier: 1.0,
        }
    }
}

fn push_unique(list: &mut Vec<TriggerKind>, triggers: &[TriggerKind]) {
    for trigger in triggers {
        if !list.contains(trigger) {
            list.push(*trigger);
        }
    }
}

/// Derives the trigger recommendation from a segment assignment.
///
/// `intensity_preference` is the visitor's stored 0-1 damper; `None`
/// leaves the multiplier untouched.
pub fn recommend(segments: &VisitorSegments, intensity_preference: Option<f64>) -> Recommendation {
    let mut primary = Vec::new();
    let mut intensity_multiplier = 1.0;
    for category in SegmentCategory::behavioral() {
        let Some(name) = segments.behavioral.get(&category) else {
            continue;
        };
        if let Some((triggers, intensity)) = behavioral_entry(category, name) {
            push_unique(&mut primary, triggers);
            intensity_multiplier *= intensity;
        }
    }

    let mut secondary = Vec::new();
    for category in SegmentCategory::psychographic() {
        let Some(name) = segments.psychographic.get(&category) else {
            continue;
        };
        if let Some(triggers) = psychographic_entry(category, name) {
            for trigger in triggers {
                if !primary.contains(trigger) && !secondary.contains(trigger) {
                    secondary.push(*trigger);
                }
            }
        }
    }

    let avoid = TriggerKind::iter()
        .filter(|t| !primary.contains(t) && !secondary.contains(t))
        .collect();

    if let Some(preference) = intensity_preference {
        intensity_multiplier *= preference.clamp(0.0, 1.0);
    }

    Recommendation {
        primary,
        secondary,
        avoid,
        intensity_multiplier,
    }
}
