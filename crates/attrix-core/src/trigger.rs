//! The persuasion-trigger vocabulary and the event shape hosts report.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// The fixed master vocabulary of persuasion triggers.
///
/// `Recommendation::avoid` is always computed as the complement of the
/// recommended triggers against this vocabulary, so the enum is closed on
/// purpose: adding a variant changes every complement.
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
pub enum TriggerKind {
    Scarcity,
    Urgency,
    SocialProof,
    Authority,
    Curiosity,
    Identity,
    Consistency,
    Commitment,
}

/// A persuasion-trigger event as reported by a host UI component.
///
/// `interaction` distinguishes a visitor acting on a trigger (click,
/// dismissal) from the trigger merely being shown. Impressions get a
/// deterministic event id so repeated renders of the same element are
/// deduplicated; interactions are always distinct events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersuasionEvent {
    pub trigger: TriggerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// How strongly the trigger was rendered, 0.0-1.0.
    pub intensity: f64,
    /// The observed effect, e.g. "shown", "clicked", "dismissed".
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default)]
    pub interaction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl PersuasionEvent {
    /// Creates a non-interaction (impression) event.
    pub fn impression(trigger: TriggerKind, effect: impl Into<String>) -> Self {
        Self {
            trigger,
            subtype: None,
            intensity: 1.0,
            effect: effect.into(),
            element_id: None,
            interaction: false,
            metadata: None,
        }
    }

    /// Creates an interaction event.
    pub fn interaction(trigger: TriggerKind, effect: impl Into<String>) -> Self {
        Self {
            interaction: true,
            ..Self::impression(trigger, effect)
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity.clamp(0.0, 1.0);
        self
    }

    /// Generates the event id used for queueing and dedup.
    ///
    /// Interactions are random (UUIDv4). Impressions are deterministic
    /// (UUIDv5 over trigger/subtype/effect/element id), so reporting the
    /// same impression twice yields the same id and the second report is
    /// dropped by the queue.
    pub fn event_id(&self) -> String {
        if self.interaction {
            return Uuid::new_v4().to_string();
        }
        let key = format!(
            "{}:{}:{}:{}",
            self.trigger,
            self.subtype.as_deref().unwrap_or("-"),
            self.effect,
            self.element_id.as_deref().unwrap_or("-"),
        );
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
    }

    /// Flattens the event into the generic payload map carried by a
    /// [`TrackedEvent`](crate::event::TrackedEvent).
    pub fn event_data(&self) -> HashMap<String, Value> {
        let mut data = HashMap::new();
        data.insert(
            "trigger_type".to_string(),
            Value::String(self.trigger.to_string()),
        );
        if let Some(subtype) = &self.subtype {
            data.insert(
                "trigger_subtype".to_string(),
                Value::String(subtype.clone()),
            );
        }
        data.insert("intensity".to_string(), serde_json::json!(self.intensity));
        data.insert("effect".to_string(), Value::String(self.effect.clone()));
        if let Some(element_id) = &self.element_id {
            data.insert("element_id".to_string(), Value::String(element_id.clone()));
        }
        data.insert("interaction".to_string(), Value::Bool(self.interaction));
        if let Some(metadata) = &self.metadata {
            data.insert(
                "metadata".to_string(),
                Value::Object(metadata.clone().into_iter().collect()),
            );
        }
        data
    }
}
