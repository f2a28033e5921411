//! BehavioralMetrics DTOs and migrations

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, MigratesTo, Versioned};

use attrix_core::metrics::{BehavioralMetrics, TriggerResponse};
use attrix_core::trigger::TriggerKind;

/// A recorded trigger response as persisted. The trigger is stored as a
/// plain string so an old file with a retired trigger name loads instead
/// of failing; unknown names are dropped on conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerResponseDTO {
    pub trigger: String,
    pub strength: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<TriggerResponse> for TriggerResponseDTO {
    fn from(response: TriggerResponse) -> Self {
        Self {
            trigger: response.trigger.to_string(),
            strength: response.strength,
            recorded_at: response.recorded_at,
        }
    }
}

/// Metrics schema V1.0.0 (initial version): plain counters only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct MetricsV1_0_0 {
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub max_scroll_depth: f64,
    #[serde(default)]
    pub average_time_on_page: f64,
    #[serde(default)]
    pub time_sample_count: u32,
    #[serde(default)]
    pub click_count: u32,
    #[serde(default)]
    pub page_view_count: u32,
    #[serde(default)]
    pub page_views: HashMap<String, u32>,
}

/// Metrics schema V1.1.0.
///
/// Added trigger_responses (psychographic scoring input) and
/// conversion_count (conversion-proximity signal).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct MetricsV1_1_0 {
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub max_scroll_depth: f64,
    #[serde(default)]
    pub average_time_on_page: f64,
    #[serde(default)]
    pub time_sample_count: u32,
    #[serde(default)]
    pub click_count: u32,
    #[serde(default)]
    pub page_view_count: u32,
    #[serde(default)]
    pub page_views: HashMap<String, u32>,
    #[serde(default)]
    pub trigger_responses: Vec<TriggerResponseDTO>,
    #[serde(default)]
    pub conversion_count: u32,
}

/// Migration from V1.0.0 to V1.1.0.
/// Adds trigger_responses and conversion_count with empty defaults.
impl MigratesTo<MetricsV1_1_0> for MetricsV1_0_0 {
    fn migrate(self) -> MetricsV1_1_0 {
        MetricsV1_1_0 {
            visit_count: self.visit_count,
            max_scroll_depth: self.max_scroll_depth,
            average_time_on_page: self.average_time_on_page,
            time_sample_count: self.time_sample_count,
            click_count: self.click_count,
            page_view_count: self.page_view_count,
            page_views: self.page_views,
            trigger_responses: Vec::new(),
            conversion_count: 0,
        }
    }
}

/// Convert DTO to domain model. Responses naming an unknown trigger are
/// dropped rather than failing the load.
impl IntoDomain<BehavioralMetrics> for MetricsV1_1_0 {
    fn into_domain(self) -> BehavioralMetrics {
        BehavioralMetrics {
            visit_count: self.visit_count,
            max_scroll_depth: self.max_scroll_depth,
            average_time_on_page: self.average_time_on_page,
            time_sample_count: self.time_sample_count,
            click_count: self.click_count,
            page_view_count: self.page_view_count,
            page_views: self.page_views,
            trigger_responses: self
                .trigger_responses
                .into_iter()
                .filter_map(|dto| {
                    let trigger = TriggerKind::from_str(&dto.trigger).ok()?;
                    Some(TriggerResponse {
                        trigger,
                        strength: dto.strength,
                        recorded_at: dto.recorded_at,
                    })
                })
                .collect(),
            conversion_count: self.conversion_count,
        }
    }
}

/// Convert domain model to DTO for persistence.
impl version_migrate::FromDomain<BehavioralMetrics> for MetricsV1_1_0 {
    fn from_domain(metrics: BehavioralMetrics) -> Self {
        Self {
            visit_count: metrics.visit_count,
            max_scroll_depth: metrics.max_scroll_depth,
            average_time_on_page: metrics.average_time_on_page,
            time_sample_count: metrics.time_sample_count,
            click_count: metrics.click_count,
            page_view_count: metrics.page_view_count,
            page_views: metrics.page_views,
            trigger_responses: metrics.trigger_responses.into_iter().map(Into::into).collect(),
            conversion_count: metrics.conversion_count,
        }
    }
}

/// Creates and configures a Migrator instance for behavioral metrics.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: adds trigger_responses and conversion_count
/// - V1.1.0 → BehavioralMetrics: converts DTO to domain model
pub fn create_metrics_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let metrics_path = version_migrate::Migrator::define("metrics")
        .from::<MetricsV1_0_0>()
        .step::<MetricsV1_1_0>()
        .into_with_save::<BehavioralMetrics>();

    migrator
        .register(metrics_path)
        .expect("Failed to register metrics migration path");

    migrator
}
