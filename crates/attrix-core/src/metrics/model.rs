//! Behavioral metric models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trigger::TriggerKind;

/// Page-view category for framework/feature content pages.
pub const PAGE_CATEGORY_FRAMEWORK: &str = "framework";
/// Page-view category for pricing pages.
pub const PAGE_CATEGORY_PRICING: &str = "pricing";

/// A visitor's recorded response to a persuasion trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub trigger: TriggerKind,
    /// Response strength, 0.0-1.0.
    pub strength: f64,
    pub recorded_at: DateTime<Utc>,
}

/// The accumulated local counters the segmentation engine reads.
///
/// Counters only ever grow (scroll depth keeps its maximum, time on page
/// a running average); segmentation derives everything else from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehavioralMetrics {
    #[serde(default)]
    pub visit_count: u32,
    /// Deepest scroll observed, 0-100.
    #[serde(default)]
    pub max_scroll_depth: f64,
    /// Running average of reported time-on-page samples, in seconds.
    #[serde(default)]
    pub average_time_on_page: f64,
    #[serde(default)]
    pub time_sample_count: u32,
    #[serde(default)]
    pub click_count: u32,
    #[serde(default)]
    pub page_view_count: u32,
    /// Page views bucketed by content category.
    #[serde(default)]
    pub page_views: HashMap<String, u32>,
    #[serde(default)]
    pub trigger_responses: Vec<TriggerResponse>,
    #[serde(default)]
    pub conversion_count: u32,
}

impl BehavioralMetrics {
    /// Clicks per page view; 0 when nothing has been viewed yet.
    pub fn click_rate(&self) -> f64 {
        if self.page_view_count == 0 {
            0.0
        } else {
            f64::from(self.click_count) / f64::from(self.page_view_count)
        }
    }

    /// Views recorded for a specific content category.
    pub fn views_in(&self, category: &str) -> u32 {
        self.page_views.get(category).copied().unwrap_or(0)
    }

    /// Total recorded observations. Feeds the confidence formula.
    pub fn data_points(&self) -> usize {
        self.visit_count as usize + self.page_view_count as usize + self.trigger_responses.len()
    }

    /// How many distinct metric kinds have any signal. Segmentation is
    /// all-or-nothing: below the configured minimum it is skipped.
    pub fn available_metric_kinds(&self) -> usize {
        [
            self.visit_count > 0,
            self.max_scroll_depth > 0.0,
            self.average_time_on_page > 0.0,
            self.click_count > 0,
            !self.page_views.is_empty(),
            !self.trigger_responses.is_empty(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    // ── Recording ─────────────────────────────────────────────────────────

    pub fn record_visit(&mut self) {
        self.visit_count = self.visit_count.saturating_add(1);
    }

    pub fn record_page_view(&mut self, category: &str) {
        self.page_view_count = self.page_view_count.saturating_add(1);
        *self.page_views.entry(category.to_string()).or_insert(0) += 1;
    }

    /// Keeps the deepest scroll position seen, clamped to 0-100.
    pub fn record_scroll_depth(&mut self, depth: f64) {
        let depth = depth.clamp(0.0, 100.0);
        if depth > self.max_scroll_depth {
            self.max_scroll_depth = depth;
        }
    }

    /// Folds a time-on-page sample into the running average.
    pub fn record_time_on_page(&mut self, seconds: f64) {
        if seconds < 0.0 {
            return;
        }
        let samples = f64::from(self.time_sample_count);
        self.average_time_on_page =
            (self.average_time_on_page * samples + seconds) / (samples + 1.0);
        self.time_sample_count = self.time_sample_count.saturating_add(1);
    }

    pub fn record_click(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
    }

    pub fn record_conversion(&mut self) {
        self.conversion_count = self.conversion_count.saturating_add(1);
    }

    pub fn record_trigger_response(&mut self, trigger: TriggerKind, strength: f64) {
        self.trigger_responses.push(TriggerResponse {
            trigger,
            strength: strength.clamp(0.0, 1.0),
            recorded_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_rate_handles_zero_views() {
        let mut metrics = BehavioralMetrics::default();
        assert_eq!(metrics.click_rate(), 0.0);

        metrics.record_page_view("landing");
        metrics.record_page_view("landing");
        metrics.record_click();
        assert!((metrics.click_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_depth_keeps_maximum() {
        let mut metrics = BehavioralMetrics::default();
        metrics.record_scroll_depth(40.0);
        metrics.record_scroll_depth(25.0);
        metrics.record_scroll_depth(180.0);
        assert_eq!(metrics.max_scroll_depth, 100.0);
    }

    #[test]
    fn test_time_on_page_running_average() {
        let mut metrics = BehavioralMetrics::default();
        metrics.record_time_on_page(10.0);
        metrics.record_time_on_page(30.0);
        assert!((metrics.average_time_on_page - 20.0).abs() < f64::EPSILON);
        assert_eq!(metrics.time_sample_count, 2);
    }

    #[test]
    fn test_available_metric_kinds_counts_distinct_signals() {
        let mut metrics = BehavioralMetrics::default();
        assert_eq!(metrics.available_metric_kinds(), 0);

        metrics.record_visit();
        metrics.record_scroll_depth(10.0);
        assert_eq!(metrics.available_metric_kinds(), 2);

        metrics.record_page_view(PAGE_CATEGORY_FRAMEWORK);
        assert_eq!(metrics.available_metric_kinds(), 3);
    }

    #[test]
    fn test_data_points_sums_counter_families() {
        let mut metrics = BehavioralMetrics::default();
        metrics.record_visit();
        metrics.record_visit();
        metrics.record_page_view("landing");
        metrics.record_trigger_response(TriggerKind::Scarcity, 0.8);
        assert_eq!(metrics.data_points(), 4);
    }

    #[test]
    fn test_trigger_response_strength_is_clamped() {
        let mut metrics = BehavioralMetrics::default();
        metrics.record_trigger_response(TriggerKind::Urgency, 1.7);
        assert_eq!(metrics.trigger_responses[0].strength, 1.0);
    }
}
