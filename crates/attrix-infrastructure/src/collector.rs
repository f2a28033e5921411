//! HTTP collector client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use attrix_core::collector::EventSink;
use attrix_core::error::{AttrixError, Result};
use attrix_core::event::TrackedEvent;

/// The JSON body the collector expects.
#[derive(Debug, Serialize)]
struct CollectorPayload<'a> {
    tracking_id: &'a str,
    event_type: &'a str,
    event_data: &'a HashMap<String, Value>,
    queued_at: DateTime<Utc>,
}

/// Delivers events to the remote collector over HTTP.
///
/// Any 2xx response means "delivered". No timeout is configured unless
/// the tracker config asks for one, so a hung request simply never
/// resolves and the event stays queued for the next process's sync pass.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpCollector {
    client: Client,
    endpoint: String,
}

impl HttpCollector {
    /// Creates a collector client for the given endpoint.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("attrix/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AttrixError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventSink for HttpCollector {
    async fn deliver(&self, event: &TrackedEvent) -> Result<()> {
        let payload = CollectorPayload {
            tracking_id: &event.tracking_id,
            event_type: &event.event_type,
            event_data: &event.event_data,
            queued_at: event.queued_at,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|err| AttrixError::network(format!("collector request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttrixError::network_status(
                format!("collector returned {status}"),
                status.as_u16(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_shape() {
        let mut data = HashMap::new();
        data.insert("effect".to_string(), serde_json::json!("shown"));
        let event = TrackedEvent::new("visitor-1", "trigger_impression", data);

        let payload = CollectorPayload {
            tracking_id: &event.tracking_id,
            event_type: &event.event_type,
            event_data: &event.event_data,
            queued_at: event.queued_at,
        };
        let body = serde_json::to_value(&payload).unwrap();

        assert_eq!(body["tracking_id"], "visitor-1");
        assert_eq!(body["event_type"], "trigger_impression");
        assert_eq!(body["event_data"]["effect"], "shown");
        assert!(body["queued_at"].is_string());
    }
}
