use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Payload of one window-watcher event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwEventData {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub app: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// One raw ActivityWatch event.
#[derive(Debug, Clone, Deserialize)]
pub struct AwEvent {
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Seconds of activity
    #[serde(default)]
    pub duration: Option<f64>,

    #[serde(default)]
    pub data: AwEventData,
}

/// Client for a local ActivityWatch instance.
///
/// Request failures degrade to empty results: a watcher that is not
/// running means "no activity to ingest", never a hard failure.
pub struct AwClient {
    base: String,
    http: Client,
}

impl AwClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        AwClient {
            base,
            http: Client::new(),
        }
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)], timeout: Duration) -> Option<Value> {
        let response = self
            .http
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "ActivityWatch request failed");
                return None;
            }
        };

        match response.json().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(url, error = %e, "ActivityWatch response was not JSON");
                None
            }
        }
    }

    /// List bucket ids. The API returns either a map keyed by id or a
    /// bare list; both shapes are handled.
    pub async fn list_bucket_ids(&self) -> Vec<String> {
        let url = format!("{}/api/0/buckets", self.base);
        let Some(value) = self.get_json(&url, &[], Duration::from_secs(5)).await else {
            return Vec::new();
        };

        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, bucket)| {
                    bucket
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or(key)
                })
                .collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(|b| b.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Fetch events for one bucket within an ISO time range.
    pub async fn fetch_events(&self, bucket_id: &str, start: &str, end: &str) -> Vec<AwEvent> {
        let url = format!("{}/api/0/buckets/{bucket_id}/events", self.base);
        let Some(value) = self
            .get_json(&url, &[("start", start), ("end", end)], Duration::from_secs(10))
            .await
        else {
            return Vec::new();
        };

        match serde_json::from_value(value) {
            Ok(events) => events,
            Err(e) => {
                warn!(bucket_id, error = %e, "Unexpected event payload shape");
                Vec::new()
            }
        }
    }
}
