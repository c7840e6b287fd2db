//! HTTP Prediction Client
//!
//! Talks to the prediction service over JSON/HTTP using reqwest.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{Prediction, PredictionRequest, PredictionService, RawPrediction, ServiceHealth};
use crate::error::TransportError;
use crate::utils::truncate_text;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const SNIPPET_BYTES: usize = 200;

pub struct HttpPredictionClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpPredictionClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("kepler_console/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout { secs: self.timeout_secs }
        } else if err.is_decode() {
            TransportError::Malformed(err.to_string())
        } else {
            TransportError::Unreachable {
                url: self.base_url.clone(),
                reason: root_cause(&err),
            }
        }
    }

    /// Turn a non-2xx response into a `Status` error carrying the service's detail.
    async fn status_error(&self, response: Response) -> TransportError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<Value>(&body).ok().and_then(|v| detail_message(&v));
        warn!("Prediction service answered {}: {}", status, truncate_text(&body, SNIPPET_BYTES));
        TransportError::Status { status: status.as_u16(), detail }
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, TransportError> {
        info!(
            "Submitting candidate {} with {} feature(s) to {}",
            request.request_id,
            request.features.len(),
            self.base_url
        );

        let response = self
            .client
            .post(self.url("/predict"))
            .header("x-request-id", request.request_id.to_string())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.status_error(response).await);
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let raw: RawPrediction = serde_json::from_str(&body).map_err(|e| {
            TransportError::Malformed(format!("{} in {}", e, truncate_text(&body, SNIPPET_BYTES)))
        })?;

        let prediction = raw.normalize()?;
        debug!("Candidate {} classified as {}", request.request_id, prediction.label);
        Ok(prediction)
    }

    async fn health(&self) -> Result<ServiceHealth, TransportError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.status_error(response).await);
        }

        response.json::<ServiceHealth>().await.map_err(|e| self.transport_error(e))
    }
}

/// Innermost error message, which is where reqwest keeps "connection refused".
fn root_cause(err: &reqwest::Error) -> String {
    let mut source: &dyn std::error::Error = err;
    while let Some(next) = source.source() {
        source = next;
    }
    source.to_string()
}

/// Human-readable text from an error body's `detail` field.
///
/// The service sends a plain string, an object such as
/// `{"error": ..., "missing_features": [...]}`, or the framework's list of
/// request-validation failures.
pub(crate) fn detail_message(body: &Value) -> Option<String> {
    let detail = body.get("detail")?;
    match detail {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => {
            let mut parts = Vec::new();
            if let Some(error) = map.get("error").and_then(Value::as_str) {
                parts.push(error.to_string());
            }
            for key in ["missing_features", "extra_features"] {
                if let Some(names) = map.get(key).and_then(Value::as_array) {
                    let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
                    parts.push(format!("{}: {}", key.replace('_', " "), names.join(", ")));
                }
            }
            if parts.is_empty() {
                Some(detail.to_string())
            } else {
                Some(parts.join(" "))
            }
        }
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|loc| loc.last())
                        .map(|last| match last {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        });
                    Some(match field {
                        Some(field) => format!("{}: {}", field, msg),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
