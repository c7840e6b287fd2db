//! Prediction Service Module
//!
//! The external classifier is reached only through `PredictionService`. The
//! HTTP implementation lives in `client`; response normalization in `response`.

mod client;
mod response;

pub use client::HttpPredictionClient;
pub use response::{Disposition, Prediction, RawPrediction, ServiceHealth};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::TransportError;
use crate::input::Features;

/// Work the service is asked to perform for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Classification,
    /// Planetary radius estimate
    Regression,
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classification" => Ok(Task::Classification),
            "regression" => Ok(Task::Regression),
            other => Err(format!("unknown task '{}'", other)),
        }
    }
}

/// Outbound request body. `request_id` travels as a header, not in the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    #[serde(skip)]
    pub request_id: Uuid,
    pub features: Features,
    pub tasks: Vec<Task>,
}

impl PredictionRequest {
    /// Classification is always requested, first, exactly once.
    pub fn new(features: Features, tasks: &[Task]) -> Self {
        let mut all = vec![Task::Classification];
        for task in tasks {
            if !all.contains(task) {
                all.push(*task);
            }
        }
        Self {
            request_id: Uuid::new_v4(),
            features,
            tasks: all,
        }
    }
}

/// The remote classifier.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<Prediction, TransportError>;

    async fn health(&self) -> Result<ServiceHealth, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let features = Features::from([("koi_period".to_string(), 10.0)]);
        let request = PredictionRequest::new(features, &[Task::Regression, Task::Classification]);
        assert_eq!(request.tasks, vec![Task::Classification, Task::Regression]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "features": { "koi_period": 10.0 }, "tasks": ["classification", "regression"] })
        );
    }

    #[test]
    fn test_task_parsing() {
        assert_eq!(" Regression ".parse::<Task>(), Ok(Task::Regression));
        assert!("clustering".parse::<Task>().is_err());
    }
}
