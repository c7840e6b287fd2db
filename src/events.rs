//! Dashboard Event Bus
//!
//! Broadcasts submission lifecycle events to whatever presentation layer is
//! listening. Publishing never blocks and never fails when nobody listens.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DashboardEvent {
    /// A request left for the prediction service
    SubmissionStarted { request_id: Uuid, fields: usize },
    /// A normalized prediction came back
    PredictionReceived { request_id: Uuid, label: String, probability: f64 },
    /// The request failed; `message` is what the error banner shows
    SubmissionFailed { request_id: Uuid, message: String },
    /// The error banner was closed
    ErrorDismissed,
}

pub struct EventBus {
    tx: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn publish(&self, event: DashboardEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
