//! Dashboard Session
//!
//! Binds one input controller to one prediction service. The controller is
//! shared with the editing views behind a mutex that is released while a
//! request is in flight, so a second submit sees `is_submitting` and is
//! turned away instead of queuing.

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::error::{SubmitError, TransportError};
use crate::events::{DashboardEvent, EventBus};
use crate::features::FeatureRegistry;
use crate::input::InputController;
use crate::prediction::{Prediction, PredictionRequest, PredictionService, ServiceHealth, Task};

/// What the results side of the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPanel {
    /// Last successful prediction; kept across failed retries
    pub result: Option<Prediction>,
    /// The single dismissible error banner
    pub error: Option<String>,
}

pub struct Dashboard {
    controller: Arc<Mutex<InputController>>,
    service: Arc<dyn PredictionService>,
    tasks: Vec<Task>,
    panel: Mutex<ResultPanel>,
    events: EventBus,
}

impl Dashboard {
    pub fn new(registry: Arc<FeatureRegistry>, service: Arc<dyn PredictionService>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(InputController::new(registry))),
            service,
            tasks: vec![Task::Classification],
            panel: Mutex::new(ResultPanel::default()),
            events: EventBus::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Shared handle for the form and document views.
    pub fn controller(&self) -> Arc<Mutex<InputController>> {
        self.controller.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub async fn is_submitting(&self) -> bool {
        self.controller.lock().await.is_submitting()
    }

    pub async fn panel(&self) -> ResultPanel {
        self.panel.lock().await.clone()
    }

    pub async fn dismiss_error(&self) {
        let mut panel = self.panel.lock().await;
        if panel.error.take().is_some() {
            self.events.publish(DashboardEvent::ErrorDismissed);
        }
    }

    /// Validate, send and record one prediction request.
    ///
    /// Refusals (`Busy`, `DocumentDirty`, `Invalid`) leave the panel alone;
    /// validation errors are shown inline by the form instead. Transport
    /// failures become the banner and leave the value set untouched.
    pub async fn submit(&self) -> Result<Prediction, SubmitError> {
        let features = self.controller.lock().await.begin_submission()?;
        let in_flight = InFlight::new(self.controller.clone());

        let request = PredictionRequest::new(features, &self.tasks);
        let request_id = request.request_id;
        self.panel.lock().await.error = None;
        self.events.publish(DashboardEvent::SubmissionStarted {
            request_id,
            fields: request.features.len(),
        });

        let outcome = self.service.predict(&request).await;
        in_flight.finish().await;

        let mut panel = self.panel.lock().await;
        match outcome {
            Ok(prediction) => {
                info!(
                    "Candidate {} classified {} ({:.1}%)",
                    request_id,
                    prediction.label,
                    prediction.confidence_percent()
                );
                self.events.publish(DashboardEvent::PredictionReceived {
                    request_id,
                    label: prediction.label.to_string(),
                    probability: prediction.probability,
                });
                panel.result = Some(prediction.clone());
                Ok(prediction)
            }
            Err(e) => {
                warn!("Prediction request {} failed: {}", request_id, e);
                let message = e.to_string();
                self.events.publish(DashboardEvent::SubmissionFailed {
                    request_id,
                    message: message.clone(),
                });
                panel.error = Some(message);
                Err(SubmitError::Transport(e))
            }
        }
    }

    pub async fn health(&self) -> Result<ServiceHealth, TransportError> {
        self.service.health().await
    }
}

/// Clears `is_submitting` however the submit future ends, including when it
/// is dropped mid-request or the service panics.
struct InFlight {
    controller: Arc<Mutex<InputController>>,
    armed: bool,
}

impl InFlight {
    fn new(controller: Arc<Mutex<InputController>>) -> Self {
        Self { controller, armed: true }
    }

    async fn finish(mut self) {
        self.controller.lock().await.finish_submission();
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("Submission abandoned before the service answered");
        if let Ok(mut controller) = self.controller.try_lock() {
            controller.finish_submission();
        } else if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let controller = self.controller.clone();
            handle.spawn(async move {
                controller.lock().await.finish_submission();
            });
        }
    }
}
