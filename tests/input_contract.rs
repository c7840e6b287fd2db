use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_test::{assert_err, assert_ok};

use kepler_console::error::{DocumentError, InputError, SubmitError, TransportError};
use kepler_console::input::{FieldError, InputMode, Readiness};
use kepler_console::prediction::{Disposition, PredictionRequest, ServiceHealth};
use kepler_console::{Dashboard, FeatureRegistry, InputController, Prediction, PredictionService};

const KOI_CANDIDATE: &str = r#"{
    "koi_period": 9.488036,
    "koi_duration": 2.9575,
    "koi_depth": 615.8,
    "koi_impact": 0.146,
    "koi_model_snr": 35.8,
    "koi_num_transits": 142,
    "st_teff": 5455,
    "st_logg": 4.467,
    "st_met": 0.14,
    "st_mass": 0.919,
    "st_radius": 0.927
}"#;

fn controller() -> InputController {
    InputController::new(FeatureRegistry::kepler())
}

#[test]
fn test_complete_candidate_builds_submission() {
    let mut controller = controller();
    assert_ok!(controller.load_from_document(KOI_CANDIDATE));

    let features = assert_ok!(controller.begin_submission());
    assert_eq!(features.len(), 11);
    assert_eq!(features["koi_num_transits"], 142.0);
    assert!(controller.is_submitting());
}

#[test]
fn test_missing_required_blocks_submission() {
    let mut controller = controller();
    assert_ok!(controller.set_field_value("koi_period", 9.5));

    let err = assert_err!(controller.begin_submission());
    let SubmitError::Invalid(result) = err else {
        panic!("expected Invalid, got {:?}", err);
    };
    assert_eq!(result.error_count(), 10);
    assert_eq!(result.error("st_teff"), Some(&FieldError::Required));
    assert_eq!(result.error("koi_period"), None);
    assert!(!controller.is_submitting());
}

#[test]
fn test_out_of_range_reports_bounds() {
    let mut controller = controller();
    assert_ok!(controller.load_from_document(KOI_CANDIDATE));
    assert_ok!(controller.set_field_value("st_teff", 50000.0));

    let result = controller.validate();
    assert_eq!(
        result.error("st_teff"),
        Some(&FieldError::Range { min: 2000.0, max: 12000.0 })
    );
    assert_eq!(result.error_count(), 1);
}

#[test]
fn test_bad_document_leaves_values_untouched() {
    let mut controller = controller();
    assert_ok!(controller.set_field_value("koi_period", 9.5));

    let err = assert_err!(controller.load_from_document(r#"{"koi_period": "ten", "st_teff": true}"#));
    assert_eq!(
        err,
        InputError::Document(DocumentError::Type { keys: vec!["koi_period".into(), "st_teff".into()] })
    );
    assert_eq!(controller.values().number("koi_period"), Some(9.5));
    assert_eq!(controller.readiness(), Readiness::Dirty);

    let err = assert_err!(controller.load_from_document("[1, 2]"));
    assert_eq!(err, InputError::Document(DocumentError::Schema { found: "an array" }));
}

#[test]
fn test_dirty_document_gates_submission() {
    let mut controller = controller();
    assert_ok!(controller.load_from_document(KOI_CANDIDATE));
    controller.edit_document(r#"{"koi_period": 12"#);
    assert!(controller.document_diagnostic().is_some());

    assert_eq!(controller.begin_submission(), Err(SubmitError::DocumentDirty));

    assert!(controller.switch_to_form());
    assert_eq!(controller.mode(), InputMode::Form);
    assert_ok!(controller.begin_submission());
}

#[test]
fn test_export_then_reload_preserves_values() {
    let mut controller = controller();
    assert_ok!(controller.load_from_document(KOI_CANDIDATE));
    assert_ok!(controller.set_field_value("koi_prad", 2.26));
    let exported = controller.export_to_document();

    let mut other = InputController::new(FeatureRegistry::kepler());
    assert_ok!(other.load_from_document(&exported));
    assert_eq!(other.values(), controller.values());
    assert!(exported.contains("\"koi_num_transits\": 142"));
}

#[test]
fn test_unknown_keys_never_reach_the_service() {
    let mut controller = controller();
    let mut doc: serde_json::Value = serde_json::from_str(KOI_CANDIDATE).unwrap();
    doc["kepid"] = serde_json::json!(10797460);
    assert_ok!(controller.load_from_document(&doc.to_string()));

    let features = assert_ok!(controller.begin_submission());
    assert!(!features.contains_key("kepid"));
}

/// Holds every request until released, so a second submit can race the first.
struct GatedService {
    release: Notify,
}

#[async_trait]
impl PredictionService for GatedService {
    async fn predict(&self, _request: &PredictionRequest) -> Result<Prediction, TransportError> {
        self.release.notified().await;
        Ok(Prediction {
            label: Disposition::Confirmed,
            probability: 0.9,
            probabilities: BTreeMap::new(),
            radius: None,
            timestamp: Utc::now(),
            model_version: None,
        })
    }

    async fn health(&self) -> Result<ServiceHealth, TransportError> {
        Ok(ServiceHealth { model_loaded: true })
    }
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_busy() {
    let service = Arc::new(GatedService { release: Notify::new() });
    let dashboard = Arc::new(Dashboard::new(FeatureRegistry::kepler(), service.clone()));
    assert_ok!(dashboard.controller().lock().await.load_from_document(KOI_CANDIDATE));

    let first = {
        let dashboard = dashboard.clone();
        tokio::spawn(async move { dashboard.submit().await })
    };
    while !dashboard.is_submitting().await {
        tokio::task::yield_now().await;
    }

    assert_eq!(dashboard.submit().await, Err(SubmitError::Busy));

    service.release.notify_one();
    let prediction = assert_ok!(first.await.unwrap());
    assert_eq!(prediction.label, Disposition::Confirmed);
    assert!(!dashboard.is_submitting().await);
}
