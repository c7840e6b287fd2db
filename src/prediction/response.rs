//! Response normalization.
//!
//! The service has answered in two shapes over its lifetime: a flat object
//! carrying the label and a probability map, and a nested object with
//! `classification`/`regression`/`metadata` sections. Both are folded into
//! `Prediction` here so nothing past the boundary sees the raw shapes.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::TransportError;

pub const CONFIRMED: &str = "CONFIRMED";
pub const CANDIDATE: &str = "CANDIDATE";
pub const FALSE_POSITIVE: &str = "FALSE POSITIVE";

/// Normalized classification label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    Confirmed,
    Candidate,
    FalsePositive,
    Other(String),
}

impl Disposition {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().replace('_', " ").as_str() {
            CONFIRMED => Disposition::Confirmed,
            CANDIDATE => Disposition::Candidate,
            FALSE_POSITIVE => Disposition::FalsePositive,
            _ => Disposition::Other(label.trim().to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Disposition::Confirmed => CONFIRMED,
            Disposition::Candidate => CANDIDATE,
            Disposition::FalsePositive => FALSE_POSITIVE,
            Disposition::Other(label) => label,
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// The one canonical result shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Disposition,
    /// Confidence reported alongside the label, in [0, 1]
    pub probability: f64,
    /// Per-label probabilities keyed by label text
    pub probabilities: BTreeMap<String, f64>,
    /// Planetary radius estimate, when regression was requested and produced
    pub radius: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub model_version: Option<String>,
}

impl Prediction {
    pub fn confidence_percent(&self) -> f64 {
        self.probability * 100.0
    }

    pub fn probability_of(&self, label: &Disposition) -> f64 {
        self.probabilities.get(label.as_label()).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawClassification {
    pub label: String,
    pub probability: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRegression {
    #[serde(alias = "prediction")]
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    pub model_version: Option<String>,
    pub timestamp: Option<String>,
}

/// Either wire shape, as received.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrediction {
    Nested {
        classification: RawClassification,
        #[serde(default)]
        regression: Option<RawRegression>,
        #[serde(default)]
        metadata: Option<RawMetadata>,
    },
    Flat {
        label: String,
        probability: f64,
        #[serde(default)]
        probabilities: BTreeMap<String, f64>,
        #[serde(default)]
        radius: Option<f64>,
        #[serde(default)]
        timestamp: Option<String>,
    },
}

impl RawPrediction {
    pub fn normalize(self) -> Result<Prediction, TransportError> {
        let (label, probability, probabilities, radius, timestamp, model_version) = match self {
            RawPrediction::Nested { classification, regression, metadata } => {
                let metadata = metadata.unwrap_or_default();
                (
                    classification.label,
                    classification.probability,
                    BTreeMap::new(),
                    regression.and_then(|r| r.radius),
                    metadata.timestamp,
                    metadata.model_version,
                )
            }
            RawPrediction::Flat { label, probability, probabilities, radius, timestamp } => {
                (label, probability, probabilities, radius, timestamp, None)
            }
        };

        check_probability("probability", probability)?;
        for (name, p) in &probabilities {
            check_probability(name, *p)?;
        }

        // The binary model reports P(confirmed) only.
        let probabilities = if probabilities.is_empty() {
            BTreeMap::from([
                (CONFIRMED.to_string(), probability),
                (FALSE_POSITIVE.to_string(), 1.0 - probability),
            ])
        } else {
            probabilities
        };

        if let Some(r) = radius {
            if !r.is_finite() {
                return Err(TransportError::Malformed(format!("radius {} is not finite", r)));
            }
        }

        Ok(Prediction {
            label: Disposition::from_label(&label),
            probability,
            probabilities,
            radius,
            timestamp: parse_timestamp(timestamp.as_deref())?,
            model_version,
        })
    }
}

fn check_probability(name: &str, p: f64) -> Result<(), TransportError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(TransportError::Malformed(format!("{} {} is outside [0, 1]", name, p)))
    }
}

/// RFC 3339, or a naive ISO-8601 stamp which the service writes in UTC.
fn parse_timestamp(raw: Option<&str>) -> Result<DateTime<Utc>, TransportError> {
    let Some(raw) = raw else {
        debug!("Response carried no timestamp, using receipt time");
        return Ok(Utc::now());
    };

    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| TransportError::Malformed(format!("timestamp '{}': {}", raw, e)))
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub model_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn normalize(body: &str) -> Result<Prediction, TransportError> {
        serde_json::from_str::<RawPrediction>(body).unwrap().normalize()
    }

    #[test]
    fn test_nested_shape() {
        let prediction = normalize(
            r#"{
                "classification": {"label": "CONFIRMED", "probability": 0.75},
                "regression": null,
                "metadata": {"model_version": "classification_v1", "timestamp": "2024-05-01T12:30:00.123456"}
            }"#,
        )
        .unwrap();

        assert_eq!(prediction.label, Disposition::Confirmed);
        assert_eq!(prediction.probability_of(&Disposition::Confirmed), 0.75);
        assert_eq!(prediction.probability_of(&Disposition::FalsePositive), 0.25);
        assert_eq!(prediction.radius, None);
        assert_eq!(prediction.model_version.as_deref(), Some("classification_v1"));
        assert_eq!(
            prediction.timestamp.date_naive(),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap().date_naive()
        );
    }

    #[test]
    fn test_flat_ternary_shape_with_radius() {
        let prediction = normalize(
            r#"{
                "label": "CANDIDATE",
                "probability": 0.6,
                "probabilities": {"CONFIRMED": 0.3, "CANDIDATE": 0.6, "FALSE POSITIVE": 0.1},
                "radius": 2.4,
                "timestamp": "2024-05-01T12:30:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(prediction.label, Disposition::Candidate);
        assert_eq!(prediction.probabilities.len(), 3);
        assert_eq!(prediction.radius, Some(2.4));
        assert!((prediction.confidence_percent() - 60.0).abs() < 1e-9);
        assert_eq!(prediction.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let err = normalize(r#"{"label": "CONFIRMED", "probability": 1.2, "timestamp": "2024-05-01T12:30:00Z"}"#)
            .unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let err = normalize(r#"{"label": "CONFIRMED", "probability": 0.5, "timestamp": "yesterday"}"#)
            .unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(Disposition::from_label("false_positive"), Disposition::FalsePositive);
        assert_eq!(Disposition::from_label("False Positive"), Disposition::FalsePositive);
        assert_eq!(Disposition::from_label("AMBIGUOUS"), Disposition::Other("AMBIGUOUS".into()));
        assert_eq!(Disposition::FalsePositive.to_string(), "FALSE POSITIVE");
    }

    #[test]
    fn test_unrecognised_shape_fails_to_parse() {
        assert!(serde_json::from_str::<RawPrediction>(r#"{"result": "ok"}"#).is_err());
    }
}
