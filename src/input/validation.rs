//! Required/range validation of a value set against the registry.

use std::collections::BTreeMap;

use super::ValueSet;
use crate::features::FeatureRegistry;

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Required,
    Range { min: f64, max: f64 },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::Required => write!(f, "Required"),
            FieldError::Range { min, max } => write!(f, "Range: {} - {}", min, max),
        }
    }
}

/// Outcome of one validation pass. Absence of an id means the field is valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, id: &str) -> Option<&FieldError> {
        self.errors.get(id)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub(super) fn clear_field(&mut self, id: &str) -> bool {
        self.errors.remove(id).is_some()
    }
}

/// Check every registry field. Ids outside the registry are ignored.
pub fn validate(registry: &FeatureRegistry, values: &ValueSet) -> ValidationResult {
    let mut errors = BTreeMap::new();

    for feature in registry.iter() {
        match values.number(&feature.id) {
            None if feature.required => {
                errors.insert(feature.id.clone(), FieldError::Required);
            }
            Some(value) if !feature.contains(value) => {
                errors.insert(
                    feature.id.clone(),
                    FieldError::Range { min: feature.min, max: feature.max },
                );
            }
            _ => {}
        }
    }

    ValidationResult { errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureDescriptor;

    fn registry() -> FeatureRegistry {
        FeatureRegistry::new(vec![
            FeatureDescriptor::new("koi_period", "Orbital Period", 0.1, 2000.0).required(),
            FeatureDescriptor::new("koi_duration", "Transit Duration", 0.0, 100.0),
            FeatureDescriptor::new("st_met", "Metallicity", -2.5, 1.0).required(),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_set_flags_exactly_required_fields() {
        let result = validate(&registry(), &ValueSet::new());
        let flagged: Vec<_> = result.errors().map(|(id, _)| id).collect();
        assert_eq!(flagged, vec!["koi_period", "st_met"]);
        assert!(result.errors().all(|(_, e)| *e == FieldError::Required));
        assert!(!result.is_valid());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let registry = registry();
        for (period, met) in [(0.1, -2.5), (2000.0, 1.0)] {
            let values: ValueSet = [("koi_period", period), ("st_met", met)].into_iter().collect();
            assert!(validate(&registry, &values).is_valid());
        }
    }

    #[test]
    fn test_out_of_range_message() {
        let values: ValueSet = [("koi_period", 0.05), ("st_met", 1.5), ("koi_duration", 50.0)]
            .into_iter()
            .collect();
        let result = validate(&registry(), &values);
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.error("koi_period").unwrap().to_string(), "Range: 0.1 - 2000");
        assert_eq!(result.error("st_met").unwrap().to_string(), "Range: -2.5 - 1");
        assert!(result.error("koi_duration").is_none());
    }

    #[test]
    fn test_optional_field_still_range_checked() {
        let values: ValueSet = [("koi_period", 1.0), ("st_met", 0.0), ("koi_duration", 101.0)]
            .into_iter()
            .collect();
        let result = validate(&registry(), &values);
        assert_eq!(result.error("koi_duration"), Some(&FieldError::Range { min: 0.0, max: 100.0 }));
    }

    #[test]
    fn test_unknown_ids_and_nan() {
        let values: ValueSet = [("koi_period", f64::NAN), ("st_met", 0.0), ("koi_score", -99.0)]
            .into_iter()
            .collect();
        let result = validate(&registry(), &values);
        assert_eq!(result.error_count(), 1);
        assert!(matches!(result.error("koi_period"), Some(FieldError::Range { .. })));
    }
}
