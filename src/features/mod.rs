//! Feature Registry
//!
//! The closed catalog of numeric observation parameters the prediction
//! service understands. Built once, never mutated.

mod catalog;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Whether a field is shown by default or tucked away as an advanced input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Core,
    Advanced,
}

/// Subject-area grouping used to lay out the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Planet,
    Stellar,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Planet => write!(f, "Planet Features"),
            Section::Stellar => write!(f, "Stellar Features"),
        }
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    pub id: String,
    pub label: String,
    pub description: String,
    pub unit: Option<String>,
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
    pub required: bool,
    pub category: Category,
    pub section: Section,
}

impl FeatureDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            unit: None,
            min,
            max,
            required: false,
            category: Category::Core,
            section: Section::Planet,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn advanced(mut self) -> Self {
        self.category = Category::Advanced;
        self
    }

    pub fn stellar(mut self) -> Self {
        self.section = Section::Stellar;
        self
    }

    /// Inclusive bounds check. Non-finite values are never in range.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Placeholder hint shown next to an empty input, e.g. `0.1 - 2000`.
    pub fn range_hint(&self) -> String {
        format!("{} - {}", self.min, self.max)
    }
}

/// Ordered, immutable catalog of feature descriptors.
#[derive(Debug)]
pub struct FeatureRegistry {
    features: Vec<FeatureDescriptor>,
    index: HashMap<String, usize>,
}

lazy_static::lazy_static! {
    /// The catalog matching the field names of the Kepler prediction service
    static ref KEPLER_REGISTRY: Arc<FeatureRegistry> = Arc::new(
        FeatureRegistry::new(catalog::kepler_features())
            .expect("built-in feature catalog is well formed")
    );
}

impl FeatureRegistry {
    /// Build a registry, rejecting duplicate ids and inverted bounds.
    pub fn new(features: Vec<FeatureDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(features.len());
        for (pos, feature) in features.iter().enumerate() {
            if feature.min > feature.max {
                bail!("Feature '{}' has min {} greater than max {}", feature.id, feature.min, feature.max);
            }
            if index.insert(feature.id.clone(), pos).is_some() {
                bail!("Duplicate feature id '{}'", feature.id);
            }
        }
        Ok(Self { features, index })
    }

    /// Shared handle to the built-in Kepler catalog.
    pub fn kepler() -> Arc<FeatureRegistry> {
        KEPLER_REGISTRY.clone()
    }

    pub fn get(&self, id: &str) -> Option<&FeatureDescriptor> {
        self.index.get(id).map(|&pos| &self.features[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.id.as_str())
    }

    pub fn required(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.features.iter().filter(|f| f.required)
    }

    /// Fields shown by default vs. advanced ones, each in catalog order.
    pub fn by_category(&self) -> (Vec<&FeatureDescriptor>, Vec<&FeatureDescriptor>) {
        self.features.iter().partition(|f| f.category == Category::Core)
    }

    pub fn in_section(&self, section: Section) -> Vec<&FeatureDescriptor> {
        self.features.iter().filter(|f| f.section == section).collect()
    }

    /// Planet fields and stellar fields, each in catalog order.
    pub fn by_section(&self) -> (Vec<&FeatureDescriptor>, Vec<&FeatureDescriptor>) {
        self.features.iter().partition(|f| f.section == Section::Planet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kepler_catalog_shape() {
        let registry = FeatureRegistry::kepler();
        assert_eq!(registry.len(), 24);
        assert_eq!(registry.ids().next(), Some("koi_period"));
        assert!(registry.contains("st_radius"));
        assert!(!registry.contains("koi_score"));
        assert!(registry.iter().all(|f| f.min <= f.max));
    }

    #[test]
    fn test_partitions_cover_every_field_once() {
        let registry = FeatureRegistry::kepler();
        let (core, advanced) = registry.by_category();
        assert_eq!(core.len() + advanced.len(), registry.len());
        assert!(core.iter().all(|f| f.category == Category::Core));

        let (planet, stellar) = registry.by_section();
        assert_eq!(planet.len() + stellar.len(), registry.len());
        assert_eq!(planet, registry.in_section(Section::Planet));
        assert!(stellar.iter().any(|f| f.id == "st_teff"));
    }

    #[test]
    fn test_required_fields_are_core() {
        let registry = FeatureRegistry::kepler();
        assert_eq!(registry.required().count(), 11);
        assert!(registry.required().all(|f| f.category == Category::Core));
    }

    #[test]
    fn test_rejects_duplicates_and_inverted_bounds() {
        let dup = FeatureRegistry::new(vec![
            FeatureDescriptor::new("a", "A", 0.0, 1.0),
            FeatureDescriptor::new("a", "A again", 0.0, 1.0),
        ]);
        assert!(dup.is_err());

        let inverted = FeatureRegistry::new(vec![FeatureDescriptor::new("b", "B", 2.0, 1.0)]);
        assert!(inverted.is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let f = FeatureDescriptor::new("x", "X", -1.5, 3.0);
        assert!(f.contains(-1.5));
        assert!(f.contains(3.0));
        assert!(!f.contains(3.0001));
        assert!(!f.contains(f64::NAN));
        assert_eq!(f.range_hint(), "-1.5 - 3");
    }
}
