//! The canonical set of feature values being edited.

use std::collections::BTreeMap;

/// A single field's value. `Unset` is an explicit absence and is distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FieldValue {
    Number(f64),
    #[default]
    Unset,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Unset => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, FieldValue::Number(_))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Unset, FieldValue::Number)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::Unset => write!(f, "-"),
        }
    }
}

/// Mapping from feature id to value. Ids missing from the map read as `Unset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSet {
    values: BTreeMap<String, FieldValue>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> FieldValue {
        self.values.get(id).copied().unwrap_or_default()
    }

    pub fn number(&self, id: &str) -> Option<f64> {
        self.get(id).as_number()
    }

    /// Every entry, including explicitly unset ones, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Only the entries holding a number.
    pub fn numbers(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .filter_map(|(k, v)| v.as_number().map(|n| (k.as_str(), n)))
    }

    pub fn set_count(&self) -> usize {
        self.numbers().count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ValueSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for (k, v) in iter {
            set.set(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_is_distinct_from_zero() {
        let mut values = ValueSet::new();
        values.set("koi_impact", 0.0);
        values.set("koi_depth", FieldValue::Unset);

        assert_eq!(values.get("koi_impact"), FieldValue::Number(0.0));
        assert_eq!(values.get("koi_depth"), FieldValue::Unset);
        assert_eq!(values.get("never_touched"), FieldValue::Unset);
        assert_eq!(values.len(), 2);
        assert_eq!(values.set_count(), 1);
    }

    #[test]
    fn test_numbers_skips_unset() {
        let mut values: ValueSet = [("koi_period", 10.0), ("st_teff", 5700.0)].into_iter().collect();
        values.set("koi_period", FieldValue::Unset);
        let numbers: Vec<_> = values.numbers().collect();
        assert_eq!(numbers, vec![("st_teff", 5700.0)]);
    }
}
