//! Placeholder value mappings.

use std::collections::BTreeMap;

use crate::derive;
use crate::error::Result;
use crate::spec::{CircuitSpec, SpecField};

/// Placeholder name → substitution text, built fresh for every fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMap {
    values: BTreeMap<String, String>,
}

impl ValueMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a placeholder.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Merge `other` over `self`; `other` wins on collision.
    pub fn merge(&mut self, other: ValueMap) {
        self.values.extend(other.values);
    }

    /// Number of placeholders.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Build the mapping for a spec: every present field copied verbatim, then
/// the topology's derived values merged over it.
pub fn build_values(spec: &CircuitSpec) -> Result<ValueMap> {
    let mut values: ValueMap = spec
        .present()
        .map(|(field, value): (SpecField, &str)| (field.name(), value))
        .collect();
    values.merge(derive::derive_values(spec)?);
    Ok(values)
}
