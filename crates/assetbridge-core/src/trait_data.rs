//! Trait sets and trait property data

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A typed scalar property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
}

impl Value {
    /// The string value, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(v) => f.write_str(v),
        }
    }
}

/// Ordered, de-duplicated set of trait identifiers
pub type TraitSet = BTreeSet<String>;

/// A batch of trait sets
pub type TraitSets = Vec<TraitSet>;

/// Ordered map of string keys to values, used for `info()` and settings
pub type InfoDictionary = BTreeMap<String, Value>;

/// Property bag of a single trait
pub type TraitProperties = BTreeMap<String, Value>;

/// Trait data: a set of traits, each with its own property values.
///
/// A trait may be present with no properties set. Cloning produces a fully
/// independent copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitsData {
    traits: BTreeMap<String, TraitProperties>,
}

/// A batch of trait data
pub type TraitsDatas = Vec<TraitsData>;

impl TraitsData {
    /// Create empty trait data
    pub fn new() -> Self {
        Self::default()
    }

    /// Create trait data with the given traits present and no properties
    pub fn with_traits<I, S>(trait_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut data = Self::new();
        for id in trait_ids {
            data.add_trait(id);
        }
        data
    }

    /// The set of traits present
    pub fn trait_set(&self) -> TraitSet {
        self.traits.keys().cloned().collect()
    }

    /// Whether a trait is present
    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }

    /// Add a trait with no properties. Existing properties are kept.
    pub fn add_trait(&mut self, trait_id: impl Into<String>) {
        self.traits.entry(trait_id.into()).or_default();
    }

    /// Set a property, adding the trait if needed
    pub fn set_trait_property(
        &mut self,
        trait_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.traits
            .entry(trait_id.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Get a property value, if the trait and property are both set
    pub fn get_trait_property(&self, trait_id: &str, key: &str) -> Option<&Value> {
        self.traits.get(trait_id).and_then(|props| props.get(key))
    }

    /// Property keys set for a trait
    pub fn trait_property_keys(&self, trait_id: &str) -> Vec<String> {
        self.traits
            .get(trait_id)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether no traits are present
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_without_properties_is_present() {
        let data = TraitsData::with_traits(["a", "b"]);

        assert!(data.has_trait("a"));
        assert!(data.trait_property_keys("a").is_empty());
        assert_eq!(data.trait_set(), TraitSet::from(["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_properties() {
        let mut data = TraitsData::new();
        data.set_trait_property("locatable", "location", "file:///tmp/a.exr");
        data.set_trait_property("frames", "start", 1001_i64);

        assert_eq!(
            data.get_trait_property("locatable", "location"),
            Some(&Value::from("file:///tmp/a.exr"))
        );
        assert_eq!(data.get_trait_property("frames", "start"), Some(&Value::Int(1001)));
        assert_eq!(data.get_trait_property("frames", "end"), None);
        assert_eq!(data.get_trait_property("missing", "start"), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = TraitsData::new();
        original.set_trait_property("t", "k", 1_i64);

        let mut copy = original.clone();
        copy.set_trait_property("t", "k", 2_i64);
        copy.add_trait("other");

        assert_eq!(original.get_trait_property("t", "k"), Some(&Value::Int(1)));
        assert!(!original.has_trait("other"));
    }

    #[test]
    fn test_add_trait_keeps_properties() {
        let mut data = TraitsData::new();
        data.set_trait_property("t", "k", true);
        data.add_trait("t");

        assert_eq!(data.get_trait_property("t", "k"), Some(&Value::Bool(true)));
    }
}
