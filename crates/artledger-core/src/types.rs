//! Metadata carried by records.
//!
//! Metadata is opaque to the chain (titles, descriptions, categories,
//! thumbnails) but every value takes part in the record hash, so the value
//! space is closed to what the canonical encoding can represent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`. Smaller values are always `Integer`.
    Unsigned(u64),
    /// Must be finite to be hashed.
    Float(f64),
    Text(String),
    List(Vec<MetadataValue>),
    Map(Metadata),
}

impl MetadataValue {
    /// Get the text if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check that the value (recursively) can be encoded canonically.
    ///
    /// `path` names the value in the error.
    fn check_encodable(&self, path: &str) -> Result<()> {
        match self {
            MetadataValue::Float(f) if !f.is_finite() => {
                Err(CoreError::UnsupportedMetadata(path.to_string()))
            }
            MetadataValue::List(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, item)| item.check_encodable(&format!("{path}[{i}]"))),
            MetadataValue::Map(map) => map.check_encodable_at(path),
            _ => Ok(()),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::Integer(n)
    }
}

impl From<i32> for MetadataValue {
    fn from(n: i32) -> Self {
        MetadataValue::Integer(n.into())
    }
}

impl From<u64> for MetadataValue {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(MetadataValue::Unsigned(n), MetadataValue::Integer)
    }
}

impl From<u32> for MetadataValue {
    fn from(n: u32) -> Self {
        MetadataValue::Integer(n.into())
    }
}

impl From<f64> for MetadataValue {
    fn from(f: f64) -> Self {
        MetadataValue::Float(f)
    }
}

impl From<Vec<MetadataValue>> for MetadataValue {
    fn from(items: Vec<MetadataValue>) -> Self {
        MetadataValue::List(items)
    }
}

impl From<Metadata> for MetadataValue {
    fn from(map: Metadata) -> Self {
        MetadataValue::Map(map)
    }
}

/// String-keyed metadata mapping.
///
/// Keys are kept sorted; insertion order carries no meaning since the
/// canonical encoding sorts keys anyway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetadataValue>);

impl Metadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous value for the key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Option<MetadataValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    /// Get a text value by key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_str)
    }

    /// Remove a value by key.
    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.0.iter()
    }

    /// Check that every value can be encoded canonically.
    pub fn check_encodable(&self) -> Result<()> {
        self.check_encodable_at("metadata")
    }

    fn check_encodable_at(&self, path: &str) -> Result<()> {
        self.0
            .iter()
            .try_for_each(|(key, value)| value.check_encodable(&format!("{path}.{key}")))
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
