//! The final, validated configuration

use std::ops::Index;

use serde::{Serialize, Serializer};

use crate::keys::META_KEY;
use crate::map::ConfigMap;
use crate::meta::Meta;
use crate::value::{Mapping, Value};
use crate::Result;

/// A validated configuration. Values are locked; derive modified copies
/// with [`copy_with_unchecked`](Self::copy_with_unchecked).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    values: ConfigMap,
    meta: Meta,
    interactive: bool,
}

impl Config {
    pub fn new(values: ConfigMap, meta: Meta) -> Self {
        Self {
            values: values.lock(),
            meta,
            interactive: false,
        }
    }

    pub(crate) fn into_interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &ConfigMap {
        &self.values
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// A copy with `overrides` applied and no validation performed.
    pub fn copy_with_unchecked<I, K, V>(&self, overrides: I) -> Config
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            values: self.values.with_overrides(overrides),
            meta: self.meta.clone(),
            interactive: self.interactive,
        }
    }

    /// The values plus the `meta` record, in a form the loader accepts again.
    pub fn to_raw_map(&self) -> Mapping {
        let mut raw = self.values.as_mapping().clone();
        raw.insert(META_KEY.to_string(), self.meta.to_value());
        raw
    }

    /// Exact JSON, numbers keeping their written precision.
    pub fn to_json(&self) -> serde_json::Value {
        Value::Map(self.to_raw_map()).to_json()
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }

    /// A markdown section holding the values as a YAML block.
    pub fn to_markdown(&self) -> Result<String> {
        let (title, values_title) = if self.interactive {
            ("Interactive Configuration", "Initial Values")
        } else {
            ("Configuration", "Values")
        };
        let yaml = serde_yaml::to_string(&self.values)?;
        Ok(format!(
            "# {title}\n\n## {values_title}\n\n```yaml\n{}\n```\n",
            yaml.trim_end()
        ))
    }
}

/// # Panics
///
/// Panics if `key` is not set, like indexing a map.
impl Index<&str> for Config {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        &self.values.as_mapping()[key]
    }
}

impl<'a> IntoIterator for &'a Config {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_raw_map().serialize(serializer)
    }
}
