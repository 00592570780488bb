//! Lockable copy-on-write configuration map

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::value::{Mapping, Value};
use crate::{Error, Result};

/// An insertion-ordered map of configuration values.
///
/// Cloning shares storage; the first write to a clone copies it. A locked
/// map refuses [`insert`](Self::insert) and [`remove`](Self::remove) but can
/// still produce modified copies through [`with_overrides`](Self::with_overrides).
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
    data: Arc<Mapping>,
    locked: bool,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(mapping: Mapping) -> Self {
        Self {
            data: Arc::new(mapping),
            locked: false,
        }
    }

    /// Lock the map against further in-place modification.
    pub fn lock(mut self) -> Self {
        self.locked = true;
        self
    }

    /// A locked handle sharing storage with `self`.
    pub fn locked(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            locked: true,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// A writable view sharing storage with `self` until first write.
    pub fn unlocked(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            locked: false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = key.into();
        if self.locked {
            return Err(Error::Locked { key });
        }
        Ok(Arc::make_mut(&mut self.data).insert(key, value.into()))
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        if self.locked {
            return Err(Error::Locked {
                key: key.to_string(),
            });
        }
        if !self.data.contains_key(key) {
            return Ok(None);
        }
        Ok(Arc::make_mut(&mut self.data).shift_remove(key))
    }

    /// A copy with `overrides` applied on top. The copy keeps the lock state
    /// of `self`; `self` is never modified.
    pub fn with_overrides<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut data = Arc::clone(&self.data);
        let mut overrides = overrides.into_iter().peekable();
        if overrides.peek().is_some() {
            let target = Arc::make_mut(&mut data);
            for (key, value) in overrides {
                target.insert(key.into(), value.into());
            }
        }
        Self {
            data,
            locked: self.locked,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.data
    }

    pub fn into_mapping(self) -> Mapping {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Whether both maps still share one storage allocation.
    pub fn shares_storage_with(&self, other: &ConfigMap) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// Equality compares contents only, not lock state.
impl PartialEq for ConfigMap {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl From<Mapping> for ConfigMap {
    fn from(mapping: Mapping) -> Self {
        Self::from_mapping(mapping)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for ConfigMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}
