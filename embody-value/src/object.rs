//! Object (map) value type.

use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::ops::Index;
use std::collections::hash_map::DefaultHasher;

use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter, IterMut, Keys, Values};

use crate::Value;

/// An insertion-ordered map from string keys to [`Value`]s.
///
/// Replacing the value of an existing key keeps that key at its original
/// position. Equality does not depend on key order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct VObject {
    inner: IndexMap<String, Value>,
}

impl VObject {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty object with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Returns the value for `key` mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.inner.get_mut(key)
    }

    /// Returns the entry at position `index`.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.inner.get_index(index).map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Inserts a key-value pair, returning the previous value for that key.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.insert(key.into(), value.into())
    }

    /// Returns the value for `key`, inserting `Value::Null` first if it is absent.
    pub fn entry_or_null(&mut self, key: impl Into<String>) -> &mut Value {
        self.inner.entry(key.into()).or_default()
    }

    /// Removes `key`, shifting later entries down to keep the order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.shift_remove(key)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.inner.iter()
    }

    /// Iterates mutably over entries in insertion order.
    pub fn iter_mut(&mut self) -> IterMut<'_, String, Value> {
        self.inner.iter_mut()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.inner.keys()
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> Values<'_, String, Value> {
        self.inner.values()
    }

    /// Empties the object, yielding its values.
    pub(crate) fn drain_values(&mut self) -> impl Iterator<Item = Value> + '_ {
        self.inner.drain(..).map(|(_, v)| v)
    }
}

impl Hash for VObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Per-entry hashes are summed so the result agrees with order-insensitive equality.
        let combined = self.inner.iter().fold(0u64, |acc, entry| {
            let mut h = DefaultHasher::new();
            entry.hash(&mut h);
            acc.wrapping_add(h.finish())
        });
        state.write_usize(self.inner.len());
        state.write_u64(combined);
    }
}

impl Debug for VObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

impl Index<&str> for VObject {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.inner.get(key) {
            Some(v) => v,
            None => panic!("key {key:?} not present in object"),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for VObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for VObject {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.inner
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for VObject {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a VObject {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
