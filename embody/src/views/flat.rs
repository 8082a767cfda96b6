use embody_path::{InvalidPathError, Path, flatten, unflatten};
use embody_value::Value;
use indexmap::IndexMap;

use super::{MappingView, missing_key};
use crate::EmbodyError;

/// Every leaf of a result under its dot-notation path, as one flat key space.
///
/// Building it walks the whole result once; lookups are then direct. Empty
/// containers count as leaves.
///
/// ```
/// use embody::{FlatView, MappingView, value};
///
/// let flat = FlatView::new(&value!({ "db": { "host": "h", "ports": [5432] } }));
/// assert_eq!(flat.keys(), ["db.host", "db.ports.0"]);
/// assert_eq!(flat.get("db.ports.0"), Some(&value!(5432)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatView {
    entries: IndexMap<String, Value>,
}

impl FlatView {
    /// Flattens `value`.
    pub fn new(value: &Value) -> Self {
        Self {
            entries: flatten(value),
        }
    }

    /// The leaf at `dotted`.
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        self.entries.get(dotted)
    }

    /// Paths and leaves in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The leaves below `prefix`, keyed relative to it.
    pub fn subtree(&self, prefix: &str) -> FlatView {
        if prefix.is_empty() {
            return self.clone();
        }
        let entries = self
            .entries
            .iter()
            .filter_map(|(k, v)| {
                let rest = k.strip_prefix(prefix)?;
                if rest.is_empty() {
                    Some((String::new(), v.clone()))
                } else {
                    Some((rest.strip_prefix('.')?.to_owned(), v.clone()))
                }
            })
            .collect();
        FlatView { entries }
    }

    /// Rebuilds the nested value.
    pub fn unflatten(&self) -> Result<Value, InvalidPathError> {
        unflatten(self.iter())
    }
}

impl MappingView for FlatView {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    fn value(&self, key: &str) -> Result<Value, EmbodyError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| missing_key(&Path::root(), key))
    }
}
