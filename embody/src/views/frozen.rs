use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use embody_path::{InvalidPathError, Path, PathLike, resolve};
use embody_value::Value;

use super::{MappingView, missing_key};
use crate::EmbodyError;

/// An immutable snapshot with a content hash, usable as a cache key.
///
/// Two snapshots of equal content are equal and hash alike, whichever
/// embodiment produced them. Mapping order does not affect the hash.
#[derive(Debug, Clone)]
pub struct FrozenView {
    root: Arc<Value>,
    hash: u64,
}

impl FrozenView {
    /// Snapshots `value`.
    pub fn new(value: impl Into<Arc<Value>>) -> Self {
        let root = value.into();
        let mut hasher = DefaultHasher::new();
        root.hash(&mut hasher);
        Self {
            hash: hasher.finish(),
            root,
        }
    }

    /// Hash of the content, stable for the life of the process.
    pub fn content_hash(&self) -> u64 {
        self.hash
    }

    /// The node at `path`, in any notation.
    pub fn get<P: PathLike + ?Sized>(&self, path: &P) -> Result<&Value, InvalidPathError> {
        resolve(&self.root, path)
    }

    /// The snapshot.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// A mutable copy of the snapshot.
    pub fn thaw(&self) -> Value {
        Value::clone(&self.root)
    }
}

impl PartialEq for FrozenView {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.root == other.root
    }
}

impl Eq for FrozenView {}

impl Hash for FrozenView {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl MappingView for FrozenView {
    fn len(&self) -> usize {
        self.root.as_object().map_or(0, |obj| obj.len())
    }

    fn keys(&self) -> Vec<&str> {
        self.root
            .as_object()
            .map(|obj| obj.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn value(&self, key: &str) -> Result<Value, EmbodyError> {
        self.root
            .get(key)
            .cloned()
            .ok_or_else(|| missing_key(&Path::root(), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embody_value::value;
    use std::collections::HashMap;

    #[test]
    fn equal_content_hashes_alike() {
        let a = FrozenView::new(value!({ "x": 1, "y": [true] }));
        let b = FrozenView::new(value!({ "y": [true], "x": 1 }));
        let c = FrozenView::new(value!({ "x": 2, "y": [true] }));
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut cache = HashMap::new();
        cache.insert(a.clone(), "first");
        assert_eq!(cache.get(&b), Some(&"first"));
        assert_eq!(cache.get(&c), None);
    }

    #[test]
    fn thawing_copies() {
        let frozen = FrozenView::new(value!({ "x": 1 }));
        let mut copy = frozen.thaw();
        if let Some(obj) = copy.as_object_mut() {
            obj.insert("x", 2);
        }
        assert_eq!(frozen.get("x").unwrap(), &Value::from(1));
        assert_eq!(frozen.keys(), ["x"]);
    }
}
