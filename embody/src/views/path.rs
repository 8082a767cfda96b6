use std::sync::Arc;

use embody_path::{InvalidPathError, Path, PathLike, resolve};
use embody_value::Value;

use super::{MappingView, missing_key};
use crate::EmbodyError;

/// One accessor for every path notation.
///
/// [`PathView::get`] takes a segment list, a pointer string (leading `/`) or a
/// dot string, and all three address the same nodes.
///
/// ```
/// use embody::{PathView, value};
///
/// let view = PathView::new(value!({ "user": { "profile": { "name": "Alice" } } }));
/// let alice = value!("Alice");
/// assert_eq!(view.get("user.profile.name").unwrap(), &alice);
/// assert_eq!(view.get("/user/profile/name").unwrap(), &alice);
/// assert_eq!(view.get(&["user", "profile", "name"]).unwrap(), &alice);
/// ```
#[derive(Debug, Clone)]
pub struct PathView {
    root: Arc<Value>,
}

impl PathView {
    /// Wraps a result.
    pub fn new(root: impl Into<Arc<Value>>) -> Self {
        Self { root: root.into() }
    }

    /// The node at `path`.
    pub fn get<P: PathLike + ?Sized>(&self, path: &P) -> Result<&Value, InvalidPathError> {
        resolve(&self.root, path)
    }

    /// Returns `true` if `path` addresses a node.
    pub fn contains<P: PathLike + ?Sized>(&self, path: &P) -> bool {
        self.get(path).is_ok()
    }

    /// The whole result.
    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

impl MappingView for PathView {
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
