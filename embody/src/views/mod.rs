//! Read-only access layers over embodied results.
//!
//! | View          | Holds                         | Keys                        |
//! |---------------|-------------------------------|-----------------------------|
//! | [`AttrView`]  | a result and a path prefix    | entries of the mapping      |
//! | [`LazyView`]  | template, context, settings   | top-level template keys     |
//! | [`FlatView`]  | every leaf under its dot path | dot paths                   |
//! | [`PathView`]  | a result                      | top-level keys; any notation via `get` |
//! | [`FrozenView`]| a snapshot and its hash       | top-level keys              |
//!
//! Every view iterates in template order. None allows mutation.

mod attr;
mod flat;
mod frozen;
mod lazy;
mod path;

pub use attr::{Attr, AttrView};
pub use flat::FlatView;
pub use frozen::FrozenView;
pub use lazy::LazyView;
pub use path::PathView;

use embody_path::{InvalidPathError, Path};
use embody_value::{VObject, Value};

use crate::EmbodyError;

/// Uniform read access shared by every view.
pub trait MappingView {
    /// Number of keys.
    fn len(&self) -> usize;

    /// Returns `true` if there are no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in template order.
    fn keys(&self) -> Vec<&str>;

    /// The value under `key`. Lazy views embody it on every call.
    fn value(&self, key: &str) -> Result<Value, EmbodyError>;

    /// Returns `true` if `key` is one of [`MappingView::keys`].
    fn contains_key(&self, key: &str) -> bool {
        self.keys().contains(&key)
    }

    /// Every key and value collected into one object.
    fn to_object(&self) -> Result<VObject, EmbodyError> {
        self.keys()
            .into_iter()
            .map(|key| Ok((key, self.value(key)?)))
            .collect()
    }
}

pub(crate) fn missing_key(at: &Path, key: &str) -> EmbodyError {
    EmbodyError::InvalidPath(InvalidPathError::MissingKey {
        at: at.clone(),
        key: key.to_owned(),
    })
}

/// What [`Embodier::view`](crate::Embodier::view) returns.
#[derive(Debug, Clone)]
pub enum View {
    /// Subtrees are embodied when read.
    Lazy(LazyView),
    /// The whole result was embodied up front.
    Materialized(AttrView),
}

impl View {
    /// The full result.
    pub fn materialize(&self) -> Result<Value, EmbodyError> {
        match self {
            View::Lazy(view) => view.materialize(),
            View::Materialized(view) => Ok(view.to_value()),
        }
    }

    /// Returns `true` for [`View::Lazy`].
    pub fn is_lazy(&self) -> bool {
        matches!(self, View::Lazy(_))
    }
}

impl MappingView for View {
    fn len(&self) -> usize {
        match self {
            View::Lazy(view) => view.len(),
            View::Materialized(view) => view.len(),
        }
    }

    fn keys(&self) -> Vec<&str> {
        match self {
            View::Lazy(view) => view.keys(),
            View::Materialized(view) => view.keys(),
        }
    }

    fn value(&self, key: &str) -> Result<Value, EmbodyError> {
        match self {
            View::Lazy(view) => view.value(key),
            View::Materialized(view) => view.value(key),
        }
    }
}
