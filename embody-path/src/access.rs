//! Path-based access into values, and the error returned when a path does not fit.

use embody_value::{VObject, Value, ValueType};

use crate::{Path, PathLike, PathSegment};

/// Error returned when navigating or writing a value using a [`Path`].
///
/// Each variant names the first segment that could not be descended into, and the
/// path of the node it was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidPathError {
    /// A mapping has no entry for the key.
    MissingKey {
        /// Path of the mapping.
        at: Path,
        /// The key that was not found.
        key: String,
    },

    /// A sequence index is past the end.
    IndexOutOfBounds {
        /// Path of the sequence.
        at: Path,
        /// The index that was requested.
        index: usize,
        /// The number of elements.
        len: usize,
    },

    /// The segment kind doesn't apply to the node: a non-numeric key on a sequence,
    /// an index on a mapping, or any segment on a scalar.
    WrongSegmentKind {
        /// Path of the node.
        at: Path,
        /// The segment that didn't apply.
        segment: PathSegment,
        /// What was found there instead.
        found: ValueType,
    },

    /// The path text could not be parsed, or flat keys contradict each other.
    Malformed {
        /// The offending input.
        input: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl InvalidPathError {
    /// The first segment that could not be descended into, if the path parsed.
    pub fn segment(&self) -> Option<PathSegment> {
        match self {
            InvalidPathError::MissingKey { key, .. } => Some(PathSegment::Key(key.clone())),
            InvalidPathError::IndexOutOfBounds { index, .. } => Some(PathSegment::Index(*index)),
            InvalidPathError::WrongSegmentKind { segment, .. } => Some(segment.clone()),
            InvalidPathError::Malformed { .. } => None,
        }
    }

    /// Path of the node where navigation stopped.
    pub fn at(&self) -> Option<&Path> {
        match self {
            InvalidPathError::MissingKey { at, .. }
            | InvalidPathError::IndexOutOfBounds { at, .. }
            | InvalidPathError::WrongSegmentKind { at, .. } => Some(at),
            InvalidPathError::Malformed { .. } => None,
        }
    }
}

impl core::fmt::Display for InvalidPathError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InvalidPathError::MissingKey { at, key } => {
                write!(f, "no key {key:?} in mapping at {at}")
            }
            InvalidPathError::IndexOutOfBounds { at, index, len } => {
                write!(
                    f,
                    "index {index} out of bounds for sequence at {at} (has {len})"
                )
            }
            InvalidPathError::WrongSegmentKind { at, segment, found } => {
                let segment = match segment {
                    PathSegment::Key(k) => format!("key {k:?}"),
                    PathSegment::Index(i) => format!("index {i}"),
                };
                write!(f, "cannot apply {segment} to {found} at {at}")
            }
            InvalidPathError::Malformed { input, reason } => {
                write!(f, "malformed path {input:?}: {reason}")
            }
        }
    }
}

impl core::error::Error for InvalidPathError {}

fn prefix(path: &Path, step_index: usize) -> Path {
    Path::from(path.segments()[..step_index].to_vec())
}

fn wrong_kind(
    path: &Path,
    step_index: usize,
    segment: &PathSegment,
    found: ValueType,
) -> InvalidPathError {
    InvalidPathError::WrongSegmentKind {
        at: prefix(path, step_index),
        segment: segment.clone(),
        found,
    }
}

fn step<'v>(
    node: &'v Value,
    segment: &PathSegment,
    path: &Path,
    step_index: usize,
) -> Result<&'v Value, InvalidPathError> {
    match (node, segment) {
        (Value::Object(obj), PathSegment::Key(key)) => {
            obj.get(key).ok_or_else(|| InvalidPathError::MissingKey {
                at: prefix(path, step_index),
                key: key.clone(),
            })
        }
        (Value::Array(items), _) => {
            let index = segment
                .as_index()
                .ok_or_else(|| wrong_kind(path, step_index, segment, ValueType::Array))?;
            items.get(index).ok_or(InvalidPathError::IndexOutOfBounds {
                at: prefix(path, step_index),
                index,
                len: items.len(),
            })
        }
        _ => Err(wrong_kind(path, step_index, segment, node.value_type())),
    }
}

/// Returns the value addressed by `path` inside `root`.
///
/// ```
/// use embody_value::value;
///
/// let data = value!({ "user": { "profile": { "name": "Alice" } } });
/// let by_dot = embody_path::resolve(&data, "user.profile.name").unwrap();
/// let by_pointer = embody_path::resolve(&data, "/user/profile/name").unwrap();
/// let by_segments = embody_path::resolve(&data, &["user", "profile", "name"]).unwrap();
/// assert_eq!(by_dot, by_pointer);
/// assert_eq!(by_dot, by_segments);
/// ```
pub fn resolve<'v, P: PathLike + ?Sized>(
    root: &'v Value,
    path: &P,
) -> Result<&'v Value, InvalidPathError> {
    let path = path.to_path()?;
    resolve_canonical(root, &path)
}

/// [`resolve`] for an already canonical path.
pub fn resolve_canonical<'v>(root: &'v Value, path: &Path) -> Result<&'v Value, InvalidPathError> {
    path.iter()
        .enumerate()
        .try_fold(root, |node, (i, segment)| step(node, segment, path, i))
}

/// Returns the value addressed by `path` inside `root`, mutably.
pub fn resolve_mut<'v, P: PathLike + ?Sized>(
    root: &'v mut Value,
    path: &P,
) -> Result<&'v mut Value, InvalidPathError> {
    let path = path.to_path()?;
    let mut node = root;
    for (i, segment) in path.iter().enumerate() {
        node = step_mut(node, segment, &path, i)?;
    }
    Ok(node)
}

fn step_mut<'v>(
    node: &'v mut Value,
    segment: &PathSegment,
    path: &Path,
    step_index: usize,
) -> Result<&'v mut Value, InvalidPathError> {
    let found = node.value_type();
    match (node, segment) {
        (Value::Object(obj), PathSegment::Key(key)) => {
            obj.get_mut(key).ok_or_else(|| InvalidPathError::MissingKey {
                at: prefix(path, step_index),
                key: key.clone(),
            })
        }
        (Value::Array(items), _) => {
            let index = segment
                .as_index()
                .ok_or_else(|| wrong_kind(path, step_index, segment, found))?;
            let len = items.len();
            items.get_mut(index).ok_or(InvalidPathError::IndexOutOfBounds {
                at: prefix(path, step_index),
                index,
                len,
            })
        }
        _ => Err(wrong_kind(path, step_index, segment, found)),
    }
}

/// Writes `value` at `path` inside `root`.
///
/// Missing mapping entries along the way are created as empty mappings (a `Null`
/// node counts as missing). A sequence is never created for a missing node, and
/// writing at or past the end of an existing sequence is an error rather than an
/// extension. On error `root` is left untouched.
pub fn set<P: PathLike + ?Sized>(
    root: &mut Value,
    path: &P,
    value: impl Into<Value>,
) -> Result<(), InvalidPathError> {
    let path = path.to_path()?;
    let value = value.into();
    check_settable(root, &path)?;

    let Some((last, parents)) = path.segments().split_last() else {
        *root = value;
        return Ok(());
    };

    let mut node = root;
    for segment in parents {
        node = descend_creating(node, segment);
    }
    match (node, last) {
        (Value::Array(items), seg) => {
            if let Some(slot) = seg.as_index().and_then(|i| items.get_mut(i)) {
                *slot = value;
            }
        }
        (node, PathSegment::Key(key)) => {
            if node.is_null() {
                *node = Value::Object(VObject::new());
            }
            if let Value::Object(obj) = node {
                obj.insert(key.clone(), value);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validates a `set` without touching the tree, so the write itself cannot fail halfway.
fn check_settable(root: &Value, path: &Path) -> Result<(), InvalidPathError> {
    let mut node = root;
    for (i, segment) in path.iter().enumerate() {
        let next = match (node, segment) {
            (Value::Null, _) => None,
            (Value::Object(obj), PathSegment::Key(key)) => obj.get(key),
            _ => Some(step(node, segment, path, i)?),
        };
        match next {
            Some(child) => node = child,
            None => {
                // Everything from here down is created, and only mappings are created.
                let rest = &path.segments()[i..];
                return match rest.iter().position(|s| matches!(s, PathSegment::Index(_))) {
                    Some(offset) => {
                        Err(wrong_kind(path, i + offset, &rest[offset], ValueType::Null))
                    }
                    None => Ok(()),
                };
            }
        }
    }
    Ok(())
}

fn descend_creating<'v>(node: &'v mut Value, segment: &PathSegment) -> &'v mut Value {
    if node.is_null() {
        *node = Value::Object(VObject::new());
    }
    let index_in_bounds = matches!(
        &*node,
        Value::Array(items) if segment.as_index().is_some_and(|i| i < items.len())
    );
    match (node, index_in_bounds) {
        (Value::Object(obj), _) => {
            let key = segment.as_key().map(str::to_owned).unwrap_or_default();
            let child = obj.entry_or_null(key);
            if child.is_null() {
                *child = Value::Object(VObject::new());
            }
            child
        }
        (Value::Array(items), true) => {
            let index = segment.as_index().unwrap_or_default();
            &mut items[index]
        }
        (other, _) => other,
    }
}
