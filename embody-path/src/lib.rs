#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Canonical paths into [`Value`](embody_value::Value) trees.
//!
//! A [`Path`] is an ordered list of [`PathSegment`]s, each either a mapping key or a
//! sequence index. Every external notation normalizes to it:
//!
//! | Notation | Example | Notes |
//! |----------|---------|-------|
//! | dot | `user.items.0.name` | ambiguous when a key contains `.` |
//! | pointer | `/user/items/0/name` | `~1` escapes `/`, `~0` escapes `~` |
//! | segments | `["user", "items", "0", "name"]` | always unambiguous |
//!
//! On top of paths this crate provides [`resolve`], [`resolve_mut`] and [`set`],
//! [`flatten`]/[`unflatten`] between nested values and single-level dot-keyed maps,
//! [`depth`], and a depth-first [`walk_value`] visitor.

use core::fmt::{self, Display, Formatter};

pub mod access;
pub use access::{InvalidPathError, resolve, resolve_canonical, resolve_mut, set};

pub mod flatten;
pub use flatten::{depth, flatten, flatten_canonical, unflatten, unflatten_canonical};

mod notation;
pub use notation::PathLike;

pub mod walk;
pub use walk::{ValueVisitor, VisitDecision, WalkStatus, walk_value};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum PathSegment {
    /// Navigate to a mapping entry by key
    Key(String),
    /// Navigate to a sequence element by index
    Index(usize),
}

impl PathSegment {
    /// Returns the key, if this is a key segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(k) => Some(k),
            PathSegment::Index(_) => None,
        }
    }

    /// Returns the index this segment addresses in a sequence.
    ///
    /// Key segments qualify when they are a plain decimal number, which is how
    /// dot and pointer notations spell indices.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(k) => parse_index(k),
        }
    }
}

/// Parses a canonical decimal index: digits only, no sign, no leading zeros.
pub(crate) fn parse_index(s: &str) -> Option<usize> {
    let canonical = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s == "0" || !s.starts_with('0'));
    if canonical { s.parse().ok() } else { None }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(k: &str) -> Self {
        PathSegment::Key(k.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(k: String) -> Self {
        PathSegment::Key(k)
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

/// A canonical path: the sequence of segments from a root value to a node.
///
/// The empty path addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The empty path.
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Create a path with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
        }
    }

    /// Push a segment onto the path.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// Pop the last segment from the path.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn join(&self, segment: impl Into<PathSegment>) -> Path {
        let mut out = Path::with_capacity(self.len() + 1);
        out.segments.extend_from_slice(&self.segments);
        out.segments.push(segment.into());
        out
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub const fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the root path.
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The path without its last segment, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.segments.split_last()?;
        Some(Path::from(init.to_vec()))
    }

    /// Returns `true` if `prefix` is an ancestor of (or equal to) this path.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Iterates over the segments.
    pub fn iter(&self) -> core::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = core::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl Display for Path {
    /// Formats like `user.items[3].name`; the root path is `<root>`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                f.write_str(".")?;
            }
            Display::fmt(segment, f)?;
        }
        Ok(())
    }
}
