//! Conversions between nested values and single-level, path-keyed maps.
//!
//! [`flatten`] keys leaves by dot notation; [`unflatten`] reverses it, turning a
//! level whose keys are all plain indices (`0`, `1`, …) back into a sequence. The
//! canonical variants key by [`Path`] and need no inference.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use embody_value::{VObject, Value};
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::{
    InvalidPathError, Path, PathSegment, ValueVisitor, VisitDecision, parse_index, walk_value,
};

/// Collects every leaf: scalars, opaque values and empty containers.
struct Leaves<F> {
    emit: F,
}

impl<F: FnMut(&Path, &Value)> ValueVisitor for Leaves<F> {
    fn enter(&mut self, path: &Path, value: &Value) -> VisitDecision {
        let has_children = match value {
            Value::Array(items) => !items.is_empty(),
            Value::Object(obj) => !obj.is_empty(),
            _ => false,
        };
        if has_children {
            VisitDecision::Recurse
        } else {
            (self.emit)(path, value);
            VisitDecision::SkipChildren
        }
    }
}

/// Flattens `value` into a map from dot-notation paths to leaves, in traversal order.
///
/// Empty containers are kept as leaves so they survive a round trip. A scalar root
/// is stored under the empty key.
pub fn flatten(value: &Value) -> IndexMap<String, Value> {
    let mut out = IndexMap::new();
    walk_value(
        value,
        &mut Leaves {
            emit: |path: &Path, leaf: &Value| {
                out.insert(path.to_dot(), leaf.clone());
            },
        },
    );
    out
}

/// Flattens `value` into a map from canonical paths to leaves, in traversal order.
pub fn flatten_canonical(value: &Value) -> IndexMap<Path, Value> {
    let mut out = IndexMap::new();
    walk_value(
        value,
        &mut Leaves {
            emit: |path: &Path, leaf: &Value| {
                out.insert(path.clone(), leaf.clone());
            },
        },
    );
    out
}

/// Maximum nesting depth: `0` for a scalar or an empty container, `1` for
/// `{"a": 1}`, and one more per level below that.
pub fn depth(value: &Value) -> usize {
    let mut max = 0;
    walk_value(
        value,
        &mut Leaves {
            emit: |path: &Path, _: &Value| max = max.max(path.len()),
        },
    );
    max
}

enum Node {
    Leaf(Value),
    Map(IndexMap<String, Node>),
    Seq(BTreeMap<usize, Node>),
}

fn build(segments: &[PathSegment], value: Value) -> Node {
    segments
        .iter()
        .rev()
        .fold(Node::Leaf(value), |child, segment| match segment {
            PathSegment::Key(k) => Node::Map(IndexMap::from([(k.clone(), child)])),
            PathSegment::Index(i) => Node::Seq(BTreeMap::from([(*i, child)])),
        })
}

fn place(root: &mut Node, segments: &[PathSegment], value: Value) -> Result<(), &'static str> {
    let mut node = root;
    for (i, segment) in segments.iter().enumerate() {
        node = match (node, segment) {
            (Node::Map(map), PathSegment::Key(k)) => match map.entry(k.clone()) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => {
                    e.insert(build(&segments[i + 1..], value));
                    return Ok(());
                }
            },
            (Node::Seq(seq), PathSegment::Index(idx)) => {
                match seq.entry(*idx) {
                    std::collections::btree_map::Entry::Occupied(e) => e.into_mut(),
                    std::collections::btree_map::Entry::Vacant(e) => {
                        e.insert(build(&segments[i + 1..], value));
                        return Ok(());
                    }
                }
            }
            (Node::Leaf(_), _) => return Err("a leaf is also used as a container"),
            _ => return Err("a level mixes keys and indices"),
        };
    }
    Err("duplicate path")
}

fn assemble(
    entries: impl Iterator<Item = (Path, Value, String)>,
) -> Result<Option<Node>, InvalidPathError> {
    let mut root: Option<Node> = None;
    for (path, value, input) in entries {
        let outcome = match root.as_mut() {
            None => {
                root = Some(build(path.segments(), value));
                Ok(())
            }
            Some(node) => place(node, path.segments(), value),
        };
        outcome.map_err(|reason| InvalidPathError::Malformed { input, reason })?;
    }
    Ok(root)
}

/// A level becomes a sequence only while its highest index stays below twice the
/// number of entries. Anything sparser reads as ids, not positions.
fn sequence_len(max_index: usize, entries: usize) -> Option<usize> {
    if max_index < entries.saturating_mul(2) {
        max_index.checked_add(1)
    } else {
        None
    }
}

fn into_sequence(
    children: impl Iterator<Item = (usize, Node)>,
    len: usize,
    infer: bool,
    at: &mut Path,
) -> Result<Value, InvalidPathError> {
    let mut items = vec![Value::Null; len];
    for (i, child) in children {
        at.push(PathSegment::Index(i));
        let value = into_value(child, infer, at);
        at.pop();
        if let Some(slot) = items.get_mut(i) {
            *slot = value?;
        }
    }
    Ok(Value::Array(items))
}

fn into_value(node: Node, infer: bool, at: &mut Path) -> Result<Value, InvalidPathError> {
    match node {
        Node::Leaf(v) => Ok(v),
        Node::Seq(seq) => {
            let max = seq.keys().next_back().copied().unwrap_or(0);
            let Some(len) = sequence_len(max, seq.len()) else {
                return Err(InvalidPathError::Malformed {
                    input: at.join(PathSegment::Index(max)).to_string(),
                    reason: "index is far past the sequence length",
                });
            };
            into_sequence(seq.into_iter(), len, infer, at)
        }
        Node::Map(map) => {
            let indices: Option<Vec<usize>> = if infer && !map.is_empty() {
                map.keys().map(|k| parse_index(k)).collect()
            } else {
                None
            };
            let len = indices
                .as_ref()
                .and_then(|ix| sequence_len(ix.iter().copied().max()?, ix.len()));
            match (indices, len) {
                (Some(indices), Some(len)) => {
                    into_sequence(indices.into_iter().zip(map.into_values()), len, infer, at)
                }
                _ => {
                    let mut obj = VObject::with_capacity(map.len());
                    for (k, child) in map {
                        at.push(PathSegment::Key(k.clone()));
                        let value = into_value(child, infer, at);
                        at.pop();
                        obj.insert(k, value?);
                    }
                    Ok(Value::Object(obj))
                }
            }
        }
    }
}

/// Rebuilds a nested value from dot-notation keys.
///
/// A level whose keys are all plain indices becomes a sequence, padded with `Null`
/// where indices are missing, as long as it is at least half full. A sparser level
/// (`users.4000000000`) stays a mapping. Keys that contradict each other (`a` and
/// `a.b`, or the same key twice) are an error.
pub fn unflatten<I, K, V>(flat: I) -> Result<Value, InvalidPathError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    let entries = flat.into_iter().map(|(k, v)| {
        let key = k.as_ref();
        (Path::parse_dot(key), v.into(), key.to_owned())
    });
    match assemble(entries)? {
        Some(node) => into_value(node, true, &mut Path::root()),
        None => Ok(Value::Object(VObject::new())),
    }
}

/// Rebuilds a nested value from canonical paths. Index segments make sequences,
/// key segments make mappings; nothing is inferred.
///
/// A sequence must be at least half full: an index far past the number of
/// elements at its level is an error rather than a huge padded allocation.
pub fn unflatten_canonical<I, K, V>(flat: I) -> Result<Value, InvalidPathError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Borrow<Path>,
    V: Into<Value>,
{
    let entries = flat.into_iter().map(|(k, v)| {
        let path: &Path = k.borrow();
        (path.clone(), v.into(), path.to_string())
    });
    match assemble(entries)? {
        Some(node) => into_value(node, false, &mut Path::root()),
        None => Ok(Value::Object(VObject::new())),
    }
}
