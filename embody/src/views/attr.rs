use std::sync::Arc;

use embody_path::{InvalidPathError, Path, PathSegment, resolve_canonical};
use embody_value::Value;

use super::{MappingView, missing_key};
use crate::EmbodyError;

static NULL: Value = Value::Null;

/// Attribute-style access to an embodied result.
///
/// Reading a key that holds a mapping gives another `AttrView` sharing the same
/// result; anything else is returned as-is.
///
/// ```
/// use embody::{Attr, AttrView, value};
///
/// let view = AttrView::new(value!({ "db": { "host": "h", "ports": [1, 2] } }));
/// let Some(Attr::Mapping(db)) = view.get("db") else { panic!() };
/// assert_eq!(db.get("host").and_then(|a| a.as_leaf()), Some(&value!("h")));
/// assert_eq!(view.attr("db.ports").and_then(|a| a.as_leaf()), Some(&value!([1, 2])));
/// ```
#[derive(Debug, Clone)]
pub struct AttrView {
    root: Arc<Value>,
    prefix: Path,
}

/// One attribute read from an [`AttrView`].
#[derive(Debug, Clone)]
pub enum Attr<'a> {
    /// A nested mapping, wrapped again.
    Mapping(AttrView),
    /// Anything else.
    Leaf(&'a Value),
}

impl<'a> Attr<'a> {
    /// The leaf, unless this is a mapping.
    pub fn as_leaf(&self) -> Option<&'a Value> {
        match self {
            Attr::Leaf(v) => Some(v),
            Attr::Mapping(_) => None,
        }
    }

    /// The nested view, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&AttrView> {
        match self {
            Attr::Mapping(view) => Some(view),
            Attr::Leaf(_) => None,
        }
    }

    /// The attribute as an owned value.
    pub fn to_value(&self) -> Value {
        match self {
            Attr::Mapping(view) => view.to_value(),
            Attr::Leaf(v) => (*v).clone(),
        }
    }
}

impl AttrView {
    /// Wraps a whole result.
    pub fn new(root: impl Into<Arc<Value>>) -> Self {
        Self {
            root: root.into(),
            prefix: Path::root(),
        }
    }

    /// Where this view sits inside the result.
    pub fn path(&self) -> &Path {
        &self.prefix
    }

    /// The value this view wraps.
    pub fn as_value(&self) -> &Value {
        resolve_canonical(&self.root, &self.prefix).unwrap_or(&NULL)
    }

    /// The wrapped value, cloned.
    pub fn to_value(&self) -> Value {
        self.as_value().clone()
    }

    fn wrap<'s>(&'s self, path: Path, value: &'s Value) -> Attr<'s> {
        match value {
            Value::Object(_) => Attr::Mapping(AttrView {
                root: Arc::clone(&self.root),
                prefix: path,
            }),
            _ => Attr::Leaf(value),
        }
    }

    /// Reads one attribute.
    pub fn get(&self, key: &str) -> Option<Attr<'_>> {
        let child = self.as_value().as_object()?.get(key)?;
        Some(self.wrap(self.prefix.join(key), child))
    }

    /// Reads a dotted chain of attributes, such as `db.primary.host`. Numeric
    /// segments index into sequences.
    pub fn attr(&self, dotted: &str) -> Option<Attr<'_>> {
        self.try_attr(dotted).ok()
    }

    /// Like [`AttrView::attr`], reporting where the chain broke.
    pub fn try_attr(&self, dotted: &str) -> Result<Attr<'_>, InvalidPathError> {
        let mut path = self.prefix.clone();
        let mut node = self.as_value();
        for segment in Path::parse_dot(dotted).iter() {
            let segment = match (node, segment.as_index()) {
                (Value::Array(_), Some(i)) => PathSegment::Index(i),
                _ => segment.clone(),
            };
            path.push(segment);
            node = resolve_canonical(&self.root, &path)?;
        }
        Ok(self.wrap(path, node))
    }
}

impl MappingView for AttrView {
    fn len(&self) -> usize {
        self.as_value().as_object().map_or(0, |obj| obj.len())
    }

    fn keys(&self) -> Vec<&str> {
        self.as_value()
            .as_object()
            .map(|obj| obj.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn value(&self, key: &str) -> Result<Value, EmbodyError> {
        self.as_value()
            .as_object()
            .and_then(|obj| obj.get(key))
            .cloned()
            .ok_or_else(|| missing_key(&self.prefix, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embody_value::value;

    #[test]
    fn nested_mappings_are_wrapped() {
        let view = AttrView::new(value!({ "a": { "b": { "c": 1 } }, "xs": [{ "d": 2 }] }));
        let b = view.attr("a.b").unwrap();
        let b = b.as_mapping().unwrap();
        assert_eq!(b.path().to_string(), "a.b");
        assert_eq!(b.get("c").and_then(|c| c.as_leaf().cloned()), Some(Value::from(1)));

        // Sequences are leaves, but dotted chains can still reach inside them.
        assert!(view.get("xs").unwrap().as_leaf().is_some());
        let d = view.attr("xs.0").unwrap();
        assert_eq!(d.as_mapping().map(|m| m.path().to_string()), Some("xs[0]".to_owned()));
    }

    #[test]
    fn mapping_view_reads() {
        let view = AttrView::new(value!({ "x": 1, "y": { "z": 2 } }));
        assert_eq!(view.keys(), ["x", "y"]);
        assert_eq!(view.value("y").unwrap(), value!({ "z": 2 }));
        let err = view.value("nope").unwrap_err();
        insta::assert_snapshot!(err, @r#"no key "nope" in mapping at <root>"#);
        assert_eq!(view.to_object().map(Value::Object).unwrap(), view.to_value());
    }

    #[test]
    fn broken_chains_report_the_failing_segment() {
        let view = AttrView::new(value!({ "a": { "b": 1 } }));
        let err = view.try_attr("a.b.c").unwrap_err();
        insta::assert_snapshot!(err, @"cannot apply key \"c\" to number at a.b");
    }
}
