//! Immutable template graphs.
//!
//! A [`Template`] is an arena of nodes. Converting a [`Value`] gives a plain tree;
//! [`TemplateBuilder`] can also share one node under several parents, or point a
//! descendant back at an ancestor. Engines reject the second case with
//! [`EmbodyError::Cycle`] and embody the first independently at every place it
//! appears.

use core::fmt;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use embody_path::{Path, PathSegment};
use embody_value::Value;
use indexmap::IndexSet;

use crate::{EmbodyError, Syntax, TemplateError};

/// Identity of a node inside one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its template's arena.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Process-unique identity of a template, used as the plan cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId(u64);

impl TemplateId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        TemplateId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One node of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A leaf: any value, possibly a string with placeholders. Containers held in a
    /// scalar are copied as-is and never scanned.
    Scalar(Value),
    /// Ordered elements.
    Sequence(Vec<NodeId>),
    /// Keyed entries in source order. Keys may hold placeholders.
    Mapping(Vec<(String, NodeId)>),
}

/// An immutable template.
///
/// Cloning keeps the identity, so a clone hits the same cached plan.
#[derive(Debug, Clone)]
pub struct Template {
    id: TemplateId,
    nodes: Vec<Node>,
    root: NodeId,
}

impl Template {
    /// Identity of this template.
    pub fn id(&self) -> TemplateId {
        self.id
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from another template.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A template always has a root, so this is never `true`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Placeholder names used anywhere in the template, keys included, in first-seen
    /// order without repeats.
    pub fn parameters(&self, syntax: Syntax) -> Vec<String> {
        let mut names = IndexSet::new();
        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        let collect = |text: &str, names: &mut IndexSet<String>| {
            for p in syntax.placeholders(text) {
                if !names.contains(p.name) {
                    names.insert(p.name.to_owned());
                }
            }
        };
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            match self.node(id) {
                Node::Scalar(Value::String(s)) => collect(s, &mut names),
                Node::Scalar(_) => {}
                Node::Sequence(children) => stack.extend(children.iter().rev()),
                Node::Mapping(entries) => {
                    // Keys of a mapping count as seen before any of its values.
                    for (key, _) in entries {
                        collect(key, &mut names);
                    }
                    stack.extend(entries.iter().rev().map(|(_, child)| *child));
                }
            }
        }
        names.into_iter().collect()
    }

    /// Reports the first cycle without embodying anything.
    pub fn check_cycles(&self) -> Result<(), EmbodyError> {
        enum Task {
            Enter(NodeId, Path),
            Leave(NodeId),
        }

        let mut active: indexmap::IndexMap<NodeId, Path> = indexmap::IndexMap::new();
        let mut done = HashSet::new();
        let mut stack = vec![Task::Enter(self.root, Path::root())];
        while let Some(task) = stack.pop() {
            let (id, path) = match task {
                Task::Leave(id) => {
                    active.swap_remove(&id);
                    done.insert(id);
                    continue;
                }
                Task::Enter(id, path) => (id, path),
            };
            if let Some(ancestor) = active.get(&id) {
                return Err(EmbodyError::Cycle {
                    path,
                    ancestor: ancestor.clone(),
                });
            }
            // A finished node cannot reach an active one, or the cycle would
            // have been found while it was active.
            if done.contains(&id) {
                continue;
            }
            let children: Vec<(PathSegment, NodeId)> = match self.node(id) {
                Node::Scalar(_) => continue,
                Node::Sequence(children) => children
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (PathSegment::Index(i), *c))
                    .collect(),
                Node::Mapping(entries) => entries
                    .iter()
                    .map(|(k, c)| (PathSegment::Key(k.clone()), *c))
                    .collect(),
            };
            stack.push(Task::Leave(id));
            for (segment, child) in children.into_iter().rev() {
                stack.push(Task::Enter(child, path.join(segment)));
            }
            active.insert(id, path);
        }
        Ok(())
    }
}

impl From<Value> for Template {
    fn from(value: Value) -> Self {
        Template::from(&value)
    }
}

impl From<&Value> for Template {
    fn from(value: &Value) -> Self {
        let mut builder = TemplateBuilder::new();
        let root = builder.reserve();
        let mut stack = vec![(root, value)];
        while let Some((slot, value)) = stack.pop() {
            let node = match value {
                Value::Array(items) => Node::Sequence(
                    items
                        .iter()
                        .map(|item| {
                            let id = builder.reserve();
                            stack.push((id, item));
                            id
                        })
                        .collect(),
                ),
                Value::Object(obj) => Node::Mapping(
                    obj.iter()
                        .map(|(k, v)| {
                            let id = builder.reserve();
                            stack.push((id, v));
                            (k.clone(), id)
                        })
                        .collect(),
                ),
                other => Node::Scalar(other.clone()),
            };
            builder.nodes[slot.0] = node;
        }
        Template {
            id: TemplateId::next(),
            nodes: builder.nodes,
            root,
        }
    }
}

/// Builds templates node by node, including shared and cyclic ones.
///
/// ```
/// use embody::{TemplateBuilder, Value};
///
/// let mut b = TemplateBuilder::new();
/// let shared = b.value(Value::from("${x}"));
/// let root = b.mapping();
/// b.insert(root, "left", shared).unwrap();
/// b.insert(root, "right", shared).unwrap();
/// let template = b.build(root).unwrap();
/// assert_eq!(template.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    nodes: Vec<Node>,
}

impl TemplateBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn reserve(&mut self) -> NodeId {
        self.nodes.push(Node::Scalar(Value::Null));
        NodeId(self.nodes.len() - 1)
    }

    fn check(&self, id: NodeId) -> Result<(), TemplateError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(TemplateError::UnknownNode(id))
        }
    }

    /// Adds a leaf.
    pub fn scalar(&mut self, value: impl Into<Value>) -> NodeId {
        let id = self.reserve();
        self.nodes[id.0] = Node::Scalar(value.into());
        id
    }

    /// Adds a whole value as a tree: containers become nodes, everything else a leaf.
    pub fn value(&mut self, value: Value) -> NodeId {
        let offset = self.nodes.len();
        let sub = Template::from(&value);
        let shift = |id: &NodeId| NodeId(id.0 + offset);
        self.nodes.extend(sub.nodes.into_iter().map(|node| match node {
            Node::Scalar(v) => Node::Scalar(v),
            Node::Sequence(children) => Node::Sequence(children.iter().map(shift).collect()),
            Node::Mapping(entries) => {
                Node::Mapping(entries.into_iter().map(|(k, c)| (k, shift(&c))).collect())
            }
        }));
        shift(&sub.root)
    }

    /// Adds an empty sequence.
    pub fn sequence(&mut self) -> NodeId {
        let id = self.reserve();
        self.nodes[id.0] = Node::Sequence(Vec::new());
        id
    }

    /// Adds an empty mapping.
    pub fn mapping(&mut self) -> NodeId {
        let id = self.reserve();
        self.nodes[id.0] = Node::Mapping(Vec::new());
        id
    }

    /// Appends `child` to the sequence `seq`.
    pub fn push(&mut self, seq: NodeId, child: NodeId) -> Result<(), TemplateError> {
        self.check(seq)?;
        self.check(child)?;
        match &mut self.nodes[seq.0] {
            Node::Sequence(children) => {
                children.push(child);
                Ok(())
            }
            _ => Err(TemplateError::NotASequence(seq)),
        }
    }

    /// Adds an entry to the mapping `map`. Source keys must be distinct; keys that
    /// only collide after embodiment are handled by the collision policy.
    pub fn insert(
        &mut self,
        map: NodeId,
        key: impl Into<String>,
        child: NodeId,
    ) -> Result<(), TemplateError> {
        self.check(map)?;
        self.check(child)?;
        let key = key.into();
        match &mut self.nodes[map.0] {
            Node::Mapping(entries) => {
                if entries.iter().any(|(k, _)| *k == key) {
                    return Err(TemplateError::DuplicateKey { node: map, key });
                }
                entries.push((key, child));
                Ok(())
            }
            _ => Err(TemplateError::NotAMapping(map)),
        }
    }

    /// Finishes the template with `root` as its root.
    pub fn build(self, root: NodeId) -> Result<Template, TemplateError> {
        self.check(root)?;
        Ok(Template {
            id: TemplateId::next(),
            nodes: self.nodes,
            root,
        })
    }
}
