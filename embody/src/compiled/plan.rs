use std::collections::BTreeMap;

use embody_path::{Path, PathSegment};
use embody_value::Value;
use indexmap::IndexSet;

use crate::tracing_macros::debug;
use crate::{CycleDetector, EmbodyError, LeafDescriptor, Node, NodeId, Syntax, Template};

/// A template flattened into path-addressed entries, ready to be embodied many
/// times.
///
/// Entries are stored in pre-order, so a container always comes before its
/// children. A node shared by several parents gets one entry per place it
/// appears. The plan does not refer back to its template; with the `serde`
/// feature it can be stored and loaded on its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PlanParts", into = "PlanParts")
)]
pub struct CompiledPlan {
    syntax: Syntax,
    entries: Vec<PlanEntry>,
    /// Container entries, longest paths first.
    rebuild_order: Vec<usize>,
    index: BTreeMap<Path, usize>,
}

/// One node of a compiled plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanEntry {
    /// Where the node sits, in template coordinates.
    pub path: Path,
    /// How to embody the node's key, when it is a mapping entry whose key holds
    /// placeholders. The source key is the last segment of `path`.
    pub key: Option<LeafDescriptor>,
    /// What the node is.
    pub kind: EntryKind,
}

impl PlanEntry {
    /// The key this entry has in its parent mapping, as written in the template.
    pub fn source_key(&self) -> Option<&str> {
        self.path.last().and_then(PathSegment::as_key)
    }
}

/// Shape of a plan entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKind {
    /// A leaf and how to embody it.
    Leaf {
        /// The template scalar.
        source: Value,
        /// Its classification.
        descriptor: LeafDescriptor,
    },
    /// A mapping. `children` index into the plan's entries, in source order.
    Mapping {
        /// Child entries.
        children: Vec<usize>,
        /// Whether any child's key holds placeholders, so that keys must be
        /// settled after embodiment.
        templated_keys: bool,
    },
    /// A sequence. `children` index into the plan's entries, in order.
    Sequence {
        /// Child entries.
        children: Vec<usize>,
    },
}

/// Container shape recorded at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A mapping.
    Mapping {
        /// Whether some key below it holds placeholders.
        templated_keys: bool,
    },
    /// A sequence.
    Sequence,
}

impl CompiledPlan {
    /// Flattens `template` for `syntax`. No context is consulted.
    ///
    /// Fails with [`EmbodyError::Cycle`] if a container contains itself.
    pub fn compile(template: &Template, syntax: Syntax) -> Result<Self, EmbodyError> {
        enum Task {
            Enter {
                node: NodeId,
                path: Path,
                key: Option<LeafDescriptor>,
                parent: Option<usize>,
            },
            Leave(NodeId),
        }

        let mut entries: Vec<PlanEntry> = Vec::with_capacity(template.len());
        let mut cycles = CycleDetector::new();
        let mut stack = vec![Task::Enter {
            node: template.root(),
            path: Path::root(),
            key: None,
            parent: None,
        }];

        while let Some(task) = stack.pop() {
            let (node, path, key, parent) = match task {
                Task::Leave(node) => {
                    cycles.leave(node);
                    continue;
                }
                Task::Enter {
                    node,
                    path,
                    key,
                    parent,
                } => (node, path, key, parent),
            };

            let index = entries.len();
            if let Some(parent) = parent
                && let Some(PlanEntry {
                    kind:
                        EntryKind::Mapping { children, .. } | EntryKind::Sequence { children },
                    ..
                }) = entries.get_mut(parent)
            {
                children.push(index);
            }

            let kind = match template.node(node) {
                Node::Scalar(source) => EntryKind::Leaf {
                    source: source.clone(),
                    descriptor: syntax.describe(source),
                },
                Node::Sequence(children) => {
                    cycles.enter(node, &path)?;
                    stack.push(Task::Leave(node));
                    for (i, child) in children.iter().enumerate().rev() {
                        stack.push(Task::Enter {
                            node: *child,
                            path: path.join(i),
                            key: None,
                            parent: Some(index),
                        });
                    }
                    EntryKind::Sequence {
                        children: Vec::with_capacity(children.len()),
                    }
                }
                Node::Mapping(children) => {
                    cycles.enter(node, &path)?;
                    stack.push(Task::Leave(node));
                    let mut templated_keys = false;
                    for (source_key, child) in children.iter().rev() {
                        let descriptor = syntax.describe_str(source_key);
                        templated_keys |= descriptor.is_templated();
                        stack.push(Task::Enter {
                            node: *child,
                            path: path.join(source_key.as_str()),
                            key: descriptor.is_templated().then_some(descriptor),
                            parent: Some(index),
                        });
                    }
                    EntryKind::Mapping {
                        children: Vec::with_capacity(children.len()),
                        templated_keys,
                    }
                }
            };
            entries.push(PlanEntry { path, key, kind });
        }

        let plan = Self::assemble(syntax, entries);
        debug!(
            template = ?template.id(),
            entries = plan.entries.len(),
            containers = plan.rebuild_order.len(),
            "compiled plan"
        );
        Ok(plan)
    }

    fn assemble(syntax: Syntax, entries: Vec<PlanEntry>) -> Self {
        let mut rebuild_order: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !matches!(e.kind, EntryKind::Leaf { .. }))
            .map(|(i, _)| i)
            .collect();
        rebuild_order.sort_by(|a, b| entries[*b].path.len().cmp(&entries[*a].path.len()));
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.path.clone(), i))
            .collect();
        Self {
            syntax,
            entries,
            rebuild_order,
            index,
        }
    }

    /// The placeholder syntax this plan was compiled for.
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Every entry, in pre-order. The root is first.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A plan always has a root entry, so this is never `true`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn rebuild_order(&self) -> &[usize] {
        &self.rebuild_order
    }

    /// Leaves with their paths, in template order.
    pub fn leaves(&self) -> impl Iterator<Item = (&Path, &LeafDescriptor)> {
        self.entries.iter().filter_map(|e| match &e.kind {
            EntryKind::Leaf { descriptor, .. } => Some((&e.path, descriptor)),
            _ => None,
        })
    }

    /// Containers with their paths, in template order.
    pub fn skeleton(&self) -> impl Iterator<Item = (&Path, Shape)> {
        self.entries.iter().filter_map(|e| Some((&e.path, shape(&e.kind)?)))
    }

    /// The descriptor of the leaf at `path`.
    pub fn leaf(&self, path: &Path) -> Option<&LeafDescriptor> {
        match &self.entries[*self.index.get(path)?].kind {
            EntryKind::Leaf { descriptor, .. } => Some(descriptor),
            _ => None,
        }
    }

    /// The container shape at `path`.
    pub fn shape_at(&self, path: &Path) -> Option<Shape> {
        shape(&self.entries[*self.index.get(path)?].kind)
    }

    /// Placeholder names in leaves and keys, in first-seen order without repeats.
    pub fn parameters(&self) -> Vec<&str> {
        let mut names = IndexSet::new();
        for entry in &self.entries {
            if let Some(key) = &entry.key {
                names.extend(key.names());
            }
            if let EntryKind::Leaf { descriptor, .. } = &entry.kind {
                names.extend(descriptor.names());
            }
        }
        names.into_iter().collect()
    }
}

fn shape(kind: &EntryKind) -> Option<Shape> {
    match kind {
        EntryKind::Leaf { .. } => None,
        EntryKind::Mapping { templated_keys, .. } => Some(Shape::Mapping {
            templated_keys: *templated_keys,
        }),
        EntryKind::Sequence { .. } => Some(Shape::Sequence),
    }
}

/// Stored form of a plan: the derived lookup tables are rebuilt on load.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PlanParts {
    syntax: Syntax,
    entries: Vec<PlanEntry>,
}

#[cfg(feature = "serde")]
impl From<CompiledPlan> for PlanParts {
    fn from(plan: CompiledPlan) -> Self {
        PlanParts {
            syntax: plan.syntax,
            entries: plan.entries,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<PlanParts> for CompiledPlan {
    type Error = String;

    fn try_from(parts: PlanParts) -> Result<Self, String> {
        if parts.entries.is_empty() {
            return Err("a plan needs a root entry".to_owned());
        }
        let mut parent_of: Vec<Option<usize>> = vec![None; parts.entries.len()];
        for (i, entry) in parts.entries.iter().enumerate() {
            let children = match &entry.kind {
                EntryKind::Leaf { .. } => continue,
                EntryKind::Mapping { children, .. } | EntryKind::Sequence { children } => children,
            };
            for &child in children {
                if child <= i || child >= parts.entries.len() {
                    return Err(format!("entry {i} has out-of-order child {child}"));
                }
                if parent_of[child].replace(i).is_some() {
                    return Err(format!("entry {child} has two parents"));
                }
                if parts.entries[child].path.len() != entry.path.len() + 1 {
                    return Err(format!("entry {child} is not one level below entry {i}"));
                }
            }
        }
        if let Some(orphan) = parent_of.iter().skip(1).position(Option::is_none) {
            return Err(format!("entry {} has no parent", orphan + 1));
        }
        Ok(CompiledPlan::assemble(parts.syntax, parts.entries))
    }
}
