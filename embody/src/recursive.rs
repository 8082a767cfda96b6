//! Depth-first embodiment.
//!
//! The walk recurses until the configured call depth, then continues the remaining
//! subtree with an explicit stack of partially built containers. Both halves share
//! one [`CycleDetector`] and one current path.

use embody_path::Path;
use embody_value::Value;

use crate::keys::{Keyed, settle};
use crate::substitute::{embody_key, embody_leaf};
use crate::tracing_macros::{debug, trace};
use crate::{Context, CycleDetector, EmbodyConfig, EmbodyError, Node, NodeId, Template};

/// Embodies the whole template.
pub(crate) fn embody_recursive(
    template: &Template,
    ctx: &Context,
    config: &EmbodyConfig,
) -> Result<Value, EmbodyError> {
    trace!(template = ?template.id(), "recursive embodiment");
    Walk::new(template, ctx, config, Path::root()).visit(template.root(), 0)
}

/// Embodies the subtree at `node`, found at `prefix` below containers that are
/// already open on the branch.
pub(crate) fn embody_subtree(
    template: &Template,
    ctx: &Context,
    config: &EmbodyConfig,
    node: NodeId,
    prefix: Path,
    ancestors: &[(NodeId, Path)],
) -> Result<Value, EmbodyError> {
    let depth = prefix.len();
    let mut walk = Walk::new(template, ctx, config, prefix);
    for (id, at) in ancestors {
        walk.cycles.enter(*id, at)?;
    }
    walk.visit(node, depth)
}

struct Walk<'a> {
    template: &'a Template,
    ctx: &'a Context,
    config: &'a EmbodyConfig,
    cycles: CycleDetector,
    path: Path,
}

/// A container whose children are being embodied.
enum Open<'a> {
    Sequence {
        id: NodeId,
        children: &'a [NodeId],
        next: usize,
        out: Vec<Value>,
    },
    Mapping {
        id: NodeId,
        entries: &'a [(String, NodeId)],
        next: usize,
        key: String,
        out: Vec<Keyed<Value>>,
    },
}

impl<'a> Walk<'a> {
    fn new(template: &'a Template, ctx: &'a Context, config: &'a EmbodyConfig, path: Path) -> Self {
        Self {
            template,
            ctx,
            config,
            cycles: CycleDetector::new(),
            path,
        }
    }

    fn leaf(&self, source: &Value) -> Result<Value, EmbodyError> {
        let descriptor = self.config.syntax.describe(source);
        embody_leaf(source, &descriptor, self.ctx, self.config.strict, &self.path)
    }

    /// Embodies a key. The current path must already end with it.
    fn key(&self, key: &str) -> Result<String, EmbodyError> {
        let descriptor = self.config.syntax.describe_str(key);
        embody_key(key, &descriptor, self.ctx, self.config.strict, &self.path)
    }

    fn mapping(&self, entries: Vec<Keyed<Value>>) -> Result<Value, EmbodyError> {
        let settled = settle(entries, self.config.key_collision)?;
        Ok(Value::Object(settled.into_iter().collect()))
    }

    fn visit(&mut self, id: NodeId, depth: usize) -> Result<Value, EmbodyError> {
        if depth >= self.config.max_recursion_depth {
            debug!(depth, path = %self.path, "continuing with an explicit stack");
            return self.visit_iterative(id);
        }
        let template = self.template;
        match template.node(id) {
            Node::Scalar(source) => self.leaf(source),
            Node::Sequence(children) => {
                self.cycles.enter(id, &self.path)?;
                let mut out = Vec::with_capacity(children.len());
                for (i, child) in children.iter().enumerate() {
                    self.path.push(i);
                    let value = self.visit(*child, depth + 1);
                    self.path.pop();
                    out.push(value?);
                }
                self.cycles.leave(id);
                Ok(Value::Array(out))
            }
            Node::Mapping(entries) => {
                self.cycles.enter(id, &self.path)?;
                let mut out = Vec::with_capacity(entries.len());
                for (key, child) in entries {
                    self.path.push(key.as_str());
                    let entry = self.key(key).and_then(|key| {
                        let value = self.visit(*child, depth + 1)?;
                        Ok(Keyed {
                            key,
                            source: self.path.clone(),
                            value,
                        })
                    });
                    self.path.pop();
                    out.push(entry?);
                }
                self.cycles.leave(id);
                self.mapping(out)
            }
        }
    }

    /// Pushes a container, or embodies a scalar right away.
    fn open(
        &mut self,
        id: NodeId,
        stack: &mut Vec<Open<'a>>,
    ) -> Result<Option<Value>, EmbodyError> {
        let template = self.template;
        match template.node(id) {
            Node::Scalar(source) => self.leaf(source).map(Some),
            Node::Sequence(children) => {
                self.cycles.enter(id, &self.path)?;
                stack.push(Open::Sequence {
                    id,
                    children,
                    next: 0,
                    out: Vec::with_capacity(children.len()),
                });
                Ok(None)
            }
            Node::Mapping(entries) => {
                self.cycles.enter(id, &self.path)?;
                stack.push(Open::Mapping {
                    id,
                    entries,
                    next: 0,
                    key: String::new(),
                    out: Vec::with_capacity(entries.len()),
                });
                Ok(None)
            }
        }
    }

    fn close(&mut self, open: Open<'a>) -> Result<Value, EmbodyError> {
        match open {
            Open::Sequence { id, out, .. } => {
                self.cycles.leave(id);
                Ok(Value::Array(out))
            }
            Open::Mapping { id, out, .. } => {
                self.cycles.leave(id);
                self.mapping(out)
            }
        }
    }

    fn visit_iterative(&mut self, root: NodeId) -> Result<Value, EmbodyError> {
        let mut stack: Vec<Open<'a>> = Vec::new();
        let mut ready = self.open(root, &mut stack)?;
        loop {
            // A finished child goes into its parent, then its segment is popped.
            if let Some(value) = ready.take() {
                match stack.last_mut() {
                    None => return Ok(value),
                    Some(Open::Sequence { out, .. }) => out.push(value),
                    Some(Open::Mapping { out, key, .. }) => out.push(Keyed {
                        key: core::mem::take(key),
                        source: self.path.clone(),
                        value,
                    }),
                }
                self.path.pop();
                continue;
            }

            let child = match stack.last_mut() {
                None => return Ok(Value::Null),
                Some(Open::Sequence { children, next, .. }) if *next < children.len() => {
                    let child = children[*next];
                    self.path.push(*next);
                    *next += 1;
                    Some(child)
                }
                Some(Open::Mapping {
                    entries, next, key, ..
                }) if *next < entries.len() => {
                    let all: &'a [(String, NodeId)] = *entries;
                    let (source_key, child) = &all[*next];
                    *next += 1;
                    self.path.push(source_key.as_str());
                    *key = self.key(source_key)?;
                    Some(*child)
                }
                Some(_) => None,
            };

            match child {
                Some(child) => ready = self.open(child, &mut stack)?,
                None => {
                    if let Some(done) = stack.pop() {
                        ready = Some(self.close(done)?);
                    }
                }
            }
        }
    }
}
