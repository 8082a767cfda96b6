//! Visitor API for deterministic traversal of [`Value`] trees.
//!
//! # Traversal order
//!
//! - **Depth-first, insertion order.** Mapping entries are visited in the order
//!   their keys were inserted; sequence elements in index order.
//! - `enter` is called **before** children; `leave` is called **after** children.
//!
//! # Traversal control
//!
//! | Decision        | Effect                                                  |
//! |-----------------|---------------------------------------------------------|
//! | `Recurse`       | Visit children, then call `leave`.                      |
//! | `SkipChildren`  | Skip descendants of this node; `leave` is still called. |
//! | `Stop`          | Terminate the entire walk immediately.                  |
//!
//! The walk keeps its own stack, so arbitrarily deep values do not exhaust the
//! thread's call stack.

use embody_value::Value;

use crate::{Path, PathSegment};

/// Decision returned by [`ValueVisitor::enter`] to control traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitDecision {
    /// Descend into this node's children, then call [`ValueVisitor::leave`].
    Recurse,
    /// Skip this node's descendants. [`ValueVisitor::leave`] is still called.
    SkipChildren,
    /// Stop the entire walk immediately. No further callbacks are made.
    Stop,
}

/// Outcome of [`walk_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// The walk visited every reachable node.
    Completed,
    /// The walk was terminated early by [`VisitDecision::Stop`].
    Stopped,
}

/// Visitor trait for value traversal.
pub trait ValueVisitor {
    /// Called when the walker enters a node, **before** visiting children.
    fn enter(&mut self, path: &Path, value: &Value) -> VisitDecision;

    /// Called when the walker leaves a node, **after** its children (or after
    /// skipping them).
    ///
    /// Not called if `enter` returned [`VisitDecision::Stop`].
    fn leave(&mut self, path: &Path, value: &Value) {
        let _ = (path, value);
    }
}

enum Step<'v> {
    Enter(Option<PathSegment>, &'v Value),
    Leave(&'v Value, bool),
}

/// Walk a [`Value`] tree depth-first, calling `visitor` at each node.
///
/// See the [module docs](self) for traversal order and control semantics.
pub fn walk_value(root: &Value, visitor: &mut impl ValueVisitor) -> WalkStatus {
    let mut path = Path::root();
    let mut stack = vec![Step::Enter(None, root)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(segment, value) => {
                let pushed = segment.is_some();
                if let Some(segment) = segment {
                    path.push(segment);
                }
                match visitor.enter(&path, value) {
                    VisitDecision::Stop => return WalkStatus::Stopped,
                    VisitDecision::SkipChildren => {
                        visitor.leave(&path, value);
                        if pushed {
                            path.pop();
                        }
                    }
                    VisitDecision::Recurse => {
                        stack.push(Step::Leave(value, pushed));
                        // Reversed so the first child is popped first.
                        match value {
                            Value::Array(items) => {
                                for (i, item) in items.iter().enumerate().rev() {
                                    stack.push(Step::Enter(Some(PathSegment::Index(i)), item));
                                }
                            }
                            Value::Object(obj) => {
                                for (key, item) in obj.iter().rev() {
                                    let segment = PathSegment::Key(key.clone());
                                    stack.push(Step::Enter(Some(segment), item));
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            Step::Leave(value, pushed) => {
                visitor.leave(&path, value);
                if pushed {
                    path.pop();
                }
            }
        }
    }

    WalkStatus::Completed
}
