use embody_path::Path;
use indexmap::IndexMap;

use crate::{EmbodyError, NodeId};

/// Tracks which containers are being embodied on the current branch.
///
/// The set is scoped to the path from the root: a node is added on entry and
/// removed on exit. The same node reached again through a sibling branch is fine;
/// reached again below itself, it is a cycle.
#[derive(Debug, Default)]
pub struct CycleDetector {
    /// Active node to the length of the path it was entered at.
    active: IndexMap<NodeId, usize>,
}

impl CycleDetector {
    /// An empty detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `node` as entered at `path`.
    ///
    /// Fails if `node` is already active; the error names `path` and the prefix of
    /// `path` where the node was first entered.
    pub fn enter(&mut self, node: NodeId, path: &Path) -> Result<(), EmbodyError> {
        if let Some(&depth) = self.active.get(&node) {
            return Err(EmbodyError::Cycle {
                path: path.clone(),
                ancestor: path.segments()[..depth].iter().cloned().collect(),
            });
        }
        self.active.insert(node, path.len());
        Ok(())
    }

    /// Marks `node` as finished.
    pub fn leave(&mut self, node: NodeId) {
        self.active.swap_remove(&node);
    }

    /// Returns `true` if `node` is on the current branch.
    pub fn is_active(&self, node: NodeId) -> bool {
        self.active.contains_key(&node)
    }

    /// Number of containers on the current branch.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` outside of any container.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
