//! Per-node script fragments and their dirty state.
//!
//! The table mirrors the two node attributes that affect the composed
//! script. It is kept current from store events, so the composer never has
//! to diff the whole graph to learn what changed since the last compose.

use indexmap::{IndexMap, IndexSet};

use livegraph_core::{Node, NodeId, NodeKey};

/// The part of a node that ends up in the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub payload: String,
}

impl From<&Node> for Fragment {
    fn from(node: &Node) -> Self {
        Fragment {
            name: node.name.clone(),
            payload: node.payload.clone(),
        }
    }
}

/// What changed since the last compose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyState {
    /// Nodes added, or whose name or payload changed.
    pub changed: IndexSet<NodeId>,
    /// Nodes removed.
    pub removed: IndexSet<NodeId>,
    /// Set when the edge set changed, which can reorder the script.
    pub structural: bool,
}

impl DirtyState {
    /// Returns true if nothing changed.
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty() && !self.structural
    }
}

/// Side table `NodeId -> Fragment` with dirty tracking.
#[derive(Debug, Default)]
pub struct FragmentTable {
    fragments: IndexMap<NodeId, Fragment>,
    dirty: DirtyState,
}

impl FragmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<&Fragment> {
        self.fragments.get(&node)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn dirty(&self) -> &DirtyState {
        &self.dirty
    }

    /// Starts tracking `node`. A re-insert overwrites the old fragment.
    pub fn insert(&mut self, node: NodeId, fragment: Fragment) {
        self.fragments.insert(node, fragment);
        self.dirty.removed.shift_remove(&node);
        self.dirty.changed.insert(node);
    }

    /// Stops tracking `node`. Returns the fragment if it was tracked.
    pub fn remove(&mut self, node: NodeId) -> Option<Fragment> {
        let removed = self.fragments.shift_remove(&node)?;
        self.dirty.changed.shift_remove(&node);
        self.dirty.removed.insert(node);
        Some(removed)
    }

    /// Copies the listed keys from `source` into the tracked fragment.
    ///
    /// Layout keys are ignored. Returns true if the fragment was written.
    pub fn refresh(&mut self, node: NodeId, source: &Node, keys: &[NodeKey]) -> bool {
        let Some(fragment) = self.fragments.get_mut(&node) else {
            return false;
        };
        let mut written = false;
        for key in keys {
            match key {
                NodeKey::Name if fragment.name != source.name => {
                    fragment.name.clone_from(&source.name);
                    written = true;
                }
                NodeKey::Payload if fragment.payload != source.payload => {
                    fragment.payload.clone_from(&source.payload);
                    written = true;
                }
                _ => {}
            }
        }
        if written {
            self.dirty.changed.insert(node);
        }
        written
    }

    pub fn mark_structural(&mut self) {
        self.dirty.structural = true;
    }

    /// Resets dirty state, returning what it held.
    pub fn take_dirty(&mut self) -> DirtyState {
        std::mem::take(&mut self.dirty)
    }
}
