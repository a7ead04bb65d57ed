//! Secondary indices over the entity tables.
//!
//! [`RelationIndex`] holds the eight relationship mappings of the graph as
//! four [`OneToMany`] pairs:
//!
//! | pair            | parent -> children | child -> parent |
//! |-----------------|--------------------|-----------------|
//! | `node_inlets`   | node -> inlets     | inlet -> owner  |
//! | `node_outlets`  | node -> outlets    | outlet -> owner |
//! | `outlet_edges`  | outlet -> edges    | edge -> source  |
//! | `inlet_edges`   | inlet -> edges     | edge -> target  |
//!
//! The index is only written by [`GraphStore`](crate::store::GraphStore), in the
//! same call that creates or deletes the rows involved, so it is never stale
//! between two store calls. Nothing here is derived by scanning the tables.
//!
//! Linking and owner lookups are O(1). Unlinking is O(n) in the parent's
//! child count: `shift_remove` keeps the remaining children in link order.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::id::{EdgeId, InletId, NodeId, OutletId, RawId};

/// A parent -> ordered children mapping with its child -> parent inverse.
#[derive(Debug, Clone)]
pub struct OneToMany<P, C> {
    children: HashMap<P, IndexSet<C>>,
    owners: HashMap<C, P>,
}

impl<P: RawId, C: RawId> OneToMany<P, C> {
    pub fn new() -> Self {
        OneToMany {
            children: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Registers `child` under `parent`, appending it to the parent's list.
    ///
    /// A child has at most one parent; linking it again moves it.
    pub fn link(&mut self, parent: P, child: C) {
        if let Some(previous) = self.owners.insert(child, parent) {
            if previous != parent {
                self.detach(previous, child);
            }
        }
        self.children.entry(parent).or_default().insert(child);
    }

    /// Removes `child` from `parent`. Returns `false` (and does nothing) if
    /// `child` is not linked under `parent`. Linear in the size of `parent`'s
    /// child set.
    pub fn unlink(&mut self, parent: P, child: C) -> bool {
        if self.owners.get(&child) != Some(&parent) {
            return false;
        }
        self.owners.remove(&child);
        self.detach(parent, child);
        true
    }

    fn detach(&mut self, parent: P, child: C) {
        if let Some(set) = self.children.get_mut(&parent) {
            set.shift_remove(&child);
            if set.is_empty() {
                self.children.remove(&parent);
            }
        }
    }

    /// Children of `parent` in link order. Empty for an unknown parent.
    pub fn children_of(&self, parent: P) -> impl Iterator<Item = C> + '_ {
        self.children
            .get(&parent)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Number of children linked under `parent`.
    pub fn child_count(&self, parent: P) -> usize {
        self.children.get(&parent).map_or(0, |set| set.len())
    }

    /// The parent `child` is linked under, if any.
    pub fn owner_of(&self, child: C) -> Option<P> {
        self.owners.get(&child).copied()
    }

    /// Number of linked children across all parents.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Every `(parent, child)` link.
    pub fn links(&self) -> impl Iterator<Item = (P, C)> + '_ {
        self.owners.iter().map(|(&child, &parent)| (parent, child))
    }

    /// Parents that currently have at least one child.
    pub fn parents(&self) -> impl Iterator<Item = P> + '_ {
        self.children.keys().copied()
    }
}

impl<P: RawId, C: RawId> Default for OneToMany<P, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// All relationship mappings of the graph.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    /// node -> inlets, inlet -> owner node.
    pub node_inlets: OneToMany<NodeId, InletId>,
    /// node -> outlets, outlet -> owner node.
    pub node_outlets: OneToMany<NodeId, OutletId>,
    /// outlet -> edges, edge -> source outlet.
    pub outlet_edges: OneToMany<OutletId, EdgeId>,
    /// inlet -> edges, edge -> target inlet.
    pub inlet_edges: OneToMany<InletId, EdgeId>,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }
}
