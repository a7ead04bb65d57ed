//! Turns the graph into one runnable script.
//!
//! A [`ScriptComposer`] subscribes to a [`GraphStore`] and keeps a
//! [`FragmentTable`] in step with it. [`ScriptComposer::compose`] then walks
//! the graph in execution order and concatenates fragments. Dirty state lets
//! a caller skip recomposing when nothing relevant changed.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use livegraph_core::algo::execution_order;
use livegraph_core::{Graph, GraphEvent, GraphStore, NodeId, SubscriptionId};

use crate::config::ComposerConfig;
use crate::error::ComposeError;
use crate::fragment::{DirtyState, Fragment, FragmentTable};

/// A composed script and the nodes it was built from, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub text: String,
    pub nodes: Vec<NodeId>,
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Applies one store event to the fragment table.
fn track(table: &mut FragmentTable, event: &GraphEvent, graph: &Graph) {
    match event {
        GraphEvent::NodesAdded(ids) => {
            for &id in ids {
                match graph.node(id) {
                    Ok(node) => table.insert(id, Fragment::from(node)),
                    Err(err) => {
                        tracing::warn!(node = %id, error = %err, "added node did not resolve")
                    }
                }
            }
        }
        GraphEvent::NodesAboutToBeRemoved(ids) => {
            for &id in ids {
                table.remove(id);
            }
        }
        GraphEvent::NodesPropertyChanged { ids, keys } => {
            for &id in ids {
                if let Ok(node) = graph.node(id) {
                    table.refresh(id, node, keys);
                }
            }
        }
        GraphEvent::EdgesAdded(_)
        | GraphEvent::EdgesRemoved(_)
        | GraphEvent::EdgesPropertyChanged { .. } => {
            table.mark_structural();
        }
        _ => {}
    }
}

/// Keeps per-node fragments in step with a store and composes them.
#[derive(Debug)]
pub struct ScriptComposer {
    table: Rc<RefCell<FragmentTable>>,
    subscription: Option<SubscriptionId>,
    config: ComposerConfig,
}

impl ScriptComposer {
    /// Subscribes to `store`, seeding fragments for the nodes it already has.
    ///
    /// The callback only holds a weak handle to the fragment table, so
    /// dropping the composer frees the table and the callback turns into a
    /// no-op. The callback itself stays registered until [`detach`](Self::detach).
    pub fn attach(store: &mut GraphStore, config: ComposerConfig) -> Self {
        let mut table = FragmentTable::new();
        for (id, node) in store.graph().nodes() {
            table.insert(id, Fragment::from(node));
        }
        if store.graph().edge_count() > 0 {
            table.mark_structural();
        }
        tracing::debug!(nodes = table.len(), "attaching script composer");

        let table = Rc::new(RefCell::new(table));
        let sink: Weak<RefCell<FragmentTable>> = Rc::downgrade(&table);
        let subscription = store.subscribe(move |event, graph| {
            if let Some(table) = sink.upgrade() {
                track(&mut table.borrow_mut(), event, graph);
            }
        });

        ScriptComposer {
            table,
            subscription: Some(subscription),
            config,
        }
    }

    /// Unsubscribes from `store`. Fragments stay readable but no longer
    /// follow the graph. Returns false if already detached.
    pub fn detach(&mut self, store: &mut GraphStore) -> bool {
        match self.subscription.take() {
            Some(id) => {
                tracing::debug!("detaching script composer");
                store.unsubscribe(id)
            }
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// True if anything that affects the script changed since the last
    /// successful compose.
    pub fn is_dirty(&self) -> bool {
        !self.table.borrow().dirty().is_clean()
    }

    /// Nodes whose fragment was added or rewritten since the last compose.
    pub fn dirty_nodes(&self) -> Vec<NodeId> {
        self.table.borrow().dirty().changed.iter().copied().collect()
    }

    /// Snapshot of the pending dirty state.
    pub fn dirty_state(&self) -> DirtyState {
        self.table.borrow().dirty().clone()
    }

    pub fn fragment(&self, node: NodeId) -> Option<Fragment> {
        self.table.borrow().get(node).cloned()
    }

    /// Renders every node's fragment in execution order and clears dirty
    /// state. On error the dirty state is left untouched.
    pub fn compose(&self, graph: &Graph) -> Result<Script, ComposeError> {
        let order = execution_order(graph)?;
        let mut table = self.table.borrow_mut();

        let mut script = Script::default();
        for node in order {
            let fragment = table
                .get(node)
                .ok_or(ComposeError::MissingFragment { node })?;
            if self.config.skip_empty && fragment.payload.trim().is_empty() {
                continue;
            }
            if self.config.header {
                script.text.push_str("# ");
                script.text.push_str(&fragment.name);
                script.text.push('\n');
            }
            script.text.push_str(&fragment.payload);
            if !fragment.payload.ends_with('\n') {
                script.text.push('\n');
            }
            script.nodes.push(node);
        }

        let cleared = table.take_dirty();
        tracing::debug!(
            nodes = script.nodes.len(),
            changed = cleared.changed.len(),
            removed = cleared.removed.len(),
            structural = cleared.structural,
            "composed script"
        );
        Ok(script)
    }
}
