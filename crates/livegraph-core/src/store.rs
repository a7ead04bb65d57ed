//! GraphStore: the single write path into the graph.
//!
//! [`GraphStore`] wraps a [`Graph`] and its [`ChangeNotifier`]. Every mutation
//! validates referenced ids before touching a table, updates the tables and
//! the relation index together, and only then publishes events, so a
//! subscriber never observes a half-applied change.
//!
//! # Cascade
//!
//! Ports depend on nodes and edges depend on ports. Removing a node removes
//! its inlets and outlets first, and removing a port removes its incident
//! edges first. For `remove_nodes` the events arrive in this order:
//!
//! ```text
//! InletsAboutToBeRemoved
//!     EdgesAboutToBeRemoved, EdgesRemoved     (edges into those inlets)
//! InletsRemoved
//! OutletsAboutToBeRemoved
//!     EdgesAboutToBeRemoved, EdgesRemoved     (edges out of those outlets)
//! OutletsRemoved
//! NodesAboutToBeRemoved
//! NodesRemoved
//! ```
//!
//! Bulk removals ignore ids that do not exist, so overlapping removal requests
//! are harmless. Everything the cascade discovers is collected from the
//! relation index before the rows it belongs to are deleted.

use indexmap::IndexSet;

use crate::config::StoreConfig;
use crate::edge::{Edge, EdgeKey, EdgePatch};
use crate::error::GraphError;
use crate::event::{ChangeNotifier, GraphEvent, SubscriptionId};
use crate::graph::Graph;
use crate::id::{EdgeId, InletId, NodeId, OutletId};
use crate::node::{Node, NodeKey, NodePatch};
use crate::port::{Inlet, Outlet, PortKey, PortPatch};
use crate::record::ChangedKeys;

/// Keeps the ids that pass `exists`, dropping duplicates but keeping order.
fn existing<I, F>(ids: impl IntoIterator<Item = I>, exists: F) -> Vec<I>
where
    I: std::hash::Hash + Eq + Copy,
    F: Fn(I) -> bool,
{
    ids.into_iter()
        .filter(|&id| exists(id))
        .collect::<IndexSet<I>>()
        .into_iter()
        .collect()
}

/// The graph store: tables, relation index and subscribers behind one API.
#[derive(Debug)]
pub struct GraphStore {
    graph: Graph,
    notifier: ChangeNotifier,
    config: StoreConfig,
}

impl GraphStore {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        GraphStore {
            graph: Graph::new(),
            notifier: ChangeNotifier::new(config.trace_events),
            config,
        }
    }

    /// Read-only view of the graph. All queries go through here.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Registers a change subscriber. See [`crate::event`] for timing.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent, &Graph) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn emit(&mut self, event: GraphEvent) {
        self.notifier.emit(event, &self.graph);
    }

    /// Runs the full integrity check when configured to.
    fn check_integrity(&self) {
        if !self.config.check_integrity {
            return;
        }
        if let Err(err) = self.graph.validate() {
            tracing::error!(error = %err, "graph integrity check failed");
            panic!("graph integrity violated: {err}");
        }
    }

    // -----------------------------------------------------------------------
    // Factories
    // -----------------------------------------------------------------------

    /// Adds a node. Always succeeds.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        posx: i64,
        posy: i64,
        payload: impl Into<String>,
    ) -> NodeId {
        let id = self.graph.nodes.create(Node::new(name, posx, posy, payload));
        tracing::debug!(node = %id, "added node");
        self.emit(GraphEvent::NodesAdded(vec![id]));
        self.check_integrity();
        id
    }

    /// Adds an inlet to `node`.
    ///
    /// Returns [`GraphError::InvalidReference`] if `node` does not exist.
    pub fn add_inlet(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
    ) -> Result<InletId, GraphError> {
        if !self.graph.nodes.exists(node) {
            return Err(GraphError::InvalidReference(node.into()));
        }
        let id = self.graph.inlets.create(Inlet::new(node, name));
        self.graph.index.node_inlets.link(node, id);
        tracing::debug!(inlet = %id, node = %node, "added inlet");
        self.emit(GraphEvent::InletsAdded(vec![id]));
        self.check_integrity();
        Ok(id)
    }

    /// Adds an outlet to `node`.
    ///
    /// Returns [`GraphError::InvalidReference`] if `node` does not exist.
    pub fn add_outlet(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
    ) -> Result<OutletId, GraphError> {
        if !self.graph.nodes.exists(node) {
            return Err(GraphError::InvalidReference(node.into()));
        }
        let id = self.graph.outlets.create(Outlet::new(node, name));
        self.graph.index.node_outlets.link(node, id);
        tracing::debug!(outlet = %id, node = %node, "added outlet");
        self.emit(GraphEvent::OutletsAdded(vec![id]));
        self.check_integrity();
        Ok(id)
    }

    /// Connects `source` to `target`. Parallel edges are allowed.
    ///
    /// Returns [`GraphError::InvalidReference`] naming the first endpoint
    /// that does not exist; no edge is created in that case.
    pub fn add_edge(&mut self, source: OutletId, target: InletId) -> Result<EdgeId, GraphError> {
        if !self.graph.outlets.exists(source) {
            return Err(GraphError::InvalidReference(source.into()));
        }
        if !self.graph.inlets.exists(target) {
            return Err(GraphError::InvalidReference(target.into()));
        }
        let id = self.graph.edges.create(Edge::new(source, target));
        self.graph.index.outlet_edges.link(source, id);
        self.graph.index.inlet_edges.link(target, id);
        tracing::debug!(edge = %id, source = %source, target = %target, "added edge");
        self.emit(GraphEvent::EdgesAdded(vec![id]));
        self.check_integrity();
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Cascade removal
    // -----------------------------------------------------------------------

    /// Removes nodes together with their ports and every incident edge.
    /// Unknown ids are ignored.
    pub fn remove_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let ids = existing(ids, |id| self.graph.nodes.exists(id));
        if ids.is_empty() {
            return;
        }

        let inlets: Vec<InletId> = ids
            .iter()
            .flat_map(|&node| self.graph.index.node_inlets.children_of(node))
            .collect();
        let (inlet_count, inlet_edges) = self.remove_inlets_inner(inlets);

        let outlets: Vec<OutletId> = ids
            .iter()
            .flat_map(|&node| self.graph.index.node_outlets.children_of(node))
            .collect();
        let (outlet_count, outlet_edges) = self.remove_outlets_inner(outlets);

        self.emit(GraphEvent::NodesAboutToBeRemoved(ids.clone()));
        for &id in &ids {
            self.graph
                .nodes
                .delete(id)
                .expect("node collected from the table exists");
        }
        tracing::debug!(
            nodes = ids.len(),
            inlets = inlet_count,
            outlets = outlet_count,
            edges = inlet_edges + outlet_edges,
            "removed nodes"
        );
        self.emit(GraphEvent::NodesRemoved(ids));
        self.check_integrity();
    }

    /// Removes inlets and the edges arriving at them. Unknown ids are ignored.
    pub fn remove_inlets(&mut self, ids: impl IntoIterator<Item = InletId>) {
        let ids = existing(ids, |id| self.graph.inlets.exists(id));
        let (count, edges) = self.remove_inlets_inner(ids);
        if count > 0 {
            tracing::debug!(inlets = count, edges, "removed inlets");
            self.check_integrity();
        }
    }

    /// Removes outlets and the edges leaving them. Unknown ids are ignored.
    pub fn remove_outlets(&mut self, ids: impl IntoIterator<Item = OutletId>) {
        let ids = existing(ids, |id| self.graph.outlets.exists(id));
        let (count, edges) = self.remove_outlets_inner(ids);
        if count > 0 {
            tracing::debug!(outlets = count, edges, "removed outlets");
            self.check_integrity();
        }
    }

    /// Removes edges. No further cascade. Unknown ids are ignored.
    pub fn remove_edges(&mut self, ids: impl IntoIterator<Item = EdgeId>) {
        let ids = existing(ids, |id| self.graph.edges.exists(id));
        let count = self.remove_edges_inner(ids);
        if count > 0 {
            tracing::debug!(edges = count, "removed edges");
            self.check_integrity();
        }
    }

    /// `ids` must be existing, distinct inlets. Returns (inlets, edges) removed.
    fn remove_inlets_inner(&mut self, ids: Vec<InletId>) -> (usize, usize) {
        if ids.is_empty() {
            return (0, 0);
        }
        self.emit(GraphEvent::InletsAboutToBeRemoved(ids.clone()));

        let edges: Vec<EdgeId> = ids
            .iter()
            .flat_map(|&inlet| self.graph.index.inlet_edges.children_of(inlet))
            .collect();
        let edge_count = self.remove_edges_inner(edges);

        for &id in &ids {
            let inlet = self
                .graph
                .inlets
                .delete(id)
                .expect("inlet collected from the table exists");
            self.graph.index.node_inlets.unlink(inlet.owner(), id);
        }
        let count = ids.len();
        self.emit(GraphEvent::InletsRemoved(ids));
        (count, edge_count)
    }

    /// `ids` must be existing, distinct outlets. Returns (outlets, edges) removed.
    fn remove_outlets_inner(&mut self, ids: Vec<OutletId>) -> (usize, usize) {
        if ids.is_empty() {
            return (0, 0);
        }
        self.emit(GraphEvent::OutletsAboutToBeRemoved(ids.clone()));

        let edges: Vec<EdgeId> = ids
            .iter()
            .flat_map(|&outlet| self.graph.index.outlet_edges.children_of(outlet))
            .collect();
        let edge_count = self.remove_edges_inner(edges);

        for &id in &ids {
            let outlet = self
                .graph
                .outlets
                .delete(id)
                .expect("outlet collected from the table exists");
            self.graph.index.node_outlets.unlink(outlet.owner(), id);
        }
        let count = ids.len();
        self.emit(GraphEvent::OutletsRemoved(ids));
        (count, edge_count)
    }

    /// `ids` must be existing, distinct edges. Returns the number removed.
    fn remove_edges_inner(&mut self, ids: Vec<EdgeId>) -> usize {
        if ids.is_empty() {
            return 0;
        }
        self.emit(GraphEvent::EdgesAboutToBeRemoved(ids.clone()));
        for &id in &ids {
            let edge = self
                .graph
                .edges
                .delete(id)
                .expect("edge collected from the index exists");
            self.graph.index.outlet_edges.unlink(edge.source(), id);
            self.graph.index.inlet_edges.unlink(edge.target(), id);
        }
        let count = ids.len();
        self.emit(GraphEvent::EdgesRemoved(ids));
        count
    }

    // -----------------------------------------------------------------------
    // Property setters
    // -----------------------------------------------------------------------

    /// Patches a node. Fires `NodesPropertyChanged` with the written keys,
    /// or nothing if no value changed.
    pub fn set_node_props(
        &mut self,
        id: NodeId,
        patch: NodePatch,
    ) -> Result<ChangedKeys<NodeKey>, GraphError> {
        let changed = self.graph.nodes.set(id, patch)?;
        if !changed.is_empty() {
            tracing::debug!(node = %id, keys = ?changed, "node changed");
            self.emit(GraphEvent::NodesPropertyChanged {
                ids: vec![id],
                keys: changed.to_vec(),
            });
        }
        Ok(changed)
    }

    /// Renames an inlet.
    pub fn set_inlet_props(
        &mut self,
        id: InletId,
        patch: PortPatch,
    ) -> Result<ChangedKeys<PortKey>, GraphError> {
        let changed = self.graph.inlets.set(id, patch)?;
        if !changed.is_empty() {
            tracing::debug!(inlet = %id, keys = ?changed, "inlet changed");
            self.emit(GraphEvent::InletsPropertyChanged {
                ids: vec![id],
                keys: changed.to_vec(),
            });
        }
        Ok(changed)
    }

    /// Renames an outlet.
    pub fn set_outlet_props(
        &mut self,
        id: OutletId,
        patch: PortPatch,
    ) -> Result<ChangedKeys<PortKey>, GraphError> {
        let changed = self.graph.outlets.set(id, patch)?;
        if !changed.is_empty() {
            tracing::debug!(outlet = %id, keys = ?changed, "outlet changed");
            self.emit(GraphEvent::OutletsPropertyChanged {
                ids: vec![id],
                keys: changed.to_vec(),
            });
        }
        Ok(changed)
    }

    /// Re-points an edge to a different source and/or target port.
    ///
    /// Returns [`GraphError::NotFound`] for an unknown edge and
    /// [`GraphError::InvalidReference`] for an unknown port; the edge is left
    /// untouched in both cases.
    pub fn set_edge_props(
        &mut self,
        id: EdgeId,
        patch: EdgePatch,
    ) -> Result<ChangedKeys<EdgeKey>, GraphError> {
        let before = self.graph.edges.get(id)?.clone();
        if let Some(source) = patch.source {
            if !self.graph.outlets.exists(source) {
                return Err(GraphError::InvalidReference(source.into()));
            }
        }
        if let Some(target) = patch.target {
            if !self.graph.inlets.exists(target) {
                return Err(GraphError::InvalidReference(target.into()));
            }
        }

        let changed = self.graph.edges.set(id, patch)?;
        if changed.is_empty() {
            return Ok(changed);
        }

        let after = self.graph.edges.get(id)?.clone();
        for key in &changed {
            match key {
                EdgeKey::Source => {
                    self.graph.index.outlet_edges.unlink(before.source(), id);
                    self.graph.index.outlet_edges.link(after.source(), id);
                }
                EdgeKey::Target => {
                    self.graph.index.inlet_edges.unlink(before.target(), id);
                    self.graph.index.inlet_edges.link(after.target(), id);
                }
            }
        }
        tracing::debug!(
            edge = %id,
            source = %after.source(),
            target = %after.target(),
            "edge re-pointed"
        );
        self.emit(GraphEvent::EdgesPropertyChanged {
            ids: vec![id],
            keys: changed.to_vec(),
        });
        self.check_integrity();
        Ok(changed)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::event::EventPhase;
    use crate::id::{EntityId, EntityKind};

    fn recording_store() -> (GraphStore, Rc<RefCell<Vec<GraphEvent>>>) {
        let mut store = GraphStore::with_config(StoreConfig {
            check_integrity: true,
            trace_events: false,
        });
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        store.subscribe(move |ev, _| sink.borrow_mut().push(ev.clone()));
        (store, log)
    }

    #[test]
    fn add_node_fires_added() {
        let (mut store, log) = recording_store();
        let id = store.add_node("osc", 10, 20, "sin(t)");
        assert_eq!(*log.borrow(), vec![GraphEvent::NodesAdded(vec![id])]);
        assert_eq!(store.graph().node(id).unwrap().name, "osc");
    }

    #[test]
    fn add_port_to_unknown_node_is_rejected() {
        let (mut store, log) = recording_store();
        let err = store.add_inlet(NodeId(99), "in").unwrap_err();
        assert!(matches!(err, GraphError::InvalidReference(_)));
        assert!(store.add_outlet(NodeId(99), "out").is_err());
        assert_eq!(store.graph().inlet_count(), 0);
        assert_eq!(store.graph().outlet_count(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn ports_are_linked_in_creation_order() {
        let (mut store, _) = recording_store();
        let n = store.add_node("n", 0, 0, "");
        let a = store.add_inlet(n, "a").unwrap();
        let b = store.add_inlet(n, "b").unwrap();
        let o = store.add_outlet(n, "o").unwrap();
        let inlets: Vec<_> = store.graph().node_inlets(n).unwrap().collect();
        assert_eq!(inlets, vec![a, b]);
        assert_eq!(store.graph().inlet_owner(b).unwrap(), n);
        assert_eq!(store.graph().outlet_owner(o).unwrap(), n);
    }

    #[test]
    fn add_edge_links_both_endpoints() {
        let (mut store, _) = recording_store();
        let a = store.add_node("a", 0, 0, "");
        let b = store.add_node("b", 0, 0, "");
        let out = store.add_outlet(a, "out").unwrap();
        let inp = store.add_inlet(b, "in").unwrap();
        let e = store.add_edge(out, inp).unwrap();

        let g = store.graph();
        assert_eq!(g.edge_source(e).unwrap(), out);
        assert_eq!(g.edge_target(e).unwrap(), inp);
        assert_eq!(g.outlet_edges(out).unwrap().collect::<Vec<_>>(), vec![e]);
        assert_eq!(g.inlet_edges(inp).unwrap().collect::<Vec<_>>(), vec![e]);
        assert_eq!(g.source_nodes(b).unwrap().collect::<Vec<_>>(), vec![a]);
        assert_eq!(g.target_nodes(a).unwrap().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn add_edge_with_unknown_endpoint_leaves_store_unchanged() {
        let (mut store, log) = recording_store();
        let n = store.add_node("n", 0, 0, "");
        let inp = store.add_inlet(n, "in").unwrap();
        let out = store.add_outlet(n, "out").unwrap();
        log.borrow_mut().clear();

        let err = store.add_edge(OutletId(500), inp).unwrap_err();
        let missing_outlet = EntityId::from(OutletId(500));
        assert!(matches!(err, GraphError::InvalidReference(id) if id == missing_outlet));
        let err = store.add_edge(out, InletId(500)).unwrap_err();
        let missing_inlet = EntityId::from(InletId(500));
        assert!(matches!(err, GraphError::InvalidReference(id) if id == missing_inlet));

        assert_eq!(store.graph().edge_count(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn parallel_edges_yield_duplicate_sources() {
        let (mut store, _) = recording_store();
        let a = store.add_node("a", 0, 0, "");
        let b = store.add_node("b", 0, 0, "");
        let out = store.add_outlet(a, "out").unwrap();
        let in1 = store.add_inlet(b, "x").unwrap();
        let in2 = store.add_inlet(b, "y").unwrap();
        store.add_edge(out, in1).unwrap();
        store.add_edge(out, in2).unwrap();
        let sources: Vec<_> = store.graph().source_nodes(b).unwrap().collect();
        assert_eq!(sources, vec![a, a]);
    }

    #[test]
    fn remove_edges_does_not_cascade() {
        let (mut store, log) = recording_store();
        let a = store.add_node("a", 0, 0, "");
        let out = store.add_outlet(a, "out").unwrap();
        let inp = store.add_inlet(a, "in").unwrap();
        let e = store.add_edge(out, inp).unwrap();
        log.borrow_mut().clear();

        store.remove_edges([e, e, EdgeId(77)]);
        assert_eq!(
            *log.borrow(),
            vec![
                GraphEvent::EdgesAboutToBeRemoved(vec![e]),
                GraphEvent::EdgesRemoved(vec![e]),
            ]
        );
        assert!(store.graph().contains_inlet(inp));
        assert!(store.graph().contains_outlet(out));
        assert_eq!(store.graph().outlet_edges(out).unwrap().count(), 0);
    }

    #[test]
    fn remove_inlets_cascades_edges_first() {
        let (mut store, log) = recording_store();
        let a = store.add_node("a", 0, 0, "");
        let b = store.add_node("b", 0, 0, "");
        let out = store.add_outlet(a, "out").unwrap();
        let inp = store.add_inlet(b, "in").unwrap();
        let e = store.add_edge(out, inp).unwrap();
        log.borrow_mut().clear();

        store.remove_inlets([inp]);
        assert_eq!(
            *log.borrow(),
            vec![
                GraphEvent::InletsAboutToBeRemoved(vec![inp]),
                GraphEvent::EdgesAboutToBeRemoved(vec![e]),
                GraphEvent::EdgesRemoved(vec![e]),
                GraphEvent::InletsRemoved(vec![inp]),
            ]
        );
        assert_eq!(store.graph().node_inlets(b).unwrap().count(), 0);
        assert_eq!(store.graph().outlet_edges(out).unwrap().count(), 0);
    }

    #[test]
    fn remove_nodes_event_order() {
        let (mut store, log) = recording_store();
        let up = store.add_node("up", 0, 0, "");
        let n = store.add_node("n", 0, 0, "");
        let down = store.add_node("down", 0, 0, "");
        let up_out = store.add_outlet(up, "out").unwrap();
        let n_in = store.add_inlet(n, "in").unwrap();
        let n_out = store.add_outlet(n, "out").unwrap();
        let down_in = store.add_inlet(down, "in").unwrap();
        let e_in = store.add_edge(up_out, n_in).unwrap();
        let e_out = store.add_edge(n_out, down_in).unwrap();
        log.borrow_mut().clear();

        store.remove_nodes([n]);
        assert_eq!(
            *log.borrow(),
            vec![
                GraphEvent::InletsAboutToBeRemoved(vec![n_in]),
                GraphEvent::EdgesAboutToBeRemoved(vec![e_in]),
                GraphEvent::EdgesRemoved(vec![e_in]),
                GraphEvent::InletsRemoved(vec![n_in]),
                GraphEvent::OutletsAboutToBeRemoved(vec![n_out]),
                GraphEvent::EdgesAboutToBeRemoved(vec![e_out]),
                GraphEvent::EdgesRemoved(vec![e_out]),
                GraphEvent::OutletsRemoved(vec![n_out]),
                GraphEvent::NodesAboutToBeRemoved(vec![n]),
                GraphEvent::NodesRemoved(vec![n]),
            ]
        );
    }

    #[test]
    fn remove_node_without_ports_fires_only_node_events() {
        let (mut store, log) = recording_store();
        let n = store.add_node("n", 0, 0, "");
        log.borrow_mut().clear();
        store.remove_nodes([n]);
        let kinds: Vec<_> = log
            .borrow()
            .iter()
            .map(|ev| (ev.kind(), ev.phase()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (EntityKind::Node, EventPhase::AboutToBeRemoved),
                (EntityKind::Node, EventPhase::Removed),
            ]
        );
    }

    #[test]
    fn self_loop_is_removed_once() {
        let (mut store, log) = recording_store();
        let n = store.add_node("n", 0, 0, "");
        let out = store.add_outlet(n, "out").unwrap();
        let inp = store.add_inlet(n, "in").unwrap();
        let e = store.add_edge(out, inp).unwrap();
        log.borrow_mut().clear();

        store.remove_nodes([n]);
        let removed_edges: Vec<_> = log
            .borrow()
            .iter()
            .filter(|ev| matches!(ev, GraphEvent::EdgesRemoved(_)))
            .cloned()
            .collect();
        assert_eq!(removed_edges, vec![GraphEvent::EdgesRemoved(vec![e])]);
        assert_eq!(store.graph().edge_count(), 0);
    }

    #[test]
    fn about_to_be_removed_still_resolves() {
        let mut store = GraphStore::new();
        let n = store.add_node("n", 0, 0, "");
        let inp = store.add_inlet(n, "in").unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |ev, graph| match ev {
            GraphEvent::InletsAboutToBeRemoved(ids) => {
                for &id in ids {
                    sink.borrow_mut().push(graph.inlet_owner(id).ok());
                }
            }
            GraphEvent::NodesAboutToBeRemoved(ids) => {
                for &id in ids {
                    assert!(graph.contains_node(id));
                }
            }
            GraphEvent::NodesRemoved(ids) => {
                for &id in ids {
                    assert!(!graph.contains_node(id));
                }
            }
            _ => {}
        });

        store.remove_nodes([n]);
        assert_eq!(*seen.borrow(), vec![Some(n)]);
        assert!(!store.graph().contains_inlet(inp));
    }

    #[test]
    fn unchanged_property_write_is_silent() {
        let (mut store, log) = recording_store();
        let n = store.add_node("osc", 0, 0, "sin(t)");
        log.borrow_mut().clear();

        let changed = store
            .set_node_props(n, NodePatch::new().name("osc"))
            .unwrap();
        assert!(changed.is_empty());
        assert!(log.borrow().is_empty());

        let changed = store
            .set_node_props(n, NodePatch::new().name("osc").payload("cos(t)"))
            .unwrap();
        assert_eq!(changed.as_slice(), &[NodeKey::Payload]);
        assert_eq!(
            *log.borrow(),
            vec![GraphEvent::NodesPropertyChanged {
                ids: vec![n],
                keys: vec![NodeKey::Payload],
            }]
        );
    }

    #[test]
    fn set_props_on_unknown_id_is_not_found() {
        let (mut store, _) = recording_store();
        assert!(matches!(
            store.set_node_props(NodeId(3), NodePatch::new().name("x")),
            Err(GraphError::NotFound(_))
        ));
        assert!(matches!(
            store.set_inlet_props(InletId(3), PortPatch::name("x")),
            Err(GraphError::NotFound(_))
        ));
        assert!(matches!(
            store.set_edge_props(EdgeId(3), EdgePatch::new()),
            Err(GraphError::NotFound(_))
        ));
    }

    #[test]
    fn rename_ports() {
        let (mut store, log) = recording_store();
        let n = store.add_node("n", 0, 0, "");
        let inp = store.add_inlet(n, "in").unwrap();
        let out = store.add_outlet(n, "out").unwrap();
        log.borrow_mut().clear();

        store.set_inlet_props(inp, PortPatch::name("freq")).unwrap();
        store.set_outlet_props(out, PortPatch::name("out")).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![GraphEvent::InletsPropertyChanged {
                ids: vec![inp],
                keys: vec![PortKey::Name],
            }]
        );
        assert_eq!(store.graph().inlet(inp).unwrap().name, "freq");
    }

    #[test]
    fn repoint_edge_relinks_index() {
        let (mut store, log) = recording_store();
        let a = store.add_node("a", 0, 0, "");
        let b = store.add_node("b", 0, 0, "");
        let c = store.add_node("c", 0, 0, "");
        let out = store.add_outlet(a, "out").unwrap();
        let b_in = store.add_inlet(b, "in").unwrap();
        let c_in = store.add_inlet(c, "in").unwrap();
        let e = store.add_edge(out, b_in).unwrap();
        log.borrow_mut().clear();

        let changed = store
            .set_edge_props(e, EdgePatch::new().target(c_in))
            .unwrap();
        assert_eq!(changed.as_slice(), &[EdgeKey::Target]);

        let g = store.graph();
        assert_eq!(g.edge_target(e).unwrap(), c_in);
        assert_eq!(g.inlet_edges(b_in).unwrap().count(), 0);
        assert_eq!(g.inlet_edges(c_in).unwrap().collect::<Vec<_>>(), vec![e]);
        assert_eq!(g.target_nodes(a).unwrap().collect::<Vec<_>>(), vec![c]);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn repoint_to_unknown_port_is_rejected() {
        let (mut store, log) = recording_store();
        let a = store.add_node("a", 0, 0, "");
        let out = store.add_outlet(a, "out").unwrap();
        let inp = store.add_inlet(a, "in").unwrap();
        let e = store.add_edge(out, inp).unwrap();
        log.borrow_mut().clear();

        let err = store
            .set_edge_props(e, EdgePatch::new().source(OutletId(404)))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidReference(_)));
        assert_eq!(store.graph().edge_source(e).unwrap(), out);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn repoint_to_same_port_is_silent() {
        let (mut store, log) = recording_store();
        let a = store.add_node("a", 0, 0, "");
        let out = store.add_outlet(a, "out").unwrap();
        let inp = store.add_inlet(a, "in").unwrap();
        let e = store.add_edge(out, inp).unwrap();
        log.borrow_mut().clear();

        let changed = store
            .set_edge_props(e, EdgePatch::new().source(out).target(inp))
            .unwrap();
        assert!(changed.is_empty());
        assert!(log.borrow().is_empty());
    }
}
