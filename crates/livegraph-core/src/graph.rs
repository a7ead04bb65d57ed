//! Graph: the read side of the store.
//!
//! [`Graph`] owns the four entity tables and the [`RelationIndex`] that ties
//! them together. It exposes only reads; every write goes through
//! [`GraphStore`](crate::store::GraphStore), which keeps the tables and the
//! index in step and publishes change events. Subscribers and the algorithms
//! in [`algo`](crate::algo) see the graph through `&Graph`.
//!
//! Relationship queries never scan the tables: they read the relation index
//! directly. An unknown id on any query is a caller bug and is reported as
//! [`GraphError::NotFound`].

use crate::edge::{Edge, EdgeKey};
use crate::error::GraphError;
use crate::id::{EdgeId, InletId, NodeId, OutletId};
use crate::node::{Node, NodeKey};
use crate::port::{Inlet, Outlet, PortKey};
use crate::record::AttrValue;
use crate::relation::RelationIndex;
use crate::table::EntityTable;

/// Tables plus relation index.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: EntityTable<Node>,
    pub(crate) inlets: EntityTable<Inlet>,
    pub(crate) outlets: EntityTable<Outlet>,
    pub(crate) edges: EntityTable<Edge>,
    pub(crate) index: RelationIndex,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Record accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(id)
    }

    pub fn inlet(&self, id: InletId) -> Result<&Inlet, GraphError> {
        self.inlets.get(id)
    }

    pub fn outlet(&self, id: OutletId) -> Result<&Outlet, GraphError> {
        self.outlets.get(id)
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        self.edges.get(id)
    }

    pub fn node_attr(&self, id: NodeId, key: NodeKey) -> Result<AttrValue, GraphError> {
        self.nodes.attr(id, key)
    }

    pub fn inlet_attr(&self, id: InletId, key: PortKey) -> Result<AttrValue, GraphError> {
        self.inlets.attr(id, key)
    }

    pub fn outlet_attr(&self, id: OutletId, key: PortKey) -> Result<AttrValue, GraphError> {
        self.outlets.attr(id, key)
    }

    pub fn edge_attr(&self, id: EdgeId, key: EdgeKey) -> Result<AttrValue, GraphError> {
        self.edges.attr(id, key)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.exists(id)
    }

    pub fn contains_inlet(&self, id: InletId) -> bool {
        self.inlets.exists(id)
    }

    pub fn contains_outlet(&self, id: OutletId) -> bool {
        self.outlets.exists(id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.exists(id)
    }

    // -----------------------------------------------------------------------
    // Iteration and counts
    // -----------------------------------------------------------------------

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.ids()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter()
    }

    pub fn inlet_ids(&self) -> impl Iterator<Item = InletId> + '_ {
        self.inlets.ids()
    }

    pub fn outlet_ids(&self) -> impl Iterator<Item = OutletId> + '_ {
        self.outlets.ids()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.ids()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn inlet_count(&self) -> usize {
        self.inlets.len()
    }

    pub fn outlet_count(&self) -> usize {
        self.outlets.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Read-only view of the relation index.
    pub fn index(&self) -> &RelationIndex {
        &self.index
    }

    // -----------------------------------------------------------------------
    // Relationship queries
    // -----------------------------------------------------------------------

    /// Inlets of `node`, in creation order.
    pub fn node_inlets(
        &self,
        node: NodeId,
    ) -> Result<impl Iterator<Item = InletId> + '_, GraphError> {
        self.nodes.get(node)?;
        Ok(self.index.node_inlets.children_of(node))
    }

    /// Outlets of `node`, in creation order.
    pub fn node_outlets(
        &self,
        node: NodeId,
    ) -> Result<impl Iterator<Item = OutletId> + '_, GraphError> {
        self.nodes.get(node)?;
        Ok(self.index.node_outlets.children_of(node))
    }

    /// Edges leaving `outlet`.
    pub fn outlet_edges(
        &self,
        outlet: OutletId,
    ) -> Result<impl Iterator<Item = EdgeId> + '_, GraphError> {
        self.outlets.get(outlet)?;
        Ok(self.index.outlet_edges.children_of(outlet))
    }

    /// Edges arriving at `inlet`.
    pub fn inlet_edges(
        &self,
        inlet: InletId,
    ) -> Result<impl Iterator<Item = EdgeId> + '_, GraphError> {
        self.inlets.get(inlet)?;
        Ok(self.index.inlet_edges.children_of(inlet))
    }

    pub fn edge_source(&self, edge: EdgeId) -> Result<OutletId, GraphError> {
        self.index
            .outlet_edges
            .owner_of(edge)
            .ok_or(GraphError::NotFound(edge.into()))
    }

    pub fn edge_target(&self, edge: EdgeId) -> Result<InletId, GraphError> {
        self.index
            .inlet_edges
            .owner_of(edge)
            .ok_or(GraphError::NotFound(edge.into()))
    }

    pub fn inlet_owner(&self, inlet: InletId) -> Result<NodeId, GraphError> {
        self.index
            .node_inlets
            .owner_of(inlet)
            .ok_or(GraphError::NotFound(inlet.into()))
    }

    pub fn outlet_owner(&self, outlet: OutletId) -> Result<NodeId, GraphError> {
        self.index
            .node_outlets
            .owner_of(outlet)
            .ok_or(GraphError::NotFound(outlet.into()))
    }

    /// Nodes feeding `node`: inlet -> edges -> source outlet -> owner.
    ///
    /// One item per incoming edge, so a node connected twice appears twice.
    pub fn source_nodes(
        &self,
        node: NodeId,
    ) -> Result<impl Iterator<Item = NodeId> + '_, GraphError> {
        self.nodes.get(node)?;
        let index = &self.index;
        Ok(index
            .node_inlets
            .children_of(node)
            .flat_map(move |inlet| index.inlet_edges.children_of(inlet))
            .map(move |edge| {
                let outlet = index
                    .outlet_edges
                    .owner_of(edge)
                    .expect("linked edge has a source outlet");
                index
                    .node_outlets
                    .owner_of(outlet)
                    .expect("linked outlet has an owner node")
            }))
    }

    /// Nodes fed by `node`: outlet -> edges -> target inlet -> owner.
    ///
    /// One item per outgoing edge, so a node connected twice appears twice.
    pub fn target_nodes(
        &self,
        node: NodeId,
    ) -> Result<impl Iterator<Item = NodeId> + '_, GraphError> {
        self.nodes.get(node)?;
        let index = &self.index;
        Ok(index
            .node_outlets
            .children_of(node)
            .flat_map(move |outlet| index.outlet_edges.children_of(outlet))
            .map(move |edge| {
                let inlet = index
                    .inlet_edges
                    .owner_of(edge)
                    .expect("linked edge has a target inlet");
                index
                    .node_inlets
                    .owner_of(inlet)
                    .expect("linked inlet has an owner node")
            }))
    }

    // -----------------------------------------------------------------------
    // Integrity
    // -----------------------------------------------------------------------

    /// Checks every referential invariant and that the relation index agrees
    /// with the tables, link for link.
    pub fn validate(&self) -> Result<(), GraphError> {
        fn fail(reason: String) -> Result<(), GraphError> {
            Err(GraphError::Inconsistent { reason })
        }

        for (id, inlet) in self.inlets.iter() {
            if !self.nodes.exists(inlet.owner()) {
                return fail(format!("inlet {id} owned by missing node {}", inlet.owner()));
            }
            if self.index.node_inlets.owner_of(id) != Some(inlet.owner()) {
                return fail(format!("inlet {id} not linked under node {}", inlet.owner()));
            }
        }
        for (id, outlet) in self.outlets.iter() {
            if !self.nodes.exists(outlet.owner()) {
                return fail(format!("outlet {id} owned by missing node {}", outlet.owner()));
            }
            if self.index.node_outlets.owner_of(id) != Some(outlet.owner()) {
                return fail(format!("outlet {id} not linked under node {}", outlet.owner()));
            }
        }
        for (id, edge) in self.edges.iter() {
            if !self.outlets.exists(edge.source()) {
                return fail(format!("edge {id} reads from missing outlet {}", edge.source()));
            }
            if !self.inlets.exists(edge.target()) {
                return fail(format!("edge {id} writes to missing inlet {}", edge.target()));
            }
            if self.index.outlet_edges.owner_of(id) != Some(edge.source()) {
                return fail(format!("edge {id} not linked under outlet {}", edge.source()));
            }
            if self.index.inlet_edges.owner_of(id) != Some(edge.target()) {
                return fail(format!("edge {id} not linked under inlet {}", edge.target()));
            }
        }

        // Same number of links as rows means no link survives its row.
        let counts = [
            ("node_inlets", self.index.node_inlets.len(), self.inlets.len()),
            ("node_outlets", self.index.node_outlets.len(), self.outlets.len()),
            ("outlet_edges", self.index.outlet_edges.len(), self.edges.len()),
            ("inlet_edges", self.index.inlet_edges.len(), self.edges.len()),
        ];
        for (name, links, rows) in counts {
            if links != rows {
                return fail(format!("{name} holds {links} links for {rows} rows"));
            }
        }
        Ok(())
    }
}
