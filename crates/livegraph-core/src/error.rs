//! Core error types for livegraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! all anticipated failure modes of the graph store.

use thiserror::Error;

use crate::id::{EntityId, NodeId};

/// Errors produced by the graph store and its algorithms.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A query or single-entity mutation referenced an id that does not exist.
    #[error("not found: {0}")]
    NotFound(EntityId),

    /// A factory method or edge re-point referenced an owner or endpoint that
    /// does not exist. The store is left unmodified.
    #[error("invalid reference: {0} does not exist")]
    InvalidReference(EntityId),

    /// A dependency cycle was found while ordering the graph.
    #[error("dependency cycle detected at node {node}")]
    CycleDetected { node: NodeId },

    /// Tables and relation index disagree.
    #[error("graph inconsistency: {reason}")]
    Inconsistent { reason: String },

    /// A configuration document failed to parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
