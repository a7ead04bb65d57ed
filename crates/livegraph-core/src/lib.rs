//! Relational graph store for a node-based live-coding editor.
//!
//! The dataflow graph is held as four entity tables (nodes, inlets, outlets,
//! edges) plus a relation index, behind a [`GraphStore`] that enforces
//! referential integrity, cascades deletions and publishes change events.
//!
//! - [`store`]: the mutation API and cascade removal
//! - [`graph`]: read-only queries and integrity validation
//! - [`event`]: the notification contract
//! - [`algo`]: root discovery and dependency ordering

pub mod algo;
pub mod config;
pub mod edge;
pub mod error;
pub mod event;
pub mod graph;
pub mod id;
pub mod node;
pub mod port;
pub mod record;
pub mod relation;
pub mod store;
pub mod table;

// Re-export commonly used types
pub use config::StoreConfig;
pub use edge::{Edge, EdgeKey, EdgePatch};
pub use error::GraphError;
pub use event::{ChangeNotifier, EventPhase, GraphEvent, SubscriptionId};
pub use graph::Graph;
pub use id::{EdgeId, EntityId, EntityKind, InletId, NodeId, OutletId};
pub use node::{Node, NodeKey, NodePatch};
pub use port::{Inlet, Outlet, PortKey, PortPatch};
pub use record::{AttrValue, ChangedKeys, Record};
pub use store::GraphStore;
