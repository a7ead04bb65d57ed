//! Stable ID newtypes for graph entities.
//!
//! All IDs are distinct newtype wrappers over `u64`, providing type safety
//! so that an `InletId` cannot be accidentally used where an `OutletId` is
//! expected. IDs are allocated by the owning [`EntityTable`](crate::table::EntityTable)
//! from a monotonically increasing counter and are never reused.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Stable inlet (input port) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InletId(pub u64);

/// Stable outlet (output port) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutletId(pub u64);

/// Stable edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

/// The four entity kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Node,
    Inlet,
    Outlet,
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Node => "node",
            EntityKind::Inlet => "inlet",
            EntityKind::Outlet => "outlet",
            EntityKind::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// Any entity id, tagged with its kind. Used in errors and log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Node(NodeId),
    Inlet(InletId),
    Outlet(OutletId),
    Edge(EdgeId),
}

impl EntityId {
    /// Returns the kind of entity this id refers to.
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityId::Node(_) => EntityKind::Node,
            EntityId::Inlet(_) => EntityKind::Inlet,
            EntityId::Outlet(_) => EntityKind::Outlet,
            EntityId::Edge(_) => EntityKind::Edge,
        }
    }

    /// Returns the raw counter value.
    pub fn raw(&self) -> u64 {
        match self {
            EntityId::Node(id) => id.0,
            EntityId::Inlet(id) => id.0,
            EntityId::Outlet(id) => id.0,
            EntityId::Edge(id) => id.0,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.raw())
    }
}

/// Implemented by every typed id so tables can be generic over them.
pub trait RawId: Copy + Eq + std::hash::Hash + fmt::Debug + fmt::Display {
    /// Wraps a freshly allocated counter value.
    fn from_raw(raw: u64) -> Self;
    /// Tags this id with its kind.
    fn entity(self) -> EntityId;
}

// Display implementations -- just print the inner value.

macro_rules! impl_id {
    ($ty:ident, $variant:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl RawId for $ty {
            fn from_raw(raw: u64) -> Self {
                $ty(raw)
            }

            fn entity(self) -> EntityId {
                EntityId::$variant(self)
            }
        }

        impl From<$ty> for EntityId {
            fn from(id: $ty) -> Self {
                EntityId::$variant(id)
            }
        }
    };
}

impl_id!(NodeId, Node);
impl_id!(InletId, Inlet);
impl_id!(OutletId, Outlet);
impl_id!(EdgeId, Edge);
