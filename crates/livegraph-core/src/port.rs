//! Connection points owned by nodes.
//!
//! [`Inlet`]s receive values, [`Outlet`]s emit them. Both carry an immutable
//! owner; only the name can be patched.

use serde::{Deserialize, Serialize};

use crate::id::{InletId, NodeId, OutletId};
use crate::record::{guard, AttrValue, ChangedKeys, Record};

/// Input port of a node. Target endpoint for edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inlet {
    owner: NodeId,
    /// Display name.
    pub name: String,
}

/// Output port of a node. Source endpoint for edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    owner: NodeId,
    /// Display name.
    pub name: String,
}

/// Attribute names shared by [`Inlet`] and [`Outlet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKey {
    Owner,
    Name,
}

/// Partial update of a port. The owner is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortPatch {
    pub name: Option<String>,
}

impl PortPatch {
    pub fn name(name: impl Into<String>) -> Self {
        PortPatch {
            name: Some(name.into()),
        }
    }
}

macro_rules! port_record {
    ($ty:ident, $id:ty) => {
        impl $ty {
            pub(crate) fn new(owner: NodeId, name: impl Into<String>) -> Self {
                $ty {
                    owner,
                    name: name.into(),
                }
            }

            /// The node this port belongs to.
            pub fn owner(&self) -> NodeId {
                self.owner
            }
        }

        impl Record for $ty {
            type Id = $id;
            type Key = PortKey;
            type Patch = PortPatch;

            fn apply(&mut self, patch: PortPatch) -> ChangedKeys<PortKey> {
                let mut changed = ChangedKeys::new();
                guard(&mut self.name, patch.name, PortKey::Name, &mut changed);
                changed
            }

            fn attr(&self, key: PortKey) -> AttrValue {
                match key {
                    PortKey::Owner => AttrValue::Node(self.owner),
                    PortKey::Name => AttrValue::Text(self.name.clone()),
                }
            }
        }
    };
}

port_record!(Inlet, InletId);
port_record!(Outlet, OutletId);
