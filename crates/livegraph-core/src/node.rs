//! Graph vertices.
//!
//! A [`Node`] is one operation of the live-coded program. `posx`/`posy` are
//! opaque layout hints owned by the views, and `payload` holds the script or
//! expression text the node contributes; the store never interprets either.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::record::{guard, AttrValue, ChangedKeys, Record};

/// A vertex of the dataflow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Display name.
    pub name: String,
    /// Horizontal layout hint.
    pub posx: i64,
    /// Vertical layout hint.
    pub posy: i64,
    /// Script text, uninterpreted.
    pub payload: String,
}

impl Node {
    /// Creates a node record.
    pub fn new(name: impl Into<String>, posx: i64, posy: i64, payload: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            posx,
            posy,
            payload: payload.into(),
        }
    }
}

/// Attribute names of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKey {
    Name,
    PosX,
    PosY,
    Payload,
}

/// Partial update of a [`Node`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub posx: Option<i64>,
    pub posy: Option<i64>,
    pub payload: Option<String>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets both layout hints.
    pub fn pos(mut self, posx: i64, posy: i64) -> Self {
        self.posx = Some(posx);
        self.posy = Some(posy);
        self
    }

    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

impl Record for Node {
    type Id = NodeId;
    type Key = NodeKey;
    type Patch = NodePatch;

    fn apply(&mut self, patch: NodePatch) -> ChangedKeys<NodeKey> {
        let mut changed = ChangedKeys::new();
        guard(&mut self.name, patch.name, NodeKey::Name, &mut changed);
        guard(&mut self.posx, patch.posx, NodeKey::PosX, &mut changed);
        guard(&mut self.posy, patch.posy, NodeKey::PosY, &mut changed);
        guard(&mut self.payload, patch.payload, NodeKey::Payload, &mut changed);
        changed
    }

    fn attr(&self, key: NodeKey) -> AttrValue {
        match key {
            NodeKey::Name => AttrValue::Text(self.name.clone()),
            NodeKey::PosX => AttrValue::Int(self.posx),
            NodeKey::PosY => AttrValue::Int(self.posy),
            NodeKey::Payload => AttrValue::Text(self.payload.clone()),
        }
    }
}
