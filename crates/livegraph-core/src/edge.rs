//! Directed connections from an [`Outlet`](crate::port::Outlet) to an
//! [`Inlet`](crate::port::Inlet).
//!
//! Both endpoints may be re-pointed without destroying the edge (used while a
//! connection is dragged to a new port). The store validates the new endpoint
//! and relinks its relation index in the same call.

use serde::{Deserialize, Serialize};

use crate::id::{EdgeId, InletId, OutletId};
use crate::record::{guard, AttrValue, ChangedKeys, Record};

/// A dataflow connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    source: OutletId,
    target: InletId,
}

impl Edge {
    pub(crate) fn new(source: OutletId, target: InletId) -> Self {
        Edge { source, target }
    }

    /// The outlet this edge reads from.
    pub fn source(&self) -> OutletId {
        self.source
    }

    /// The inlet this edge writes to.
    pub fn target(&self) -> InletId {
        self.target
    }
}

/// Attribute names of an [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKey {
    Source,
    Target,
}

/// Partial update of an [`Edge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgePatch {
    pub source: Option<OutletId>,
    pub target: Option<InletId>,
}

impl EdgePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: OutletId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn target(mut self, target: InletId) -> Self {
        self.target = Some(target);
        self
    }
}

impl Record for Edge {
    type Id = EdgeId;
    type Key = EdgeKey;
    type Patch = EdgePatch;

    fn apply(&mut self, patch: EdgePatch) -> ChangedKeys<EdgeKey> {
        let mut changed = ChangedKeys::new();
        guard(&mut self.source, patch.source, EdgeKey::Source, &mut changed);
        guard(&mut self.target, patch.target, EdgeKey::Target, &mut changed);
        changed
    }

    fn attr(&self, key: EdgeKey) -> AttrValue {
        match key {
            EdgeKey::Source => AttrValue::Outlet(self.source),
            EdgeKey::Target => AttrValue::Inlet(self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repoint_target_only() {
        let mut edge = Edge::new(OutletId(1), InletId(2));
        let changed = edge.apply(EdgePatch::new().source(OutletId(1)).target(InletId(5)));
        assert_eq!(changed.as_slice(), &[EdgeKey::Target]);
        assert_eq!(edge.source(), OutletId(1));
        assert_eq!(edge.target(), InletId(5));
    }

    #[test]
    fn attr_returns_endpoints() {
        let edge = Edge::new(OutletId(3), InletId(4));
        assert_eq!(edge.attr(EdgeKey::Source), AttrValue::Outlet(OutletId(3)));
        assert_eq!(edge.attr(EdgeKey::Target), AttrValue::Inlet(InletId(4)));
    }
}
