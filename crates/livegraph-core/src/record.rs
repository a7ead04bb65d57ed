//! The [`Record`] trait shared by all four entity kinds, and the change guard.
//!
//! A record is patched, never overwritten: every mutable attribute appears in
//! the record's patch type as an `Option`, and [`Record::apply`] writes a field
//! only when the supplied value differs from the stored one. The keys actually
//! written are returned so the store can report them (and nothing else) in a
//! property-changed notification.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::id::{InletId, NodeId, OutletId, RawId};

/// Keys written by a single patch. Empty means the patch was a no-op.
pub type ChangedKeys<K> = SmallVec<[K; 4]>;

/// A single attribute value read back through [`Record::attr`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Node(NodeId),
    Inlet(InletId),
    Outlet(OutletId),
}

impl AttrValue {
    /// Returns the text, if this is a text attribute.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer attribute.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// One row kind of the store.
pub trait Record: Clone + fmt::Debug {
    /// Typed id of this record kind.
    type Id: RawId;
    /// Attribute names.
    type Key: Copy + Eq + fmt::Debug;
    /// Partial update; `None` fields are left alone.
    type Patch: Default;

    /// Applies `patch` under the change guard and returns the keys written.
    fn apply(&mut self, patch: Self::Patch) -> ChangedKeys<Self::Key>;

    /// Reads one attribute.
    fn attr(&self, key: Self::Key) -> AttrValue;
}

/// Writes `value` into `slot` only if it differs, recording `key` when it does.
pub(crate) fn guard<T: PartialEq, K>(
    slot: &mut T,
    value: Option<T>,
    key: K,
    changed: &mut ChangedKeys<K>,
) {
    if let Some(value) = value {
        if *slot != value {
            *slot = value;
            changed.push(key);
        }
    }
}
