//! Per-kind row storage.
//!
//! An [`EntityTable`] maps ids to records for one entity kind. It allocates
//! ids, applies patches under the change guard and deletes rows. It does not
//! know about relationships; cascading is the job of
//! [`GraphStore`](crate::store::GraphStore).

use indexmap::IndexMap;

use crate::error::GraphError;
use crate::id::RawId;
use crate::record::{AttrValue, ChangedKeys, Record};

/// Rows of one entity kind, in insertion order.
#[derive(Debug, Clone)]
pub struct EntityTable<T: Record> {
    rows: IndexMap<T::Id, T>,
    /// Next counter value. Only ever increases, so ids are never reused.
    next_id: u64,
}

impl<T: Record> EntityTable<T> {
    /// Creates an empty table. The first id issued is 1.
    pub fn new() -> Self {
        EntityTable {
            rows: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Stores `record` under a fresh id and returns the id.
    pub fn create(&mut self, record: T) -> T::Id {
        let id = T::Id::from_raw(self.next_id);
        self.next_id += 1;
        self.rows.insert(id, record);
        id
    }

    /// Looks up a row.
    pub fn get(&self, id: T::Id) -> Result<&T, GraphError> {
        self.rows.get(&id).ok_or(GraphError::NotFound(id.entity()))
    }

    /// Reads a single attribute of a row.
    pub fn attr(&self, id: T::Id, key: T::Key) -> Result<AttrValue, GraphError> {
        self.get(id).map(|row| row.attr(key))
    }

    /// Applies `patch` to a row and returns the keys actually written.
    ///
    /// An empty result means nothing changed and nothing must be reported.
    pub fn set(&mut self, id: T::Id, patch: T::Patch) -> Result<ChangedKeys<T::Key>, GraphError> {
        let row = self
            .rows
            .get_mut(&id)
            .ok_or(GraphError::NotFound(id.entity()))?;
        Ok(row.apply(patch))
    }

    /// Removes a row, keeping the order of the remaining rows. Does not cascade.
    pub fn delete(&mut self, id: T::Id) -> Result<T, GraphError> {
        self.rows
            .shift_remove(&id)
            .ok_or(GraphError::NotFound(id.entity()))
    }

    pub fn exists(&self, id: T::Id) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = T::Id> + '_ {
        self.rows.keys().copied()
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (T::Id, &T)> + '_ {
        self.rows.iter().map(|(&id, row)| (id, row))
    }
}

impl<T: Record> Default for EntityTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
