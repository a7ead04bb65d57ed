//! Change notifications.
//!
//! Every mutation of [`GraphStore`](crate::store::GraphStore) is published as
//! one or more [`GraphEvent`]s through the store's own [`ChangeNotifier`].
//! Delivery is synchronous: subscribers run inside the mutating call, in
//! subscription order, and receive a read-only [`Graph`] that is consistent
//! for the phase being reported.
//!
//! | phase              | graph state when delivered                             |
//! |--------------------|--------------------------------------------------------|
//! | `Added`            | rows exist and all relation links are established      |
//! | `AboutToBeRemoved` | rows and links still present; last chance to query     |
//! | `Removed`          | rows and links are gone                                |
//! | `PropertyChanged`  | new values written; only changed keys are listed       |
//!
//! Subscribers get `&Graph`, not the store, so a callback cannot issue a
//! nested mutation while a cascade is in progress.

use std::fmt;

use crate::edge::EdgeKey;
use crate::graph::Graph;
use crate::id::{EdgeId, EntityId, EntityKind, InletId, NodeId, OutletId, RawId};
use crate::node::NodeKey;
use crate::port::PortKey;

/// When, relative to the table write, an event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPhase {
    Added,
    AboutToBeRemoved,
    Removed,
    PropertyChanged,
}

/// A single change notification. One variant per entity kind and phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    NodesAdded(Vec<NodeId>),
    NodesAboutToBeRemoved(Vec<NodeId>),
    NodesRemoved(Vec<NodeId>),
    NodesPropertyChanged { ids: Vec<NodeId>, keys: Vec<NodeKey> },

    InletsAdded(Vec<InletId>),
    InletsAboutToBeRemoved(Vec<InletId>),
    InletsRemoved(Vec<InletId>),
    InletsPropertyChanged { ids: Vec<InletId>, keys: Vec<PortKey> },

    OutletsAdded(Vec<OutletId>),
    OutletsAboutToBeRemoved(Vec<OutletId>),
    OutletsRemoved(Vec<OutletId>),
    OutletsPropertyChanged { ids: Vec<OutletId>, keys: Vec<PortKey> },

    EdgesAdded(Vec<EdgeId>),
    EdgesAboutToBeRemoved(Vec<EdgeId>),
    EdgesRemoved(Vec<EdgeId>),
    EdgesPropertyChanged { ids: Vec<EdgeId>, keys: Vec<EdgeKey> },
}

fn tagged<I: RawId>(ids: &[I]) -> Vec<EntityId> {
    ids.iter().map(|id| id.entity()).collect()
}

impl GraphEvent {
    /// The entity kind this event reports on.
    pub fn kind(&self) -> EntityKind {
        use GraphEvent::*;
        match self {
            NodesAdded(_)
            | NodesAboutToBeRemoved(_)
            | NodesRemoved(_)
            | NodesPropertyChanged { .. } => EntityKind::Node,
            InletsAdded(_)
            | InletsAboutToBeRemoved(_)
            | InletsRemoved(_)
            | InletsPropertyChanged { .. } => EntityKind::Inlet,
            OutletsAdded(_)
            | OutletsAboutToBeRemoved(_)
            | OutletsRemoved(_)
            | OutletsPropertyChanged { .. } => EntityKind::Outlet,
            EdgesAdded(_)
            | EdgesAboutToBeRemoved(_)
            | EdgesRemoved(_)
            | EdgesPropertyChanged { .. } => EntityKind::Edge,
        }
    }

    /// The phase this event belongs to.
    pub fn phase(&self) -> EventPhase {
        use GraphEvent::*;
        match self {
            NodesAdded(_) | InletsAdded(_) | OutletsAdded(_) | EdgesAdded(_) => EventPhase::Added,
            NodesAboutToBeRemoved(_)
            | InletsAboutToBeRemoved(_)
            | OutletsAboutToBeRemoved(_)
            | EdgesAboutToBeRemoved(_) => EventPhase::AboutToBeRemoved,
            NodesRemoved(_) | InletsRemoved(_) | OutletsRemoved(_) | EdgesRemoved(_) => {
                EventPhase::Removed
            }
            NodesPropertyChanged { .. }
            | InletsPropertyChanged { .. }
            | OutletsPropertyChanged { .. }
            | EdgesPropertyChanged { .. } => EventPhase::PropertyChanged,
        }
    }

    /// The ids carried by this event, tagged with their kind.
    pub fn ids(&self) -> Vec<EntityId> {
        use GraphEvent::*;
        match self {
            NodesAdded(ids) | NodesAboutToBeRemoved(ids) | NodesRemoved(ids) => tagged(ids),
            NodesPropertyChanged { ids, .. } => tagged(ids),
            InletsAdded(ids) | InletsAboutToBeRemoved(ids) | InletsRemoved(ids) => tagged(ids),
            InletsPropertyChanged { ids, .. } => tagged(ids),
            OutletsAdded(ids) | OutletsAboutToBeRemoved(ids) | OutletsRemoved(ids) => tagged(ids),
            OutletsPropertyChanged { ids, .. } => tagged(ids),
            EdgesAdded(ids) | EdgesAboutToBeRemoved(ids) | EdgesRemoved(ids) => tagged(ids),
            EdgesPropertyChanged { ids, .. } => tagged(ids),
        }
    }

    /// True if the event carries no ids, or a property change with no keys.
    pub fn is_empty(&self) -> bool {
        use GraphEvent::*;
        match self {
            NodesAdded(ids) | NodesAboutToBeRemoved(ids) | NodesRemoved(ids) => ids.is_empty(),
            InletsAdded(ids) | InletsAboutToBeRemoved(ids) | InletsRemoved(ids) => ids.is_empty(),
            OutletsAdded(ids) | OutletsAboutToBeRemoved(ids) | OutletsRemoved(ids) => {
                ids.is_empty()
            }
            EdgesAdded(ids) | EdgesAboutToBeRemoved(ids) | EdgesRemoved(ids) => ids.is_empty(),
            NodesPropertyChanged { ids, keys } => ids.is_empty() || keys.is_empty(),
            InletsPropertyChanged { ids, keys } => ids.is_empty() || keys.is_empty(),
            OutletsPropertyChanged { ids, keys } => ids.is_empty() || keys.is_empty(),
            EdgesPropertyChanged { ids, keys } => ids.is_empty() || keys.is_empty(),
        }
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&GraphEvent, &Graph)>;

/// The store's subscriber list.
pub struct ChangeNotifier {
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
    trace_events: bool,
}

impl ChangeNotifier {
    pub fn new(trace_events: bool) -> Self {
        ChangeNotifier {
            subscribers: Vec::new(),
            next_id: 0,
            trace_events,
        }
    }

    /// Registers a callback for every future event.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent, &Graph) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Drops a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Delivers `event` to every subscriber. Empty events are dropped.
    pub(crate) fn emit(&mut self, event: GraphEvent, graph: &Graph) {
        if event.is_empty() {
            return;
        }
        if self.trace_events {
            tracing::trace!(
                kind = %event.kind(),
                phase = ?event.phase(),
                ids = ?event.ids(),
                "graph event"
            );
        }
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&event, graph);
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .field("trace_events", &self.trace_events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn kind_and_phase() {
        let ev = GraphEvent::InletsAboutToBeRemoved(vec![InletId(1)]);
        assert_eq!(ev.kind(), EntityKind::Inlet);
        assert_eq!(ev.phase(), EventPhase::AboutToBeRemoved);
        assert_eq!(ev.ids(), vec![EntityId::Inlet(InletId(1))]);
    }

    #[test]
    fn empty_events() {
        assert!(GraphEvent::EdgesRemoved(vec![]).is_empty());
        assert!(GraphEvent::NodesPropertyChanged {
            ids: vec![NodeId(1)],
            keys: vec![]
        }
        .is_empty());
        assert!(!GraphEvent::NodesAdded(vec![NodeId(1)]).is_empty());
    }

    #[test]
    fn emptiness_agrees_with_ids_for_every_list_variant() {
        let events = [
            GraphEvent::NodesAboutToBeRemoved(vec![]),
            GraphEvent::InletsAdded(vec![]),
            GraphEvent::OutletsRemoved(vec![]),
            GraphEvent::EdgesAboutToBeRemoved(vec![]),
            GraphEvent::InletsRemoved(vec![InletId(2)]),
            GraphEvent::OutletsAdded(vec![OutletId(3)]),
            GraphEvent::EdgesAdded(vec![EdgeId(4)]),
        ];
        for ev in events {
            assert_eq!(ev.is_empty(), ev.ids().is_empty(), "{ev:?}");
        }
        let keyed = GraphEvent::EdgesPropertyChanged {
            ids: vec![EdgeId(1)],
            keys: vec![EdgeKey::Target],
        };
        assert!(!keyed.is_empty());
    }

    #[test]
    fn emit_skips_empty_and_respects_unsubscribe() {
        let graph = Graph::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::default();

        let sink = Rc::clone(&seen);
        let sub = notifier.subscribe(move |ev, _| sink.borrow_mut().push(ev.clone()));

        notifier.emit(GraphEvent::NodesAdded(vec![]), &graph);
        notifier.emit(GraphEvent::NodesAdded(vec![NodeId(1)]), &graph);
        assert_eq!(seen.borrow().len(), 1);

        assert!(notifier.unsubscribe(sub));
        assert!(!notifier.unsubscribe(sub));
        notifier.emit(GraphEvent::NodesAdded(vec![NodeId(2)]), &graph);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn subscribers_run_in_order() {
        let graph = Graph::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::default();
        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            notifier.subscribe(move |_, _| order.borrow_mut().push(tag));
        }
        notifier.emit(GraphEvent::EdgesAdded(vec![EdgeId(1)]), &graph);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }
}
