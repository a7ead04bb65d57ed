//! Read-only graph algorithms.
//!
//! Everything here takes `&Graph` and only uses its query API. Node-level
//! adjacency comes from [`Graph::source_nodes`] and [`Graph::target_nodes`],
//! which walk the relation index through ports and edges.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::id::NodeId;

/// Every node reachable from `start` following edges in either direction,
/// `start` first, then in breadth-first discovery order.
pub fn connected_nodes(graph: &Graph, start: NodeId) -> Result<Vec<NodeId>, GraphError> {
    graph.node(start)?;

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    let mut order = Vec::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        order.push(current);
        let neighbors = graph
            .target_nodes(current)?
            .chain(graph.source_nodes(current)?);
        for neighbor in neighbors {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    Ok(order)
}

/// Nodes nothing downstream consumes, in table order.
pub fn root_nodes(graph: &Graph) -> impl Iterator<Item = NodeId> + '_ {
    graph.node_ids().filter(move |&node| {
        graph
            .target_nodes(node)
            .map(|mut targets| targets.next().is_none())
            .unwrap_or(false)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct Frame {
    node: NodeId,
    sources: Vec<NodeId>,
    cursor: usize,
}

/// Dependents-first ordering of every node.
///
/// Walks the graph depth-first against the data flow, starting from each
/// root in [`root_nodes`] order and then from any node not yet reached. A
/// node is finished once everything feeding it is finished, and the result
/// lists nodes in reverse finishing order: each node appears before every
/// node it depends on. Reverse it (or call [`execution_order`]) for a
/// dependencies-first script order.
///
/// With several roots it is [`execution_order`] that follows root order: the
/// first root's upstream comes first there, and here the last root's subgraph
/// leads. With `X`
/// isolated and `A -> C`, roots are `[X, C]` and this returns `[C, A, X]`. A
/// pre-order listing that started at `X` would keep root order but is not a
/// valid ordering once two paths share a dependency.
///
/// Returns [`GraphError::CycleDetected`] naming the node at which the walk
/// re-entered a node still in progress.
pub fn dependency_order(graph: &Graph) -> Result<Vec<NodeId>, GraphError> {
    let mut marks: HashMap<NodeId, Mark> = HashMap::with_capacity(graph.node_count());
    let mut finished = Vec::with_capacity(graph.node_count());

    let starts: Vec<NodeId> = root_nodes(graph).chain(graph.node_ids()).collect();
    for start in starts {
        if marks.contains_key(&start) {
            continue;
        }
        marks.insert(start, Mark::InProgress);
        let mut stack = vec![Frame {
            node: start,
            sources: graph.source_nodes(start)?.collect(),
            cursor: 0,
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            match frame.sources.get(frame.cursor).copied() {
                Some(source) => {
                    frame.cursor += 1;
                    match marks.get(&source) {
                        Some(Mark::Done) => {}
                        Some(Mark::InProgress) => {
                            return Err(GraphError::CycleDetected { node: source });
                        }
                        None => {
                            marks.insert(source, Mark::InProgress);
                            stack.push(Frame {
                                node: source,
                                sources: graph.source_nodes(source)?.collect(),
                                cursor: 0,
                            });
                        }
                    }
                }
                None => {
                    let node = frame.node;
                    stack.pop();
                    marks.insert(node, Mark::Done);
                    finished.push(node);
                }
            }
        }
    }

    finished.reverse();
    Ok(finished)
}

/// Dependencies-first ordering: [`dependency_order`] reversed.
pub fn execution_order(graph: &Graph) -> Result<Vec<NodeId>, GraphError> {
    let mut order = dependency_order(graph)?;
    order.reverse();
    Ok(order)
}
