use thiserror::Error;

use livegraph_core::{GraphError, NodeId};

/// Errors produced while composing a script.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The graph could not be ordered or queried.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The composer has no fragment for a node in the graph. Happens when
    /// `compose` is handed a graph other than the one it is attached to.
    #[error("no fragment tracked for node {node}")]
    MissingFragment { node: NodeId },

    /// A configuration document failed to parse.
    #[error("invalid composer configuration: {0}")]
    Config(#[from] serde_json::Error),
}
