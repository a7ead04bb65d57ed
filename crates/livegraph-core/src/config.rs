//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Knobs for a [`GraphStore`](crate::store::GraphStore).
///
/// Every field has a default, so a partial JSON document is accepted:
///
/// ```
/// use livegraph_core::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{ "trace_events": true }"#).unwrap();
/// assert!(config.trace_events);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Run [`Graph::validate`](crate::graph::Graph::validate) after every
    /// mutation and panic if it fails. On by default in debug builds.
    pub check_integrity: bool,
    /// Emit a `tracing` trace record for every delivered event.
    pub trace_events: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            check_integrity: cfg!(debug_assertions),
            trace_events: false,
        }
    }
}

impl StoreConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(text)?)
    }
}
