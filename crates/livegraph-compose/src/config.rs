use serde::{Deserialize, Serialize};

use crate::error::ComposeError;

/// Rendering options for [`ScriptComposer`](crate::ScriptComposer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Write a `# <name>` line before each fragment.
    pub header: bool,
    /// Leave out nodes whose payload is blank.
    pub skip_empty: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            header: true,
            skip_empty: true,
        }
    }
}

impl ComposerConfig {
    pub fn from_json(text: &str) -> Result<Self, ComposeError> {
        Ok(serde_json::from_str(text)?)
    }
}
