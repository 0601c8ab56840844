//! Topology loading error types.

use std::path::PathBuf;

/// Errors that can occur while loading network topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// The topology file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The topology file is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is well formed but not in the expected shape
    #[error("invalid topology format: {0}")]
    Format(String),
}
