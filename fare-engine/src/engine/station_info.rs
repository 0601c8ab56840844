//! Station listings enriched with line details.

use serde::Serialize;

use crate::domain::{Line, Station, ensure_hash_prefix};

/// A station record with its primary line's name and stored color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationInfo {
    #[serde(flatten)]
    pub station: Station,

    /// `None` when the primary line is not in the graph.
    pub line_name: Option<String>,

    pub line_color: String,
}

impl StationInfo {
    /// Attach line details. A missing line or color falls back to `#999`.
    pub fn new(station: Station, line: Option<&Line>) -> Self {
        let color = line.and_then(|l| l.color.as_deref()).unwrap_or_default();
        Self {
            station,
            line_name: line.map(|l| l.name.clone()),
            line_color: ensure_hash_prefix(color),
        }
    }
}
