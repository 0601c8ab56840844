//! Importer for the network JSON file.
//!
//! The file is the metro operator's map feed:
//!
//! ```json
//! { "l": [ { "ln": "1号线", "la": "湘湖-萧山国际机场", "ls": "330100023133",
//!            "cl": "DF4749",
//!            "st": [ { "n": "湘湖", "sid": "330100023133006", "sl": "120.22,30.13" } ] } ] }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use super::error::TopologyError;
use super::{Stop, Topology, TopologyBuilder, TopologySource};
use crate::domain::Coordinates;

/// Color given to lines whose feed entry has none.
const DEFAULT_LINE_COLOR: &str = "#1a4695";

#[derive(Debug, Deserialize)]
struct LineDto {
    #[serde(default, deserialize_with = "text")]
    ln: String,
    #[serde(default, deserialize_with = "text")]
    la: String,
    #[serde(default, deserialize_with = "text")]
    ls: String,
    #[serde(default, deserialize_with = "text")]
    cl: String,
    #[serde(default)]
    st: Vec<StopDto>,
}

#[derive(Debug, Deserialize)]
struct StopDto {
    #[serde(default, deserialize_with = "text")]
    n: String,
    #[serde(default, deserialize_with = "text")]
    sid: String,
    #[serde(default, deserialize_with = "text")]
    sl: String,
}

/// Read a scalar field as text. Feeds are loose about quoting codes, so
/// numbers and booleans are accepted and `null` reads as empty.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Topology source backed by a network JSON file on disk.
///
/// The file is re-read on every [`load`](TopologySource::load), so a graph
/// rebuild picks up edits.
#[derive(Debug, Clone)]
pub struct JsonTopologyFile {
    path: PathBuf,
}

impl JsonTopologyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TopologySource for JsonTopologyFile {
    fn load(&self) -> Result<Topology, TopologyError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| TopologyError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "Importing network topology");
        parse_network(&contents)
    }
}

/// Parse the network JSON into a topology.
///
/// Stations are shared across lines by display name. A line with a
/// direction is named `"<name> (<direction>)"`.
pub fn parse_network(json: &str) -> Result<Topology, TopologyError> {
    let root: serde_json::Value = serde_json::from_str(json)?;
    let lines = root
        .get("l")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| TopologyError::Format("'l' field is missing or not an array".into()))?;

    let mut builder = TopologyBuilder::new();

    for raw in lines {
        let dto = LineDto::deserialize(raw)?;

        let display_name = if dto.la.is_empty() {
            dto.ln.clone()
        } else {
            format!("{} ({})", dto.ln, dto.la)
        };
        let color = if dto.cl.is_empty() {
            DEFAULT_LINE_COLOR.to_string()
        } else if dto.cl.starts_with('#') {
            dto.cl
        } else {
            format!("#{}", dto.cl)
        };

        let line_id = builder.add_line(display_name, dto.ls.clone(), Some(color));
        debug!(line = %dto.ln, code = %dto.ls, stops = dto.st.len(), "Importing line");

        for stop in dto.st {
            builder.add_stop(
                line_id,
                Stop {
                    coordinates: Coordinates::parse_lng_lat(&stop.sl),
                    name: stop.n,
                    code: stop.sid,
                },
            );
        }
    }

    let topology = builder.build();
    info!(
        lines = topology.lines.len(),
        stations = topology.stations.len(),
        line_stations = topology.line_stations.len(),
        "Network topology imported"
    );
    Ok(topology)
}
