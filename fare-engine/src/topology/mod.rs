//! Network topology: the lines, stations and line-station rows the graph is
//! built from.
//!
//! The topology store is read once per graph build. [`TopologySource`]
//! abstracts over where the rows come from so the engine can be driven by
//! an in-memory [`Topology`] in tests and by [`JsonTopologyFile`] in the
//! binary.

mod error;
mod json;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, Line, LineId, LineStation, LineStationId, Station, StationId};

pub use error::TopologyError;
pub use json::{JsonTopologyFile, parse_network};

/// Trait for supplying network topology.
///
/// Implementations are read-only from the engine's perspective and are
/// consulted only when the graph is (re)built, never per query.
pub trait TopologySource {
    /// Load the current set of lines, stations and line-station rows.
    fn load(&self) -> Result<Topology, TopologyError>;
}

/// A complete snapshot of network topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub lines: Vec<Line>,
    pub stations: Vec<Station>,
    pub line_stations: Vec<LineStation>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are no line-station rows to build from.
    pub fn is_empty(&self) -> bool {
        self.line_stations.is_empty()
    }
}

impl TopologySource for Topology {
    fn load(&self) -> Result<Topology, TopologyError> {
        Ok(self.clone())
    }
}

/// A stop to append to a line while building a topology.
#[derive(Debug, Clone)]
pub struct Stop {
    pub name: String,
    pub code: String,
    pub coordinates: Option<Coordinates>,
}

impl Stop {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            coordinates: None,
        }
    }
}

/// Builder for creating a topology line by line.
///
/// Stations are deduplicated by display name: the first line to mention a
/// name creates the station record (and becomes its primary line), later
/// lines reuse it. Sequence numbers are assigned 1, 2, 3... per line in
/// the order stops are added. Ids are assigned sequentially from 1.
///
/// # Example
///
/// ```
/// use fare_engine::topology::TopologyBuilder;
///
/// let topology = TopologyBuilder::new()
///     .line("L1", &["A", "B"])
///     .line("L2", &["B", "C"])
///     .build();
///
/// assert_eq!(topology.lines.len(), 2);
/// assert_eq!(topology.stations.len(), 3); // B is shared
/// assert_eq!(topology.line_stations.len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    topology: Topology,
    station_by_name: HashMap<String, StationId>,
    next_seq: HashMap<LineId, u32>,
}

impl TopologyBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line with no stops yet.
    pub fn add_line(
        &mut self,
        name: impl Into<String>,
        code: impl Into<String>,
        color: Option<String>,
    ) -> LineId {
        let id = LineId(self.topology.lines.len() as u64 + 1);
        let line = Line::new(id, name, code);
        self.topology.lines.push(match color {
            Some(color) => line.with_color(color),
            None => line,
        });
        id
    }

    /// Append a stop to the end of a line.
    pub fn add_stop(&mut self, line_id: LineId, stop: Stop) -> LineStationId {
        let station_id = match self.station_by_name.get(&stop.name) {
            Some(id) => *id,
            None => {
                let id = StationId(self.topology.stations.len() as u64 + 1);
                let mut station = Station::new(id, stop.name.clone(), stop.code, line_id);
                station.coordinates = stop.coordinates;
                self.topology.stations.push(station);
                self.station_by_name.insert(stop.name, id);
                id
            }
        };

        let seq = self.next_seq.entry(line_id).or_insert(1);
        let id = LineStationId(self.topology.line_stations.len() as u64 + 1);
        self.topology
            .line_stations
            .push(LineStation::new(id, line_id, station_id, *seq));
        *seq += 1;
        id
    }

    /// Add a line whose stops use their names as station codes.
    pub fn line(mut self, name: &str, stops: &[&str]) -> Self {
        let line_id = self.add_line(name, name, None);
        for stop in stops {
            self.add_stop(line_id, Stop::new(*stop, *stop));
        }
        self
    }

    /// Build the topology.
    pub fn build(self) -> Topology {
        self.topology
    }
}
