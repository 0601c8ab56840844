//! Domain types for the fare engine.
//!
//! Lines, stations and line-station rows mirror what the topology store
//! supplies. Ride nodes and graphs are derived from them in [`crate::graph`].

mod ids;
mod line;
mod station;

pub use ids::{LineId, LineStationId, NodeId, StationId};
pub use line::{FALLBACK_COLOR, Line, ensure_hash_prefix, normalize_line_name, resolve_line_color};
pub use station::{Coordinates, LineStation, Station};
