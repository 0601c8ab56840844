//! Metro fare engine.
//!
//! Builds a routing graph of ride nodes (one per station on each line it
//! serves) from network topology, finds the cheapest path between two
//! stations, prices it by physical stops travelled and splits it into
//! per-line legs.

pub mod config;
pub mod domain;
pub mod engine;
pub mod fare;
pub mod graph;
pub mod route;
pub mod topology;

pub use engine::{FareEngine, FareQuote, QuoteMode, StationInfo};
