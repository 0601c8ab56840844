//! Fare quote result types.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::route::RouteLeg;

/// Outcome of a quote request.
///
/// Only [`QuoteMode::HangzhouRule`] carries a path; the others are expected
/// outcomes reported to the caller, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteMode {
    /// Priced with the distance tier table
    HangzhouRule,
    /// A supplied code does not match any station
    StationNotFound,
    /// The station exists but has no ride node in the current graph
    NodesNotFound,
    /// No path connects the two stations
    Unreachable,
}

impl QuoteMode {
    /// The wire tag for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteMode::HangzhouRule => "HANGZHOU_RULE",
            QuoteMode::StationNotFound => "STATION_NOT_FOUND",
            QuoteMode::NodesNotFound => "NODES_NOT_FOUND",
            QuoteMode::Unreachable => "UNREACHABLE",
        }
    }

    /// Returns true if the quote was priced.
    pub fn is_success(&self) -> bool {
        matches!(self, QuoteMode::HangzhouRule)
    }
}

impl fmt::Display for QuoteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price and itinerary between two stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    /// Origin station code as requested
    pub from: String,

    /// Destination station code as requested
    pub to: String,

    /// Physical stops travelled
    pub segments: u32,

    pub price: Decimal,

    pub mode: QuoteMode,

    /// Station codes of every ride node on the path, in order
    pub path: Vec<String>,

    /// Per-line legs
    pub steps: Vec<RouteLeg>,
}

impl FareQuote {
    /// A quote that could not be priced.
    pub fn failed(from: &str, to: &str, mode: QuoteMode) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            segments: 0,
            price: Decimal::ZERO,
            mode,
            path: Vec::new(),
            steps: Vec::new(),
        }
    }
}
