//! Fare calculation from physical distance.
//!
//! Distance is the number of physical hops on the solved path. It is
//! priced by an ordered tier table, then by an overflow rule for distances
//! beyond the last tier, then by a flat base price.

mod calculator;
mod config;

pub use calculator::FareCalculator;
pub use config::{FareConfig, FareTier, OverflowRule};
