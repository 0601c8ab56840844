//! Routing graph: construction, shortest-path search and publication.
//!
//! The graph has one ride node per (line, station) occurrence. Physical
//! edges join sequence-adjacent nodes on a line; transfer edges join
//! nodes at the same station on different lines. The solver is a plain
//! weighted Dijkstra that only looks at edge kind to pick a weight.

mod builder;
mod solver;
mod store;

pub use builder::{Graph, GraphStats, RideNode};
pub use solver::{CostConfig, PathResult, PathSolver};
pub use store::GraphStore;
