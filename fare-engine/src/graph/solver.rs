//! Weighted shortest-path search over the ride-node graph.
//!
//! A station name may map to several ride nodes (one per line serving it),
//! so the search is multi-source and multi-target: every start candidate is
//! seeded at cost zero and the search stops as soon as any end candidate
//! is settled.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::builder::Graph;
use crate::domain::NodeId;

/// Edge weights for the solver.
///
/// `cost_per_transfer` is normally set higher than `cost_per_station` so
/// that, for equal stop counts, the path with fewer changes wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostConfig {
    pub cost_per_station: u32,
    pub cost_per_transfer: u32,
}

impl CostConfig {
    pub fn new(cost_per_station: u32, cost_per_transfer: u32) -> Self {
        Self {
            cost_per_station,
            cost_per_transfer,
        }
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            cost_per_station: 100,
            cost_per_transfer: 350,
        }
    }
}

/// A solved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    /// Ride nodes from a start candidate to the reached end candidate.
    pub nodes: Vec<NodeId>,

    /// Physical hops along the path. Transfers are not counted.
    pub distance: u32,

    /// Total weighted cost.
    pub cost: u64,
}

/// Dijkstra solver bound to one graph snapshot.
pub struct PathSolver<'a> {
    graph: &'a Graph,
    costs: &'a CostConfig,
}

impl<'a> PathSolver<'a> {
    /// Create a new solver.
    pub fn new(graph: &'a Graph, costs: &'a CostConfig) -> Self {
        Self { graph, costs }
    }

    /// Find the cheapest path from any start candidate to any end candidate.
    ///
    /// Returns `None` if no end candidate is reachable, including when either
    /// candidate list is empty. Paths of equal cost are ranked by physical
    /// hops, fewest first, so swapping start and end never changes the
    /// distance. Remaining ties settle the lower node id first, which makes
    /// results reproducible.
    pub fn find_path(&self, start: &[NodeId], end: &[NodeId]) -> Option<PathResult> {
        let targets: HashSet<NodeId> = end.iter().copied().collect();
        if targets.is_empty() {
            return None;
        }

        // Keyed by (cost, physical hops): both grow along any path and
        // neither changes when a path is reversed.
        let mut best: HashMap<NodeId, (u64, u32)> = HashMap::new();
        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
        let mut frontier: BinaryHeap<Reverse<(u64, u32, NodeId)>> = BinaryHeap::new();

        for &s in start {
            best.insert(s, (0, 0));
            frontier.push(Reverse((0, 0, s)));
        }

        let mut settled = 0usize;
        while let Some(Reverse((cost, hops, node))) = frontier.pop() {
            if best.get(&node).is_some_and(|&b| (cost, hops) > b) {
                continue; // stale
            }
            settled += 1;

            if targets.contains(&node) {
                let nodes = reconstruct(&parent, node);
                trace!(settled, cost, distance = hops, "Path found");
                return Some(PathResult {
                    nodes,
                    distance: hops,
                    cost,
                });
            }

            for next in self.graph.neighbors(node) {
                let candidate = if self.graph.is_transfer(node, next) {
                    (cost + u64::from(self.costs.cost_per_transfer), hops)
                } else {
                    (cost + u64::from(self.costs.cost_per_station), hops + 1)
                };
                if best.get(&next).is_none_or(|&b| candidate < b) {
                    best.insert(next, candidate);
                    parent.insert(next, node);
                    frontier.push(Reverse((candidate.0, candidate.1, next)));
                }
            }
        }

        trace!(settled, "Frontier exhausted without reaching a target");
        None
    }
}

fn reconstruct(parent: &HashMap<NodeId, NodeId>, end: NodeId) -> Vec<NodeId> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&prev) = parent.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::TopologyBuilder;

    fn names(graph: &Graph, path: &PathResult) -> Vec<String> {
        path.nodes
            .iter()
            .map(|id| graph.node(*id).unwrap().station_name.clone())
            .collect()
    }

    #[test]
    fn single_line_path() {
        let t = TopologyBuilder::new().line("L1", &["S1", "S2", "S3"]).build();
        let g = Graph::from_topology(&t);
        let costs = CostConfig::default();
        let solver = PathSolver::new(&g, &costs);

        let path = solver
            .find_path(g.nodes_named("S1"), g.nodes_named("S3"))
            .unwrap();
        assert_eq!(names(&g, &path), vec!["S1", "S2", "S3"]);
        assert_eq!(path.distance, 2);
        assert_eq!(path.cost, 200);
    }

    #[test]
    fn transfer_path_counts_only_physical_hops() {
        let t = TopologyBuilder::new()
            .line("L1", &["A", "B"])
            .line("L2", &["B", "C"])
            .build();
        let g = Graph::from_topology(&t);
        let costs = CostConfig::new(100, 350);
        let solver = PathSolver::new(&g, &costs);

        let path = solver
            .find_path(g.nodes_named("A"), g.nodes_named("C"))
            .unwrap();
        assert_eq!(names(&g, &path), vec!["A", "B", "B", "C"]);
        assert_eq!(path.distance, 2);
        assert_eq!(path.cost, 100 + 350 + 100);
    }

    #[test]
    fn prefers_fewer_transfers_at_equal_stops() {
        // A-B-C-D direct on L1, or A-X on L2 then X-... on L3: same stop count.
        let t = TopologyBuilder::new()
            .line("L1", &["A", "B", "C", "D"])
            .line("L2", &["A", "X"])
            .line("L3", &["X", "Y", "D"])
            .build();
        let g = Graph::from_topology(&t);
        let costs = CostConfig::default();
        let solver = PathSolver::new(&g, &costs);

        let path = solver
            .find_path(g.nodes_named("A"), g.nodes_named("D"))
            .unwrap();
        assert_eq!(names(&g, &path), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn cheap_transfers_allow_shorter_detour() {
        // Direct line is long; an express line between B and D saves a stop
        // at the price of two transfers.
        let t = TopologyBuilder::new()
            .line("L1", &["A", "B", "C", "D", "E"])
            .line("L2", &["B", "D"])
            .build();
        let g = Graph::from_topology(&t);

        let expensive = CostConfig::new(100, 1000);
        let path = PathSolver::new(&g, &expensive)
            .find_path(g.nodes_named("A"), g.nodes_named("E"))
            .unwrap();
        assert_eq!(path.distance, 4, "transfers too costly, stay on L1");

        let cheap = CostConfig::new(100, 10);
        let path = PathSolver::new(&g, &cheap)
            .find_path(g.nodes_named("A"), g.nodes_named("E"))
            .unwrap();
        assert_eq!(path.distance, 3);
        assert_eq!(path.cost, 300 + 2 * 10);
    }

    /// A 10-stop line against a 3-stop route with two changes: both cost
    /// 1000 under the default weights.
    fn equal_cost_network() -> Graph {
        let t = TopologyBuilder::new()
            .line("L1", &["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "Z"])
            .line("L2", &["A", "X"])
            .line("L3", &["X", "Y"])
            .line("L4", &["Y", "Z"])
            .build();
        Graph::from_topology(&t)
    }

    #[test]
    fn equal_cost_prefers_fewer_stops() {
        let g = equal_cost_network();
        let costs = CostConfig::default();
        let path = PathSolver::new(&g, &costs)
            .find_path(g.nodes_named("A"), g.nodes_named("Z"))
            .unwrap();

        assert_eq!(path.cost, 1000);
        assert_eq!(path.distance, 3);
        assert_eq!(names(&g, &path), vec!["A", "X", "X", "Y", "Y", "Z"]);
    }

    #[test]
    fn equal_cost_distance_same_both_ways() {
        let g = equal_cost_network();
        let costs = CostConfig::default();
        let solver = PathSolver::new(&g, &costs);

        let there = solver
            .find_path(g.nodes_named("A"), g.nodes_named("Z"))
            .unwrap();
        let back = solver
            .find_path(g.nodes_named("Z"), g.nodes_named("A"))
            .unwrap();
        assert_eq!((there.cost, there.distance), (back.cost, back.distance));
    }

    #[test]
    fn start_equals_end() {
        let t = TopologyBuilder::new().line("L1", &["A", "B"]).build();
        let g = Graph::from_topology(&t);
        let costs = CostConfig::default();
        let path = PathSolver::new(&g, &costs)
            .find_path(g.nodes_named("A"), g.nodes_named("A"))
            .unwrap();
        assert_eq!(path.nodes.len(), 1);
        assert_eq!(path.distance, 0);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn disconnected_returns_none() {
        let t = TopologyBuilder::new()
            .line("L1", &["A", "B"])
            .line("L2", &["C", "D"])
            .build();
        let g = Graph::from_topology(&t);
        let costs = CostConfig::default();
        let solver = PathSolver::new(&g, &costs);

        assert!(solver.find_path(g.nodes_named("A"), g.nodes_named("D")).is_none());
    }

    #[test]
    fn empty_candidates_return_none() {
        let t = TopologyBuilder::new().line("L1", &["A", "B"]).build();
        let g = Graph::from_topology(&t);
        let costs = CostConfig::default();
        let solver = PathSolver::new(&g, &costs);

        assert!(solver.find_path(&[], g.nodes_named("B")).is_none());
        assert!(solver.find_path(g.nodes_named("A"), &[]).is_none());
    }

    #[test]
    fn multi_source_picks_cheapest_start() {
        // "Hub" is on both lines; the L2 occurrence is one stop from Z.
        let t = TopologyBuilder::new()
            .line("L1", &["Hub", "P", "Q", "Z"])
            .line("L2", &["Hub", "Z"])
            .build();
        let g = Graph::from_topology(&t);
        let costs = CostConfig::default();
        let path = PathSolver::new(&g, &costs)
            .find_path(g.nodes_named("Hub"), g.nodes_named("Z"))
            .unwrap();

        assert_eq!(path.distance, 1);
        assert_eq!(path.cost, 100);
        assert_eq!(path.nodes.len(), 2);
    }
}
