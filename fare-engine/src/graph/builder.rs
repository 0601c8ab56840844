//! Ride-node graph construction.
//!
//! Every line-station row becomes one ride node. Sequence-adjacent nodes on
//! a line are joined by physical edges; nodes at the same physical station
//! on different lines are joined by transfer edges. Transfers are thus plain
//! edges and the solver needs no special casing beyond edge weights.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::domain::{Line, LineId, LineStation, NodeId, Station, StationId};
use crate::topology::Topology;

/// A graph vertex: one station as served by one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideNode {
    pub id: NodeId,
    pub line_id: LineId,
    pub station_id: StationId,
    pub station_name: String,
    pub station_code: String,
}

/// Node and edge counts for logging and admin callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    pub nodes: usize,
    pub physical_edges: usize,
    pub transfer_edges: usize,
}

/// Undirected ride-node graph plus the lookups needed to answer queries.
///
/// A `Graph` is immutable once built. Rebuilding produces a new value.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeMap<NodeId, RideNode>,
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    nodes_by_name: HashMap<String, Vec<NodeId>>,
    lines: BTreeMap<LineId, Line>,
    stations: Vec<Station>,
}

impl Graph {
    /// Build a graph from topology rows.
    ///
    /// Never fails: rows referencing missing stations produce no node, and
    /// edges touching such rows are skipped.
    pub fn build(lines: &[Line], stations: &[Station], line_stations: &[LineStation]) -> Self {
        let station_index: HashMap<StationId, &Station> =
            stations.iter().map(|s| (s.id, s)).collect();

        let mut graph = Graph {
            lines: lines.iter().map(|l| (l.id, l.clone())).collect(),
            stations: stations.to_vec(),
            ..Default::default()
        };

        let mut by_station: BTreeMap<StationId, Vec<NodeId>> = BTreeMap::new();
        let mut by_line: BTreeMap<LineId, Vec<&LineStation>> = BTreeMap::new();

        for ls in line_stations {
            by_line.entry(ls.line_id).or_default().push(ls);

            let Some(station) = station_index.get(&ls.station_id) else {
                debug!(
                    line_station = %ls.id,
                    station = %ls.station_id,
                    "Skipping line-station with unknown station"
                );
                continue;
            };

            let id = NodeId::from(ls.id);
            if graph.nodes.contains_key(&id) {
                warn!(line_station = %ls.id, "Duplicate line-station id, keeping first");
                continue;
            }

            graph.nodes.insert(
                id,
                RideNode {
                    id,
                    line_id: ls.line_id,
                    station_id: ls.station_id,
                    station_name: station.name.clone(),
                    station_code: station.code.clone(),
                },
            );
            graph.adjacency.insert(id, BTreeSet::new());
            graph
                .nodes_by_name
                .entry(station.name.clone())
                .or_default()
                .push(id);
            by_station.entry(ls.station_id).or_default().push(id);
        }

        // Physical edges along each line.
        for (line_id, mut rows) in by_line {
            rows.sort_by_key(|ls| ls.seq);
            for pair in rows.windows(2) {
                if pair[0].seq == pair[1].seq {
                    warn!(line = %line_id, seq = pair[0].seq, "Duplicate sequence number on line");
                }
                graph.add_edge(NodeId::from(pair[0].id), NodeId::from(pair[1].id));
            }
        }

        // Transfer edges, grouped both ways so inconsistent data still links up.
        for group in by_station.values() {
            graph.connect_transfers(group);
        }
        let name_groups: Vec<Vec<NodeId>> = graph.nodes_by_name.values().cloned().collect();
        for group in &name_groups {
            graph.connect_transfers(group);
        }

        let stats = graph.stats();
        debug!(
            nodes = stats.nodes,
            physical_edges = stats.physical_edges,
            transfer_edges = stats.transfer_edges,
            "Graph built"
        );
        graph
    }

    /// Build a graph from a topology snapshot.
    pub fn from_topology(topology: &Topology) -> Self {
        Self::build(
            &topology.lines,
            &topology.stations,
            &topology.line_stations,
        )
    }

    /// Add an undirected edge. Ignores self-loops and unknown nodes.
    fn add_edge(&mut self, a: NodeId, b: NodeId) {
        if a == b || !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return;
        }
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.insert(b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.insert(a);
        }
    }

    /// Connect every pair in the group whose owning lines differ.
    fn connect_transfers(&mut self, group: &[NodeId]) {
        if group.len() < 2 {
            return;
        }
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                if self.is_transfer(a, b) {
                    self.add_edge(a, b);
                }
            }
        }
    }

    /// Returns true if an edge between `a` and `b` would change lines.
    ///
    /// Unknown nodes are never a transfer.
    pub fn is_transfer(&self, a: NodeId, b: NodeId) -> bool {
        match (self.nodes.get(&a), self.nodes.get(&b)) {
            (Some(na), Some(nb)) => na.line_id != nb.line_id,
            _ => false,
        }
    }

    /// Get a ride node by id.
    pub fn node(&self, id: NodeId) -> Option<&RideNode> {
        self.nodes.get(&id)
    }

    /// Iterate over all ride nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &RideNode> {
        self.nodes.values()
    }

    /// Nodes directly reachable from `id`, in ascending id order.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// Returns true if `a` and `b` are joined by an edge.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// All ride nodes whose station carries this display name.
    pub fn nodes_named(&self, name: &str) -> &[NodeId] {
        self.nodes_by_name
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Line info by id.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    /// All lines, in id order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    /// First station record with this external code.
    pub fn station_by_code(&self, code: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.code == code)
    }

    /// All station records, in topology order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Returns true if the graph has no ride nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of ride nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Count nodes and edges by kind.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            nodes: self.nodes.len(),
            ..Default::default()
        };
        for (&a, set) in &self.adjacency {
            for &b in set.range(a..) {
                if self.is_transfer(a, b) {
                    stats.transfer_edges += 1;
                } else {
                    stats.physical_edges += 1;
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineStationId;
    use crate::topology::TopologyBuilder;

    fn line(id: u64, name: &str) -> Line {
        Line::new(LineId(id), name, format!("C{id}"))
    }

    fn station(id: u64, name: &str, line_id: u64) -> Station {
        Station::new(StationId(id), name, format!("S{id}"), LineId(line_id))
    }

    fn row(id: u64, line_id: u64, station_id: u64, seq: u32) -> LineStation {
        LineStation::new(
            LineStationId(id),
            LineId(line_id),
            StationId(station_id),
            seq,
        )
    }

    #[test]
    fn physical_edges_follow_sequence_not_row_order() {
        let lines = vec![line(1, "L1")];
        let stations = vec![station(1, "A", 1), station(2, "B", 1), station(3, "C", 1)];
        // Rows supplied out of order: C, A, B
        let rows = vec![row(30, 1, 3, 3), row(10, 1, 1, 1), row(20, 1, 2, 2)];

        let g = Graph::build(&lines, &stations, &rows);

        assert!(g.has_edge(NodeId(10), NodeId(20)));
        assert!(g.has_edge(NodeId(20), NodeId(30)));
        assert!(!g.has_edge(NodeId(10), NodeId(30)), "non-adjacent stops");
    }

    #[test]
    fn edges_are_symmetric_without_self_loops() {
        let t = TopologyBuilder::new()
            .line("L1", &["A", "B", "C"])
            .line("L2", &["B", "D"])
            .build();
        let g = Graph::from_topology(&t);

        for node in g.nodes() {
            for n in g.neighbors(node.id) {
                assert_ne!(n, node.id);
                assert!(g.has_edge(n, node.id));
            }
        }
    }

    #[test]
    fn transfer_via_shared_station_id() {
        let t = TopologyBuilder::new()
            .line("L1", &["A", "B"])
            .line("L2", &["B", "C"])
            .build();
        let g = Graph::from_topology(&t);

        let b_nodes = g.nodes_named("B");
        assert_eq!(b_nodes.len(), 2);
        assert!(g.has_edge(b_nodes[0], b_nodes[1]));
        assert!(g.is_transfer(b_nodes[0], b_nodes[1]));

        let stats = g.stats();
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.physical_edges, 2);
        assert_eq!(stats.transfer_edges, 1);
    }

    #[test]
    fn transfer_via_shared_name_only() {
        // Separate station records for the same interchange.
        let lines = vec![line(1, "L1"), line(2, "L2")];
        let stations = vec![
            station(1, "A", 1),
            station(2, "Hub", 1),
            station(3, "Hub", 2),
            station(4, "C", 2),
        ];
        let rows = vec![
            row(1, 1, 1, 1),
            row(2, 1, 2, 2),
            row(3, 2, 3, 1),
            row(4, 2, 4, 2),
        ];

        let g = Graph::build(&lines, &stations, &rows);
        assert!(g.has_edge(NodeId(2), NodeId(3)));
        assert!(g.is_transfer(NodeId(2), NodeId(3)));
    }

    #[test]
    fn same_line_same_name_not_connected_as_transfer() {
        // A loop line visiting the same station twice.
        let lines = vec![line(1, "Loop")];
        let stations = vec![station(1, "A", 1), station(2, "B", 1), station(3, "C", 1)];
        let rows = vec![
            row(1, 1, 1, 1),
            row(2, 1, 2, 2),
            row(3, 1, 3, 3),
            row(4, 1, 1, 4),
        ];

        let g = Graph::build(&lines, &stations, &rows);
        assert!(!g.has_edge(NodeId(1), NodeId(4)));
        assert_eq!(g.stats().transfer_edges, 0);
    }

    #[test]
    fn dangling_station_reference_is_skipped() {
        let lines = vec![line(1, "L1")];
        let stations = vec![station(1, "A", 1), station(3, "C", 1)];
        let rows = vec![row(1, 1, 1, 1), row(2, 1, 2, 2), row(3, 1, 3, 3)];

        let g = Graph::build(&lines, &stations, &rows);
        assert_eq!(g.len(), 2);
        assert!(g.node(NodeId(2)).is_none());
        // The gap is not bridged.
        assert!(!g.has_edge(NodeId(1), NodeId(3)));
    }

    #[test]
    fn duplicate_sequence_numbers_do_not_panic() {
        let lines = vec![line(1, "L1")];
        let stations = vec![station(1, "A", 1), station(2, "B", 1), station(3, "C", 1)];
        let rows = vec![row(1, 1, 1, 1), row(2, 1, 2, 1), row(3, 1, 3, 2)];

        let g = Graph::build(&lines, &stations, &rows);
        assert_eq!(g.len(), 3);
        assert!(g.has_edge(NodeId(1), NodeId(2)));
        assert!(g.has_edge(NodeId(2), NodeId(3)));
    }

    #[test]
    fn empty_topology_gives_empty_graph() {
        let g = Graph::build(&[], &[], &[]);
        assert!(g.is_empty());
        assert_eq!(g.stats(), GraphStats::default());
        assert!(g.nodes_named("A").is_empty());
    }

    #[test]
    fn lookups() {
        let t = TopologyBuilder::new().line("1号线", &["A", "B"]).build();
        let g = Graph::from_topology(&t);

        let a = g.station_by_code("A").unwrap();
        assert_eq!(a.name, "A");
        assert!(g.station_by_code("Z").is_none());
        assert_eq!(g.line(LineId(1)).unwrap().name, "1号线");
        assert_eq!(g.lines().count(), 1);
        assert_eq!(g.stations().len(), 2);

        let node = g.node(g.nodes_named("B")[0]).unwrap();
        assert_eq!(node.station_code, "B");
        assert_eq!(node.line_id, LineId(1));
    }

    #[test]
    fn build_is_deterministic() {
        let t = TopologyBuilder::new()
            .line("L1", &["A", "B", "C"])
            .line("L2", &["X", "B", "Y"])
            .line("L3", &["C", "Y"])
            .build();
        let g1 = Graph::from_topology(&t);
        let g2 = Graph::from_topology(&t);

        assert_eq!(g1.stats(), g2.stats());
        for node in g1.nodes() {
            let n1: Vec<_> = g1.neighbors(node.id).collect();
            let n2: Vec<_> = g2.neighbors(node.id).collect();
            assert_eq!(n1, n2);
        }
    }
}
