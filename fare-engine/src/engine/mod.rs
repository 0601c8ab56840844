//! Fare engine: the entry point callers use to price journeys.
//!
//! The engine lazily builds the routing graph from its topology source,
//! resolves station codes to ride nodes, solves the cheapest path and then
//! prices and segments it. Every expected failure is reported through
//! [`QuoteMode`]; `quote` never returns an error.

mod quote;
mod station_info;


use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::{Line, LineId};
use crate::fare::FareCalculator;
use crate::graph::{CostConfig, Graph, GraphStats, GraphStore, PathSolver};
use crate::route::segment;
use crate::topology::{TopologyError, TopologySource};

pub use quote::{FareQuote, QuoteMode};
pub use station_info::StationInfo;

/// Upper bound on station search results.
const MAX_SEARCH_RESULTS: usize = 50;

/// Fare and itinerary service over one topology source.
///
/// Safe to share between threads: queries read an immutable graph
/// snapshot while rebuilds publish a new one atomically.
#[derive(Debug)]
pub struct FareEngine<S> {
    source: S,
    store: GraphStore,
    calculator: FareCalculator,
    costs: CostConfig,
}

impl<S: TopologySource> FareEngine<S> {
    /// Create an engine. The graph is not built until first use.
    ///
    /// Fare tiers are sorted by ceiling here, so a table built by hand or
    /// deserialized out of order still prices correctly.
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self {
            source,
            store: GraphStore::new(),
            calculator: FareCalculator::new(config.fare),
            costs: config.costs,
        }
    }

    /// The topology source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The fare calculator in use.
    pub fn calculator(&self) -> &FareCalculator {
        &self.calculator
    }

    /// Solver edge weights in use.
    pub fn costs(&self) -> &CostConfig {
        &self.costs
    }

    /// Build the graph if it has never been built or was invalidated.
    ///
    /// Returns the current graph snapshot. A failed load is logged and the
    /// previously published graph stays in place; the next call retries.
    pub fn ensure_graph_built(&self) -> Arc<Graph> {
        if self.store.claim_build()
            && let Err(e) = self.build_and_publish()
        {
            self.store.invalidate();
            warn!(error = %e, "Failed to load topology, keeping current graph");
        }
        self.store.load()
    }

    /// Load topology and publish a freshly built graph now.
    pub fn rebuild(&self) -> Result<GraphStats, TopologyError> {
        self.store.claim_build();
        self.build_and_publish().inspect_err(|_| self.store.invalidate())
    }

    fn build_and_publish(&self) -> Result<GraphStats, TopologyError> {
        let topology = self.source.load()?;
        if topology.is_empty() {
            warn!("Topology has no line-station rows, graph will be empty");
        }
        let graph = Graph::from_topology(&topology);
        Ok(self.store.publish(graph))
    }

    /// Signal that topology changed. The next query rebuilds the graph.
    pub fn invalidate(&self) {
        self.store.invalidate();
    }

    /// Price and segment the journey between two station codes.
    pub fn quote(&self, from_code: &str, to_code: &str) -> FareQuote {
        let graph = self.ensure_graph_built();

        let (Some(from), Some(to)) = (
            graph.station_by_code(from_code),
            graph.station_by_code(to_code),
        ) else {
            debug!(from = from_code, to = to_code, "Station code not found");
            return FareQuote::failed(from_code, to_code, QuoteMode::StationNotFound);
        };

        let start = graph.nodes_named(&from.name);
        let end = graph.nodes_named(&to.name);
        if start.is_empty() || end.is_empty() {
            debug!(from = %from.name, to = %to.name, "Station has no ride nodes");
            return FareQuote::failed(from_code, to_code, QuoteMode::NodesNotFound);
        }

        let Some(path) = PathSolver::new(&graph, &self.costs).find_path(start, end) else {
            debug!(from = %from.name, to = %to.name, "No path between stations");
            return FareQuote::failed(from_code, to_code, QuoteMode::Unreachable);
        };

        let price = self.calculator.price(path.distance);
        let codes = path
            .nodes
            .iter()
            .filter_map(|id| graph.node(*id))
            .map(|n| n.station_code.clone())
            .collect();
        let steps = segment(&graph, &path.nodes);

        debug!(
            from = %from.name,
            to = %to.name,
            distance = path.distance,
            cost = path.cost,
            legs = steps.len(),
            %price,
            "Quoted fare"
        );

        FareQuote {
            from: from_code.to_string(),
            to: to_code.to_string(),
            segments: path.distance,
            price,
            mode: QuoteMode::HangzhouRule,
            path: codes,
            steps,
        }
    }

    /// Active stations whose name contains `keyword`, one per name.
    ///
    /// An empty keyword lists every active station without a limit;
    /// otherwise at most `limit` results (capped at 50) are returned.
    pub fn search_stations(&self, keyword: &str, limit: usize) -> Vec<StationInfo> {
        let graph = self.ensure_graph_built();
        let keyword = keyword.trim();
        let limit = if keyword.is_empty() {
            usize::MAX
        } else {
            limit.min(MAX_SEARCH_RESULTS)
        };

        let mut seen = std::collections::HashSet::new();
        graph
            .stations()
            .iter()
            .filter(|s| s.is_active && s.name.contains(keyword))
            .filter(|s| seen.insert(s.name.as_str()))
            .take(limit)
            .map(|s| StationInfo::new(s.clone(), graph.line(s.line_id)))
            .collect()
    }

    /// Active stations whose primary line is `line_id`, ordered by id.
    pub fn stations_on_line(&self, line_id: LineId) -> Vec<StationInfo> {
        let graph = self.ensure_graph_built();
        let line = graph.line(line_id);
        let mut stations: Vec<StationInfo> = graph
            .stations()
            .iter()
            .filter(|s| s.is_active && s.line_id == line_id)
            .map(|s| StationInfo::new(s.clone(), line))
            .collect();
        stations.sort_by_key(|s| s.station.id);
        stations
    }

    /// Active lines, ordered by id.
    pub fn lines(&self) -> Vec<Line> {
        self.ensure_graph_built()
            .lines()
            .filter(|l| l.is_active)
            .cloned()
            .collect()
    }
}
