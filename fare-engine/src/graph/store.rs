//! Atomic publication of rebuilt graphs.
//!
//! Queries take an `Arc<Graph>` snapshot and keep it for their whole run.
//! Rebuilds construct a fresh graph off to the side and publish it with a
//! single pointer swap, so a reader sees either the old graph or the new
//! one, never a half-built one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use tracing::info;

use super::builder::{Graph, GraphStats};

/// Holder for the currently published graph.
#[derive(Debug)]
pub struct GraphStore {
    current: ArcSwap<Graph>,
    /// Set until the first build, and again after each invalidation.
    stale: AtomicBool,
}

impl GraphStore {
    /// Create a store holding an empty graph that still needs building.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Graph::default()),
            stale: AtomicBool::new(true),
        }
    }

    /// Get the current graph snapshot.
    pub fn load(&self) -> Arc<Graph> {
        self.current.load_full()
    }

    /// Returns true if the graph must be (re)built before use.
    pub fn needs_build(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// Mark the topology as changed. The next build check will rebuild.
    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::Release);
    }

    /// Take responsibility for the next build.
    ///
    /// Returns true if the graph was stale, clearing the flag in the same
    /// step. Call this before reading topology: an [`invalidate`] that
    /// lands while the build is running sets the flag again and forces
    /// another build. A caller whose build fails should invalidate again.
    ///
    /// [`invalidate`]: GraphStore::invalidate
    pub fn claim_build(&self) -> bool {
        self.stale.swap(false, Ordering::AcqRel)
    }

    /// Publish a freshly built graph, replacing the current one.
    ///
    /// Leaves the stale flag alone; see [`claim_build`](GraphStore::claim_build).
    pub fn publish(&self, graph: Graph) -> GraphStats {
        let stats = graph.stats();
        self.current.store(Arc::new(graph));
        info!(
            nodes = stats.nodes,
            physical_edges = stats.physical_edges,
            transfer_edges = stats.transfer_edges,
            "Published routing graph"
        );
        stats
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
