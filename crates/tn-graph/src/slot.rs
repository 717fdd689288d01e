//! Shared handle for the graph currently being served.
//!
//! Queries take an `Arc<Graph>` from [`GraphSlot::current`] and run against
//! that snapshot for their whole lifetime.  A rebuild constructs a complete
//! new `Graph` off to the side and installs it with [`GraphSlot::replace`];
//! in-flight queries keep the old graph alive until they drop their `Arc`.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::Graph;

pub struct GraphSlot {
    current: RwLock<Arc<Graph>>,
}

impl GraphSlot {
    pub fn new(graph: Graph) -> Self {
        Self { current: RwLock::new(Arc::new(graph)) }
    }

    /// The graph to run the next query against.
    pub fn current(&self) -> Arc<Graph> {
        // The lock only guards a pointer swap, so a poisoned lock still
        // holds a complete graph.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install a fully built graph; returns the one it replaces.
    pub fn replace(&self, graph: Graph) -> Arc<Graph> {
        let next = Arc::new(graph);
        info!(
            stations = next.station_count(),
            edges = next.edge_count(),
            "installing rebuilt graph"
        );
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}

impl Default for GraphSlot {
    fn default() -> Self {
        Self::new(Graph::empty())
    }
}
