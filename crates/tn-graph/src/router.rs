//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Query entry points call routing via the [`Router`] trait, so applications
//! can swap in other implementations (A*, contraction hierarchies) without
//! touching the graph.  The default [`DijkstraRouter`] is a binary-heap
//! Dijkstra: O((V + E) log V).
//!
//! # Cost units
//!
//! Edge costs are `edge_duration` seconds (`u32`, so never negative); path
//! totals accumulate in `u64`.
//!
//! # Outcomes
//!
//! - Unknown source or destination id → [`GraphError::UnknownStation`].
//! - Valid stations with no path → `Ok` with an empty [`PathResult`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tn_core::{EdgeIdx, EdgeKind, LineId, Seconds, StationIdx};

use crate::{Graph, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A path through the graph as edge indices, from source to destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub edges: Vec<EdgeIdx>,
    /// Sum of `edge_duration` over `edges`.
    pub total_secs: u64,
}

impl Route {
    /// `true` if the source and destination are the same station.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── PathResult ────────────────────────────────────────────────────────────────

/// One traversed edge of a [`PathResult`], in station-id terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub from: String,
    pub to: String,
    pub duration: Seconds,
    pub kind: EdgeKind,
    pub line: Option<LineId>,
    /// Seconds from departure at the source until reaching `to`.
    pub arrival: u64,
}

/// Shortest-path query output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathResult {
    /// Station ids from source to destination inclusive; empty if unreachable.
    pub path: Vec<String>,
    /// Sum of edge durations along `path`; `None` if unreachable.
    pub total_time: Option<u64>,
    pub steps: Vec<PathStep>,
}

impl PathResult {
    /// The "no path" outcome.
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn is_reachable(&self) -> bool {
        self.total_time.is_some()
    }

    /// Expand a [`Route`] starting at `from` into station ids and steps.
    pub fn from_route(graph: &Graph, from: StationIdx, route: &Route) -> Self {
        let mut path = Vec::with_capacity(route.edges.len() + 1);
        path.push(graph.station(from).id.clone());

        let mut arrival = 0u64;
        let steps: Vec<PathStep> = route
            .edges
            .iter()
            .map(|&e| {
                let edge = graph.edge(e);
                let to = graph.station(edge.to).id.clone();
                path.push(to.clone());
                arrival += u64::from(edge.duration);
                PathStep {
                    from: graph.station(edge.from).id.clone(),
                    to,
                    duration: edge.duration,
                    kind: edge.kind,
                    line: edge.line.cloned(),
                    arrival,
                }
            })
            .collect();

        Self {
            path,
            total_time: Some(route.total_secs),
            steps,
        }
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve concurrent
/// queries against a shared `Graph`.  Each call owns its working state.
pub trait Router: Send + Sync {
    /// Compute a minimum-duration route from `from` to `to`.
    ///
    /// Returns `None` if `to` is unreachable.  `from == to` is an empty
    /// route, not `None`.
    fn route(&self, graph: &Graph, from: StationIdx, to: StationIdx) -> Option<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR station graph.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &Graph, from: StationIdx, to: StationIdx) -> Option<Route> {
        dijkstra(graph, from, to)
    }
}

fn dijkstra(graph: &Graph, from: StationIdx, to: StationIdx) -> Option<Route> {
    if from == to {
        return Some(Route { edges: vec![], total_secs: 0 });
    }

    let n = graph.station_count();
    // dist[v] = best known cost (s) to reach v.
    let mut dist = vec![u64::MAX; n];
    // prev_edge[v] = EdgeIdx that reached v; EdgeIdx::INVALID for unreached stations.
    let mut prev_edge = vec![EdgeIdx::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, station). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key StationIdx ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, StationIdx)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, station))) = heap.pop() {
        if station == to {
            return reconstruct(graph, &prev_edge, from, to, cost);
        }

        // Skip stale heap entries.
        if cost > dist[station.index()] {
            continue;
        }

        for edge in graph.out_edges(station) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost.saturating_add(u64::from(graph.edge_duration[edge.index()]));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    None
}

/// Walk `prev_edge` back from `to`.  A walk that does not end at `from` is
/// reported as no route.
fn reconstruct(
    graph: &Graph,
    prev_edge: &[EdgeIdx],
    from: StationIdx,
    to: StationIdx,
    total_secs: u64,
) -> Option<Route> {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == EdgeIdx::INVALID || edges.len() >= graph.station_count() {
            return None;
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();
    Some(Route { edges, total_secs })
}

// ── Query entry points ────────────────────────────────────────────────────────

/// Shortest travel time between two stations by id, using [`DijkstraRouter`].
///
/// Fails with `UnknownStation` if either id is absent; an unreachable
/// destination is an `Ok` empty result.
pub fn shortest_path(graph: &Graph, source: &str, destination: &str) -> GraphResult<PathResult> {
    shortest_path_with(&DijkstraRouter, graph, source, destination)
}

/// [`shortest_path`] with a caller-chosen [`Router`].
pub fn shortest_path_with<R: Router + ?Sized>(
    router: &R,
    graph: &Graph,
    source: &str,
    destination: &str,
) -> GraphResult<PathResult> {
    let from = graph.resolve(source)?;
    let to = graph.resolve(destination)?;
    Ok(match router.route(graph, from, to) {
        Some(route) => PathResult::from_route(graph, from, &route),
        None => PathResult::unreachable(),
    })
}

/// Answer many `(source, destination)` queries against one graph.
///
/// Results align with `pairs`.  With the `parallel` feature the queries run
/// on Rayon's thread pool; the graph is shared read-only.
pub fn shortest_paths<S>(graph: &Graph, pairs: &[(S, S)]) -> Vec<GraphResult<PathResult>>
where
    S: AsRef<str> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        pairs
            .par_iter()
            .map(|(s, d)| shortest_path(graph, s.as_ref(), d.as_ref()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        pairs
            .iter()
            .map(|(s, d)| shortest_path(graph, s.as_ref(), d.as_ref()))
            .collect()
    }
}
