//! Minimum spanning forest (Kruskal) over the graph treated as undirected.
//!
//! # Canonical pairs
//!
//! Each undirected station pair `{u, v}` contributes one candidate.  Order the
//! pair so `u.id < v.id` lexicographically; the weight and line come from the
//! `u → v` edge when it passes the filter, otherwise from `v → u`.  Candidates
//! are processed by `(weight, u.id, v.id)`, so equal weights resolve the same
//! way on every run.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use tn_core::{EdgeIdx, EdgeKind, LineId, Seconds, StationIdx};

use crate::Graph;

// ── EdgeFilter ────────────────────────────────────────────────────────────────

/// Which edge classes participate in a spanning-forest query.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum EdgeFilter {
    #[default]
    All,
    Only(EdgeKind),
}

impl EdgeFilter {
    #[inline]
    pub fn admits(self, kind: EdgeKind) -> bool {
        match self {
            EdgeFilter::All => true,
            EdgeFilter::Only(k) => k == kind,
        }
    }
}

impl From<Option<EdgeKind>> for EdgeFilter {
    fn from(kind: Option<EdgeKind>) -> Self {
        kind.map_or(EdgeFilter::All, EdgeFilter::Only)
    }
}

// ── Result types ──────────────────────────────────────────────────────────────

/// One undirected forest edge, endpoints in canonical (lexicographic) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestEdge {
    pub from: String,
    pub to: String,
    pub weight: Seconds,
    pub line: Option<LineId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpanningForest {
    /// In the order Kruskal accepted them (ascending weight).
    pub edges: Vec<ForestEdge>,
    pub total_weight: u64,
}

// ── Union-find ────────────────────────────────────────────────────────────────

/// Disjoint-set forest with union by rank and path halving.
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
        }
    }

    /// Representative of `x`'s set.
    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    /// Merge the sets of `a` and `b`.  Returns `false` if they were already
    /// one set.
    pub fn union(&mut self, a: u32, b: u32) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            Ordering::Less => self.parent[ra as usize] = rb,
            Ordering::Greater => self.parent[rb as usize] = ra,
            Ordering::Equal => {
                self.parent[rb as usize] = ra;
                self.rank[ra as usize] += 1;
            }
        }
        true
    }
}

// ── Kruskal ───────────────────────────────────────────────────────────────────

struct Candidate {
    lo: StationIdx,
    hi: StationIdx,
    edge: EdgeIdx,
}

/// Minimum spanning forest of the subgraph whose edges pass `filter`.
///
/// A disconnected subgraph yields one tree per component; stations with no
/// admitted edge do not appear.
pub fn minimum_spanning_forest(graph: &Graph, filter: EdgeFilter) -> SpanningForest {
    let id = |s: StationIdx| graph.station(s).id.as_str();

    // ── Canonicalize directed edges into undirected candidates ────────────
    let mut by_pair: FxHashMap<(StationIdx, StationIdx), Candidate> = FxHashMap::default();
    for edge in graph.edges() {
        if !filter.admits(edge.kind) {
            continue;
        }
        let forward = id(edge.from) < id(edge.to);
        let (lo, hi) = if forward { (edge.from, edge.to) } else { (edge.to, edge.from) };
        let candidate = Candidate { lo, hi, edge: edge.idx };
        if forward {
            by_pair.insert((lo, hi), candidate);
        } else {
            by_pair.entry((lo, hi)).or_insert(candidate);
        }
    }

    let mut candidates: Vec<Candidate> = by_pair.into_values().collect();
    candidates.sort_unstable_by(|a, b| {
        graph.edge_duration[a.edge.index()]
            .cmp(&graph.edge_duration[b.edge.index()])
            .then_with(|| id(a.lo).cmp(id(b.lo)))
            .then_with(|| id(a.hi).cmp(id(b.hi)))
    });

    // ── Greedy selection ──────────────────────────────────────────────────
    let mut sets = UnionFind::new(graph.station_count());
    let mut forest = SpanningForest::default();
    for c in candidates {
        if !sets.union(c.lo.0, c.hi.0) {
            continue;
        }
        let edge = graph.edge(c.edge);
        forest.total_weight += u64::from(edge.duration);
        forest.edges.push(ForestEdge {
            from: id(c.lo).to_owned(),
            to: id(c.hi).to_owned(),
            weight: edge.duration,
            line: edge.line.cloned(),
        });
        if forest.edges.len() + 1 >= graph.station_count() {
            break;
        }
    }

    forest
}
