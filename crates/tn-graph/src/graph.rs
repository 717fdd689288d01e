//! Logical-station graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `StationIdx s`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_*[ node_out_start[s] .. node_out_start[s+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_duration`, `edge_kind`,
//! `edge_line`) are sorted by `(from, to)` and indexed by `EdgeIdx`.
//! Iteration over a station's outgoing edges is a contiguous memory scan.
//!
//! Incoming edges are kept in a second CSR (`node_in_start` / `in_edges`) so
//! undirected traversals (connectivity) never rebuild an adjacency list.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest station that
//! carries coordinates.
//!
//! # Invariants
//!
//! - Station ids are unique.
//! - Every edge's endpoints are stations of this graph.
//! - No self-loops; at most one edge per ordered `(from, to)` pair.
//!
//! A `Graph` is never mutated after [`GraphBuilder::build`].

use std::collections::BTreeSet;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::{FxHashMap, FxHashSet};

use tn_core::{EdgeIdx, EdgeKind, GeoPoint, LineId, Seconds, StationIdx};

use crate::{GraphError, GraphResult};

// ── Station ───────────────────────────────────────────────────────────────────

/// A user-facing stop merged from one or more physical stop records.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    /// Parent-station id, or the stop's own id when it has no parent.
    pub id: String,
    pub name: String,
    /// Every line with a ride edge touching this station.
    pub lines: BTreeSet<LineId>,
    pub coords: Option<GeoPoint>,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lines: BTreeSet::new(),
            coords: None,
        }
    }

    pub fn with_lines<I, L>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LineId>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn with_coords(mut self, coords: GeoPoint) -> Self {
        self.coords = Some(coords);
        self
    }

    /// Lines joined with `,` in sorted order, e.g. `"1,4"`.
    pub fn lines_label(&self) -> String {
        self.lines.iter().map(LineId::as_str).collect::<Vec<_>>().join(",")
    }
}

// ── R-tree station entry ──────────────────────────────────────────────────────

#[derive(Clone)]
struct StationEntry {
    point: [f64; 2], // [lat, lon]
    idx: StationIdx,
}

impl RTreeObject for StationEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StationEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-station queries within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── EdgeRef ───────────────────────────────────────────────────────────────────

/// Borrowed view of one directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeRef<'a> {
    pub idx: EdgeIdx,
    pub from: StationIdx,
    pub to: StationIdx,
    pub duration: Seconds,
    pub kind: EdgeKind,
    /// Present only for ride edges.
    pub line: Option<&'a LineId>,
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Immutable directed station graph in CSR format.
///
/// All arrays are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`GraphBuilder`].
pub struct Graph {
    // ── Station data ──────────────────────────────────────────────────────
    /// Indexed by `StationIdx`.
    pub stations: Vec<Station>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Outgoing edges of station `s` are at EdgeIdx
    /// `node_out_start[s] .. node_out_start[s+1]`.  Length = `station_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Incoming edges of station `s` are `in_edges[node_in_start[s] .. node_in_start[s+1]]`.
    pub node_in_start: Vec<u32>,
    pub in_edges: Vec<EdgeIdx>,

    // ── Edge data (indexed by EdgeIdx = position in sorted order) ─────────
    pub edge_from: Vec<StationIdx>,
    pub edge_to: Vec<StationIdx>,
    /// Travel or transfer time in seconds.  Dijkstra edge cost.
    pub edge_duration: Vec<Seconds>,
    pub edge_kind: Vec<EdgeKind>,
    pub edge_line: Vec<Option<LineId>>,

    index: FxHashMap<String, StationIdx>,
    spatial_idx: RTree<StationEntry>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("stations", &self.station_count())
            .field("edges", &self.edge_count())
            .field("located", &self.spatial_idx.size())
            .finish()
    }
}

impl Graph {
    /// Construct a graph with no stations or edges.
    ///
    /// Every query against it reports `UnknownStation`.
    pub fn empty() -> Self {
        GraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    // ── Station lookup ────────────────────────────────────────────────────

    #[inline]
    pub fn station(&self, idx: StationIdx) -> &Station {
        &self.stations[idx.index()]
    }

    /// The index of the station with this id, if present.
    #[inline]
    pub fn idx_of(&self, id: &str) -> Option<StationIdx> {
        self.index.get(id).copied()
    }

    /// Like [`idx_of`](Self::idx_of) but reports absence as
    /// [`GraphError::UnknownStation`].
    pub fn resolve(&self, id: &str) -> GraphResult<StationIdx> {
        self.idx_of(id)
            .ok_or_else(|| GraphError::UnknownStation(id.to_owned()))
    }

    pub fn station_by_id(&self, id: &str) -> Option<&Station> {
        self.idx_of(id).map(|idx| self.station(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All station indices in ascending order.
    pub fn station_indices(&self) -> impl Iterator<Item = StationIdx> + '_ {
        (0..self.stations.len()).map(|i| StationIdx(i as u32))
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Iterator over the `EdgeIdx`s of all outgoing edges from `station`.
    ///
    /// A contiguous index range; no heap allocation.
    #[inline]
    pub fn out_edges(&self, station: StationIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        let start = self.node_out_start[station.index()] as usize;
        let end = self.node_out_start[station.index() + 1] as usize;
        (start..end).map(|i| EdgeIdx(i as u32))
    }

    /// Iterator over the `EdgeIdx`s of all edges arriving at `station`.
    #[inline]
    pub fn in_edges(&self, station: StationIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        let start = self.node_in_start[station.index()] as usize;
        let end = self.node_in_start[station.index() + 1] as usize;
        self.in_edges[start..end].iter().copied()
    }

    #[inline]
    pub fn out_degree(&self, station: StationIdx) -> usize {
        let s = station.index();
        (self.node_out_start[s + 1] - self.node_out_start[s]) as usize
    }

    #[inline]
    pub fn in_degree(&self, station: StationIdx) -> usize {
        let s = station.index();
        (self.node_in_start[s + 1] - self.node_in_start[s]) as usize
    }

    /// `true` if no edge starts or ends at `station`.
    #[inline]
    pub fn is_isolated(&self, station: StationIdx) -> bool {
        self.out_degree(station) == 0 && self.in_degree(station) == 0
    }

    /// Stations sharing an edge with `station` in either direction.  A
    /// neighbour connected both ways appears twice.
    pub fn undirected_neighbors(&self, station: StationIdx) -> impl Iterator<Item = StationIdx> + '_ {
        self.out_edges(station)
            .map(|e| self.edge_to[e.index()])
            .chain(self.in_edges(station).map(|e| self.edge_from[e.index()]))
    }

    pub fn edge(&self, idx: EdgeIdx) -> EdgeRef<'_> {
        let i = idx.index();
        EdgeRef {
            idx,
            from: self.edge_from[i],
            to: self.edge_to[i],
            duration: self.edge_duration[i],
            kind: self.edge_kind[i],
            line: self.edge_line[i].as_ref(),
        }
    }

    /// All edges in `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        (0..self.edge_count()).map(|i| self.edge(EdgeIdx(i as u32)))
    }

    /// The directed edge `from → to`, if one exists.
    pub fn find_edge(&self, from: StationIdx, to: StationIdx) -> Option<EdgeIdx> {
        let start = self.node_out_start[from.index()] as usize;
        let end = self.node_out_start[from.index() + 1] as usize;
        // Outgoing slices are sorted by destination.
        self.edge_to[start..end]
            .binary_search(&to)
            .ok()
            .map(|off| EdgeIdx((start + off) as u32))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The station nearest to `pos` among those with coordinates.
    pub fn nearest_station(&self, pos: GeoPoint) -> Option<StationIdx> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.idx)
    }

    /// [`nearest_station`](Self::nearest_station) plus its great-circle
    /// distance from `pos` in metres.
    pub fn nearest_station_distance(&self, pos: GeoPoint) -> Option<(StationIdx, f64)> {
        let idx = self.nearest_station(pos)?;
        let coords = self.station(idx).coords?;
        Some((idx, pos.distance_m(coords)))
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`Graph`] incrementally, then call [`build`](Self::build).
///
/// Stations must be added before edges that reference them.  Edges may be
/// added in any order; `build()` sorts them by `(from, to)`, constructs both
/// CSR arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use tn_graph::{GraphBuilder, Station};
///
/// let mut b = GraphBuilder::new();
/// b.add_station(Station::new("A", "Alpha").with_lines(["1"])).unwrap();
/// b.add_station(Station::new("B", "Beta").with_lines(["1"])).unwrap();
/// b.add_ride("A", "B", 90, "1").unwrap();
/// b.add_ride("B", "A", 95, "1").unwrap();
/// let g = b.build();
/// assert_eq!(g.station_count(), 2);
/// assert_eq!(g.edge_count(), 2);
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    stations:  Vec<Station>,
    index:     FxHashMap<String, StationIdx>,
    raw_edges: Vec<RawEdge>,
    pairs:     FxHashSet<(StationIdx, StationIdx)>,
}

struct RawEdge {
    from:     StationIdx,
    to:       StationIdx,
    duration: Seconds,
    kind:     EdgeKind,
    line:     Option<LineId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of stations and edges.
    pub fn with_capacity(stations: usize, edges: usize) -> Self {
        Self {
            stations:  Vec::with_capacity(stations),
            index:     FxHashMap::with_capacity_and_hasher(stations, Default::default()),
            raw_edges: Vec::with_capacity(edges),
            pairs:     FxHashSet::with_capacity_and_hasher(edges, Default::default()),
        }
    }

    /// Add a station and return its index (sequential from 0).
    pub fn add_station(&mut self, station: Station) -> GraphResult<StationIdx> {
        if self.index.contains_key(&station.id) {
            return Err(GraphError::DuplicateStation(station.id));
        }
        let idx = StationIdx(self.stations.len() as u32);
        self.index.insert(station.id.clone(), idx);
        self.stations.push(station);
        Ok(idx)
    }

    /// Add a **directed** edge between two previously added stations.
    ///
    /// `line` is kept for ride edges and discarded for transfers.
    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        duration: Seconds,
        kind: EdgeKind,
        line: Option<LineId>,
    ) -> GraphResult<()> {
        let f = self.lookup(from)?;
        let t = self.lookup(to)?;
        if f == t {
            return Err(GraphError::SelfLoop(from.to_owned()));
        }
        if !self.pairs.insert((f, t)) {
            return Err(GraphError::DuplicateEdge { from: from.to_owned(), to: to.to_owned() });
        }
        let line = match kind {
            EdgeKind::Ride => line,
            EdgeKind::Transfer => None,
        };
        self.raw_edges.push(RawEdge { from: f, to: t, duration, kind, line });
        Ok(())
    }

    /// Convenience: a directed ride edge on `line`.
    pub fn add_ride(&mut self, from: &str, to: &str, duration: Seconds, line: impl Into<LineId>) -> GraphResult<()> {
        self.add_edge(from, to, duration, EdgeKind::Ride, Some(line.into()))
    }

    /// Convenience: a directed transfer edge.
    pub fn add_transfer(&mut self, from: &str, to: &str, duration: Seconds) -> GraphResult<()> {
        self.add_edge(from, to, duration, EdgeKind::Transfer, None)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn station_count(&self) -> usize { self.stations.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    fn lookup(&self, id: &str) -> GraphResult<StationIdx> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownStation(id.to_owned()))
    }

    /// Consume the builder and produce a [`Graph`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> Graph {
        let station_count = self.stations.len();
        let edge_count = self.raw_edges.len();

        // (from, to) pairs are unique, so the order is total.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| (e.from, e.to));

        let edge_from: Vec<StationIdx> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<StationIdx> = raw.iter().map(|e| e.to).collect();
        let edge_duration: Vec<Seconds> = raw.iter().map(|e| e.duration).collect();
        let edge_kind: Vec<EdgeKind> = raw.iter().map(|e| e.kind).collect();
        let edge_line: Vec<Option<LineId>> = raw.into_iter().map(|e| e.line).collect();

        let node_out_start = row_pointers(station_count, &edge_from);
        debug_assert_eq!(node_out_start[station_count] as usize, edge_count);

        // Reverse CSR: counting sort of edge ids by destination.  Edge ids
        // are visited in ascending order, so each incoming slice is sorted.
        let node_in_start = row_pointers(station_count, &edge_to);
        let mut cursor: Vec<u32> = node_in_start[..station_count].to_vec();
        let mut in_edges = vec![EdgeIdx::INVALID; edge_count];
        for (i, to) in edge_to.iter().enumerate() {
            let slot = &mut cursor[to.index()];
            in_edges[*slot as usize] = EdgeIdx(i as u32);
            *slot += 1;
        }

        let entries: Vec<StationEntry> = self
            .stations
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                s.coords.map(|p| StationEntry {
                    point: [p.lat, p.lon],
                    idx: StationIdx(i as u32),
                })
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Graph {
            stations: self.stations,
            node_out_start,
            node_in_start,
            in_edges,
            edge_from,
            edge_to,
            edge_duration,
            edge_kind,
            edge_line,
            index: self.index,
            spatial_idx,
        }
    }
}

/// CSR row pointer over `keys` (one entry per edge).
fn row_pointers(station_count: usize, keys: &[StationIdx]) -> Vec<u32> {
    let mut start = vec![0u32; station_count + 1];
    for k in keys {
        start[k.index() + 1] += 1;
    }
    for i in 1..=station_count {
        start[i] += start[i - 1];
    }
    start
}
