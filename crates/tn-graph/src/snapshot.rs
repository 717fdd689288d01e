//! Stable on-disk graph snapshot (JSON).
//!
//! ```json
//! {
//!   "nodes": [{ "id": "IDFM:71370", "name": "Nation", "line": "1,2,6,9", "x": 48.848, "y": 2.396 }],
//!   "edges": [{ "from": "IDFM:71370", "to": "IDFM:71402", "duration": 85, "type": "ride", "line": "1" }]
//! }
//! ```
//!
//! `x` is latitude and `y` longitude; both are omitted for stations without
//! coordinates.  `line` on a node is the sorted, comma-joined line set.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tn_core::{EdgeKind, GeoPoint, LineId, Seconds};

use crate::{Graph, GraphBuilder, GraphResult, Station};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub from: String,
    pub to: String,
    pub duration: Seconds,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

/// Serde model of a whole graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<SnapshotNode>,
    pub edges: Vec<SnapshotEdge>,
}

impl Snapshot {
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .stations
            .iter()
            .map(|s| SnapshotNode {
                id: s.id.clone(),
                name: s.name.clone(),
                line: s.lines_label(),
                x: s.coords.map(|p| p.lat),
                y: s.coords.map(|p| p.lon),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|e| SnapshotEdge {
                from: graph.station(e.from).id.clone(),
                to: graph.station(e.to).id.clone(),
                duration: e.duration,
                kind: e.kind,
                line: e.line.map(|l| l.0.clone()),
            })
            .collect();

        Self { nodes, edges }
    }

    /// Rebuild the graph, enforcing every [`Graph`] invariant.
    ///
    /// Duplicate node ids, edges naming an unknown node, self-loops, and
    /// repeated directed edges are rejected.
    pub fn into_graph(self) -> GraphResult<Graph> {
        let mut b = GraphBuilder::with_capacity(self.nodes.len(), self.edges.len());
        for node in self.nodes {
            let mut station = Station::new(node.id, node.name).with_lines(
                node.line
                    .split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(LineId::from),
            );
            if let (Some(lat), Some(lon)) = (node.x, node.y) {
                station = station.with_coords(GeoPoint::new(lat, lon));
            }
            b.add_station(station)?;
        }
        for edge in self.edges {
            b.add_edge(&edge.from, &edge.to, edge.duration, edge.kind, edge.line.map(LineId::from))?;
        }
        Ok(b.build())
    }

    pub fn from_json_str(s: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read a snapshot file and build its graph.
pub fn load_snapshot(path: &Path) -> GraphResult<Graph> {
    let file = File::open(path)?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        "read graph snapshot"
    );
    snapshot.into_graph()
}

/// Write `graph` to `path` as pretty-printed JSON.
pub fn save_snapshot(graph: &Graph, path: &Path) -> GraphResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &Snapshot::from_graph(graph))?;
    out.flush()?;
    debug!(
        path = %path.display(),
        nodes = graph.station_count(),
        edges = graph.edge_count(),
        "wrote graph snapshot"
    );
    Ok(())
}
