//! metro — build a station graph from a GTFS feed and query its snapshot.
//!
//! ```text
//! metro build      --feed gtfs/ --out graph.json [--config feed.json]
//! metro path       --graph graph.json SOURCE DESTINATION [DESTINATION ...]
//! metro connected  --graph graph.json
//! metro components --graph graph.json
//! metro mst        --graph graph.json [--kind ride|transfer]
//! metro nearest    --graph graph.json LAT LON   (distanceM in metres)
//! ```
//!
//! Query results go to stdout as JSON; logs go to stderr (`RUST_LOG`, default
//! `info`).  An unknown station id exits non-zero; an unreachable destination
//! is an ordinary result with an empty `path`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tn_core::{EdgeKind, FeedConfig, GeoPoint};
use tn_feed::{RawFeed, build_graph};
use tn_graph::{
    EdgeFilter, Graph, PathResult, components, is_connected, load_snapshot,
    minimum_spanning_forest, save_snapshot, shortest_paths,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "metro", version, about = "Transit station graph builder and query tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a graph snapshot from an unpacked GTFS directory.
    Build {
        #[arg(long)]
        feed: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// JSON `FeedConfig`; defaults to the Paris metro settings.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Fastest path from SOURCE to each DESTINATION.
    Path {
        #[arg(long)]
        graph: PathBuf,
        source: String,
        #[arg(required = true)]
        destinations: Vec<String>,
    },
    /// Whether every station with an edge is reachable from every other.
    Connected {
        #[arg(long)]
        graph: PathBuf,
    },
    /// Connected components, largest first.
    Components {
        #[arg(long)]
        graph: PathBuf,
    },
    /// Minimum spanning forest, optionally over one edge kind.
    Mst {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        kind: Option<EdgeKind>,
    },
    /// Station closest to a coordinate.
    Nearest {
        #[arg(long)]
        graph: PathBuf,
        lat: f64,
        lon: f64,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::Build { feed, out, config } => build(&feed, &out, config.as_deref())?,
        Command::Path { graph, source, destinations } => {
            let graph = open(&graph)?;
            let pairs: Vec<(&str, &str)> =
                destinations.iter().map(|d| (source.as_str(), d.as_str())).collect();
            let mut results = Vec::with_capacity(pairs.len());
            for result in shortest_paths(&graph, &pairs) {
                results.push(path_json(&result?));
            }
            if results.len() == 1 { results.remove(0) } else { Value::Array(results) }
        }
        Command::Connected { graph } => json!({ "connected": is_connected(&open(&graph)?) }),
        Command::Components { graph } => {
            let set = components(&open(&graph)?);
            json!({
                "count": set.len(),
                "sizes": set.sizes(),
                "components": set.into_inner(),
            })
        }
        Command::Mst { graph, kind } => {
            let forest = minimum_spanning_forest(&open(&graph)?, EdgeFilter::from(kind));
            let edges: Vec<Value> = forest
                .edges
                .iter()
                .map(|e| json!({
                    "from": e.from,
                    "to": e.to,
                    "weight": e.weight,
                    "line": e.line.as_ref().map(|l| l.as_str()),
                }))
                .collect();
            json!({ "edges": edges, "totalWeight": forest.total_weight })
        }
        Command::Nearest { graph, lat, lon } => {
            let graph = open(&graph)?;
            match graph.nearest_station_distance(GeoPoint::new(lat, lon)) {
                Some((idx, metres)) => {
                    let s = graph.station(idx);
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "line": s.lines_label(),
                        "distanceM": metres.round(),
                    })
                }
                None => Value::Null,
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn build(feed_dir: &Path, out: &Path, config: Option<&Path>) -> Result<Value> {
    let config = match config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader::<_, FeedConfig>(BufReader::new(file))
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => FeedConfig::default(),
    };

    let raw = RawFeed::load_dir(feed_dir)
        .with_context(|| format!("loading GTFS feed from {}", feed_dir.display()))?;
    let built = build_graph(&raw, &config)?;
    save_snapshot(&built.graph, out)
        .with_context(|| format!("writing snapshot {}", out.display()))?;
    info!(path = %out.display(), "snapshot written");

    Ok(json!({
        "stations": built.graph.station_count(),
        "edges": built.graph.edge_count(),
        "stationsDropped": built.report.stations_dropped,
        "dataQualityIssues": built.report.data_quality_issues(),
    }))
}

fn open(path: &Path) -> Result<Graph> {
    load_snapshot(path).with_context(|| format!("loading snapshot {}", path.display()))
}

fn path_json(result: &PathResult) -> Value {
    let steps: Vec<Value> = result
        .steps
        .iter()
        .map(|s| json!({
            "from": s.from,
            "to": s.to,
            "duration": s.duration,
            "type": s.kind.as_str(),
            "line": s.line.as_ref().map(|l| l.as_str()),
            "arrival": s.arrival,
        }))
        .collect();
    json!({
        "path": result.path,
        "totalTime": result.total_time,
        "steps": steps,
    })
}
