//! Raw feed → immutable [`Graph`].
//!
//! ```text
//! routes + trips ──► trip_lines ─┐
//! stops ──────────► merge_stations ─┤
//! stop_times ────────────────────► extract_rides ─► extract_transfers ─► dedupe_edges
//!                                                                            │
//!                                      line filter (FeedConfig::valid_lines) ◄┘
//!                                                   │
//!                                              GraphBuilder
//! ```
//!
//! Stations are added in ascending id order, so two runs over the same feed
//! yield identical station indices.

use tracing::{debug, info};

use tn_core::FeedConfig;
use tn_graph::{Graph, GraphBuilder, Station};

use crate::dedupe::EdgeDeduplicator;
use crate::extractor::{extract_rides, extract_transfers, trip_lines};
use crate::merger::merge_stations;
use crate::records::RawFeed;
use crate::{FeedReport, FeedResult};

/// A built graph plus the diagnostics gathered while building it.
pub struct FeedBuild {
    pub graph: Graph,
    pub report: FeedReport,
}

/// Run the whole construction pipeline.
///
/// Row-level defects are skipped and counted in [`FeedBuild::report`]; only an
/// invalid `config` fails.  A feed with no usable rides yields an empty graph.
pub fn build_graph(feed: &RawFeed, config: &FeedConfig) -> FeedResult<FeedBuild> {
    config.validate()?;

    let mut report = FeedReport {
        unreadable_rows: feed.unreadable_rows,
        ..FeedReport::default()
    };

    let trips = trip_lines(feed, config, &mut report);
    let stations = merge_stations(&feed.stops, &mut report);

    let mut extraction = extract_rides(feed, &trips, &stations, config, &mut report);
    extract_transfers(&feed.transfers, &stations, &mut extraction, &mut report);

    let mut dedupe = EdgeDeduplicator::new();
    for edge in extraction.edges {
        dedupe.push(edge);
    }
    report.mixed_kind_pairs = dedupe.mixed_kind_pairs();
    let edges = dedupe.finish();

    // ── Line filter ───────────────────────────────────────────────────────
    let mut builder = GraphBuilder::with_capacity(extraction.station_lines.len(), edges.len());
    for merged in stations.iter() {
        let lines = extraction.station_lines.get(&merged.id);
        if !lines.is_some_and(|l| config.keeps_station(l.iter())) {
            report.stations_dropped += 1;
            continue;
        }
        let mut station = Station::new(merged.id.clone(), merged.name.clone())
            .with_lines(lines.into_iter().flatten().cloned());
        if let Some(coords) = merged.coords {
            station = station.with_coords(coords);
        }
        builder.add_station(station)?;
    }

    for edge in edges {
        if !builder.contains(&edge.from) || !builder.contains(&edge.to) {
            debug!(from = %edge.from, to = %edge.to, "dropping edge of filtered station");
            report.edges_dropped += 1;
            continue;
        }
        builder.add_edge(&edge.from, &edge.to, edge.duration, edge.kind, edge.line)?;
    }

    let graph = builder.build();
    report.log_summary();
    info!(
        stations = graph.station_count(),
        edges = graph.edge_count(),
        "station graph built"
    );
    Ok(FeedBuild { graph, report })
}
