//! Edge extractor: timed stop visits and transfer rules → raw directed edges.
//!
//! # Rides
//!
//! Per trip, visits are ordered by `stop_sequence`.  Each consecutive pair
//! `(s1, s2)` whose stops map to two different logical stations and whose
//! departure delta `d` satisfies `0 < d < max_ride_secs` yields two ride
//! candidates:
//!
//! ```text
//! station(s1) → station(s2)   d   line of s1
//! station(s2) → station(s1)   d   line of s2
//! ```
//!
//! # Transfers
//!
//! A transfer row yields a candidate in each direction when both of its stops
//! were used by an accepted ride and they belong to different stations.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use tn_core::{EdgeKind, FeedConfig, LineId, Seconds, parse_gtfs_time};

use crate::FeedReport;
use crate::merger::StationTable;
use crate::records::{RawFeed, StopTimeRecord, TransferRecord, non_blank};

/// A directed edge candidate between two logical stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    pub from: String,
    pub to: String,
    pub duration: Seconds,
    pub kind: EdgeKind,
    /// `Some` only for rides.
    pub line: Option<LineId>,
}

impl RawEdge {
    pub fn ride(from: impl Into<String>, to: impl Into<String>, duration: Seconds, line: impl Into<LineId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            duration,
            kind: EdgeKind::Ride,
            line: Some(line.into()),
        }
    }

    pub fn transfer(from: impl Into<String>, to: impl Into<String>, duration: Seconds) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            duration,
            kind: EdgeKind::Transfer,
            line: None,
        }
    }
}

/// Output of ride and transfer extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// In emission order: trips in first-appearance order, then transfers.
    pub edges: Vec<RawEdge>,
    /// Lines observed on ride edges, per logical station.
    pub station_lines: BTreeMap<String, BTreeSet<LineId>>,
    /// Raw stop ids that took part in an accepted ride.
    pub used_stops: FxHashSet<String>,
}

/// One stop of one trip.
struct Visit<'a> {
    seq: u32,
    stop_id: &'a str,
    departure: Option<Seconds>,
    line: &'a LineId,
}

// ── Route / trip filtering ────────────────────────────────────────────────────

/// Line served by each trip whose route passes `config`.
pub fn trip_lines<'a>(
    feed: &'a RawFeed,
    config: &FeedConfig,
    report: &mut FeedReport,
) -> FxHashMap<&'a str, LineId> {
    let mut route_lines: FxHashMap<&str, LineId> = FxHashMap::default();
    for route in &feed.routes {
        let line = route.route_short_name.trim();
        // An empty type list accepts every route, so the type is never read.
        let accepted = if config.route_types.is_empty() {
            config.accepts_line(line)
        } else {
            let Ok(route_type) = route.route_type.trim().parse::<u16>() else {
                debug!(route = %route.route_id, value = %route.route_type, "skipping route with bad route_type");
                report.routes_bad_type += 1;
                continue;
            };
            config.accepts_route(route_type, line)
        };
        if accepted {
            route_lines.insert(route.route_id.trim(), LineId::from(line));
        }
    }
    report.routes_accepted = route_lines.len();

    let lines: FxHashMap<&str, LineId> = feed
        .trips
        .iter()
        .filter_map(|t| {
            route_lines
                .get(t.route_id.trim())
                .map(|line| (t.trip_id.trim(), line.clone()))
        })
        .collect();
    report.trips_accepted = lines.len();
    lines
}

// ── Rides ─────────────────────────────────────────────────────────────────────

/// Group stop times into per-trip visit lists, trips in first-appearance order.
fn group_visits<'a>(
    stop_times: &'a [StopTimeRecord],
    trips: &'a FxHashMap<&'a str, LineId>,
    report: &mut FeedReport,
) -> Vec<Vec<Visit<'a>>> {
    let mut slot: FxHashMap<&str, usize> = FxHashMap::default();
    let mut grouped: Vec<Vec<Visit<'a>>> = Vec::new();

    for st in stop_times {
        let trip_id = st.trip_id.trim();
        let Some(line) = trips.get(trip_id) else {
            report.stop_times_filtered += 1;
            continue;
        };
        let Ok(seq) = st.stop_sequence.trim().parse::<u32>() else {
            debug!(trip = trip_id, value = %st.stop_sequence, "skipping stop time with bad stop_sequence");
            report.stop_times_bad_sequence += 1;
            continue;
        };
        let i = *slot.entry(trip_id).or_insert_with(|| {
            grouped.push(Vec::new());
            grouped.len() - 1
        });
        grouped[i].push(Visit {
            seq,
            stop_id: st.stop_id.trim(),
            departure: parse_gtfs_time(&st.departure_time),
            line,
        });
    }

    for visits in &mut grouped {
        visits.sort_by_key(|v| v.seq);
    }
    grouped
}

/// Emit ride candidates for every accepted trip.
pub fn extract_rides(
    feed: &RawFeed,
    trips: &FxHashMap<&str, LineId>,
    stations: &StationTable,
    config: &FeedConfig,
    report: &mut FeedReport,
) -> Extraction {
    let mut out = Extraction::default();

    for visits in group_visits(&feed.stop_times, trips, report) {
        for pair in visits.windows(2) {
            let (s1, s2) = (&pair[0], &pair[1]);

            let (Some(from), Some(to)) = (stations.station_of(s1.stop_id), stations.station_of(s2.stop_id)) else {
                report.rides_unmapped_stop += 1;
                continue;
            };
            if from == to {
                report.rides_same_station += 1;
                continue;
            }
            let (Some(t1), Some(t2)) = (s1.departure, s2.departure) else {
                report.rides_bad_time += 1;
                continue;
            };
            if t2 <= t1 || t2 - t1 >= config.max_ride_secs {
                report.rides_out_of_range += 1;
                continue;
            }
            let delta = t2 - t1;

            out.edges.push(RawEdge::ride(from, to, delta, s1.line.clone()));
            out.edges.push(RawEdge::ride(to, from, delta, s2.line.clone()));

            out.used_stops.insert(s1.stop_id.to_owned());
            out.used_stops.insert(s2.stop_id.to_owned());
            out.station_lines.entry(from.to_owned()).or_default().insert(s1.line.clone());
            out.station_lines.entry(to.to_owned()).or_default().insert(s2.line.clone());
        }
    }

    report.ride_candidates = out.edges.len();
    info!(
        candidates = out.edges.len(),
        stations_served = out.station_lines.len(),
        "extracted ride edges"
    );
    out
}

// ── Transfers ─────────────────────────────────────────────────────────────────

/// Append transfer candidates between stops used by accepted rides.
pub fn extract_transfers(
    transfers: &[TransferRecord],
    stations: &StationTable,
    out: &mut Extraction,
    report: &mut FeedReport,
) {
    let before = out.edges.len();

    for t in transfers {
        let (from_stop, to_stop) = (t.from_stop_id.trim(), t.to_stop_id.trim());
        if !out.used_stops.contains(from_stop) || !out.used_stops.contains(to_stop) {
            report.transfers_unused += 1;
            continue;
        }
        let Some(duration) = non_blank(&t.min_transfer_time).and_then(|s| s.parse::<Seconds>().ok()) else {
            debug!(from = from_stop, to = to_stop, value = ?t.min_transfer_time, "skipping transfer with bad min_transfer_time");
            report.transfers_bad_duration += 1;
            continue;
        };
        let (Some(from), Some(to)) = (stations.station_of(from_stop), stations.station_of(to_stop)) else {
            report.transfers_unused += 1;
            continue;
        };
        if from == to {
            report.transfers_same_station += 1;
            continue;
        }
        out.edges.push(RawEdge::transfer(from, to, duration));
        out.edges.push(RawEdge::transfer(to, from, duration));
    }

    report.transfer_candidates = out.edges.len() - before;
    info!(candidates = report.transfer_candidates, "extracted transfer edges");
}
