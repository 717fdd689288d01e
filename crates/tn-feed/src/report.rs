//! Construction diagnostics.
//!
//! Row-level defects never abort the pipeline; they are counted here so the
//! caller can judge feed quality after the fact.

use tracing::{info, warn};

/// Per-stage counters for one [`build_graph`](crate::build_graph) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedReport {
    // ── Loading ───────────────────────────────────────────────────────────
    /// Rows the CSV layer could not decode.
    pub unreadable_rows: usize,

    // ── Routes / trips ────────────────────────────────────────────────────
    /// Routes whose `route_type` is not an integer.
    pub routes_bad_type: usize,
    pub routes_accepted: usize,
    pub trips_accepted: usize,

    // ── Station merge ─────────────────────────────────────────────────────
    /// Stops with a blank `stop_id`.
    pub stops_without_id: usize,
    /// Stops whose coordinates were present but unparsable.
    pub stops_bad_coords: usize,
    pub stations_merged: usize,

    // ── Ride extraction ───────────────────────────────────────────────────
    /// Stop times of trips on routes outside the configured service.
    pub stop_times_filtered: usize,
    pub stop_times_bad_sequence: usize,
    /// Consecutive visits where a stop does not map to a station.
    pub rides_unmapped_stop: usize,
    /// Consecutive visits within one logical station.
    pub rides_same_station: usize,
    /// Consecutive visits where either departure time is missing or malformed.
    pub rides_bad_time: usize,
    /// Consecutive visits with a non-positive delta or one at/above the ceiling.
    pub rides_out_of_range: usize,
    pub ride_candidates: usize,

    // ── Transfer extraction ───────────────────────────────────────────────
    /// Transfers touching a stop no accepted ride uses.
    pub transfers_unused: usize,
    pub transfers_bad_duration: usize,
    pub transfers_same_station: usize,
    pub transfer_candidates: usize,

    // ── Dedupe & filter ───────────────────────────────────────────────────
    /// Station pairs whose candidates mixed ride and transfer.
    pub mixed_kind_pairs: usize,
    /// Stations none of whose lines is a recognized service line.
    pub stations_dropped: usize,
    /// Deduplicated edges removed with a dropped station.
    pub edges_dropped: usize,
}

impl FeedReport {
    /// Sum of counters caused by malformed or inconsistent input, as opposed
    /// to rows filtered out by configuration.
    pub fn data_quality_issues(&self) -> usize {
        self.unreadable_rows
            + self.routes_bad_type
            + self.stops_without_id
            + self.stops_bad_coords
            + self.stop_times_bad_sequence
            + self.rides_unmapped_stop
            + self.rides_bad_time
            + self.rides_out_of_range
            + self.transfers_bad_duration
            + self.mixed_kind_pairs
    }

    /// Emit one summary event, escalated to `warn` when input was defective.
    pub fn log_summary(&self) {
        info!(
            routes = self.routes_accepted,
            trips = self.trips_accepted,
            stations = self.stations_merged,
            rides = self.ride_candidates,
            transfers = self.transfer_candidates,
            stations_dropped = self.stations_dropped,
            edges_dropped = self.edges_dropped,
            "feed pipeline finished"
        );
        let issues = self.data_quality_issues();
        if issues > 0 {
            warn!(
                issues,
                unreadable_rows = self.unreadable_rows,
                stops_without_id = self.stops_without_id,
                bad_sequence = self.stop_times_bad_sequence,
                bad_time = self.rides_bad_time,
                out_of_range = self.rides_out_of_range,
                bad_transfer_duration = self.transfers_bad_duration,
                "skipped defective feed rows"
            );
        }
    }
}
