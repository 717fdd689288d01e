//! Raw GTFS rows.
//!
//! Every field is read as text (or optional text) so a single malformed
//! value never fails a whole file: numeric parsing happens row by row in the
//! pipeline, where defects are counted and the row skipped.
//!
//! Columns not listed here are ignored.

use serde::Deserialize;

/// `routes.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RouteRecord {
    pub route_id: String,
    #[serde(default)]
    pub route_type: String,
    #[serde(default)]
    pub route_short_name: String,
}

/// `trips.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
}

/// `stops.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StopRecord {
    #[serde(default)]
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: String,
    #[serde(default)]
    pub parent_station: Option<String>,
    #[serde(default)]
    pub stop_lat: Option<String>,
    #[serde(default)]
    pub stop_lon: Option<String>,
}

/// `stop_times.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    #[serde(default)]
    pub stop_id: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub stop_sequence: String,
}

/// `transfers.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransferRecord {
    pub from_stop_id: String,
    pub to_stop_id: String,
    #[serde(default)]
    pub min_transfer_time: Option<String>,
}

/// `Some(trimmed)` for a present, non-blank optional field.
pub(crate) fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Every table the pipeline reads, as loaded.
#[derive(Debug, Clone, Default)]
pub struct RawFeed {
    pub routes: Vec<RouteRecord>,
    pub trips: Vec<TripRecord>,
    pub stops: Vec<StopRecord>,
    pub stop_times: Vec<StopTimeRecord>,
    pub transfers: Vec<TransferRecord>,
    /// Rows the CSV layer could not decode at all (wrong shape, bad UTF-8).
    pub unreadable_rows: usize,
}
