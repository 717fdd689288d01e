//! Station merger: physical stop records → logical stations.
//!
//! A stop with a `parent_station` folds into the station keyed by that
//! parent id; a stop without one is its own station.  The table is built as
//! a single fold over the stop records and is immutable afterwards.
//!
//! Lines are not assigned here: a station earns a line only when the edge
//! extractor emits a ride of that line touching it.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::debug;

use tn_core::GeoPoint;

use crate::FeedReport;
use crate::records::{StopRecord, non_blank};

/// A logical station before line assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedStation {
    pub id: String,
    pub name: String,
    pub coords: Option<GeoPoint>,
    /// Set once the station's own (parent) row has been folded in.  Its
    /// name and coordinates then win over any child's.
    own_row_seen: bool,
}

/// Logical stations keyed by id, plus the physical-stop → station mapping.
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    stations: BTreeMap<String, MergedStation>,
    stop_to_station: FxHashMap<String, String>,
}

impl StationTable {
    /// Logical station id for a raw stop id.
    pub fn station_of(&self, stop_id: &str) -> Option<&str> {
        self.stop_to_station.get(stop_id).map(String::as_str)
    }

    pub fn get(&self, station_id: &str) -> Option<&MergedStation> {
        self.stations.get(station_id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Stations in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &MergedStation> {
        self.stations.values()
    }

    /// Fold one stop record into the table.
    fn absorb(mut self, stop: &StopRecord, report: &mut FeedReport) -> Self {
        let stop_id = stop.stop_id.trim();
        if stop_id.is_empty() {
            debug!(name = %stop.stop_name, "skipping stop without id");
            report.stops_without_id += 1;
            return self;
        }

        let station_id = non_blank(&stop.parent_station).unwrap_or(stop_id);
        let is_own_row = station_id == stop_id;

        let coords = match (non_blank(&stop.stop_lat), non_blank(&stop.stop_lon)) {
            (Some(lat), Some(lon)) => {
                let parsed = GeoPoint::parse(lat, lon);
                if parsed.is_none() {
                    report.stops_bad_coords += 1;
                }
                parsed
            }
            _ => None,
        };

        self.stop_to_station.insert(stop_id.to_owned(), station_id.to_owned());

        let station = self
            .stations
            .entry(station_id.to_owned())
            .or_insert_with(|| MergedStation {
                id: station_id.to_owned(),
                name: stop.stop_name.clone(),
                coords: None,
                own_row_seen: false,
            });

        if is_own_row && !station.own_row_seen {
            station.own_row_seen = true;
            station.name = stop.stop_name.clone();
            if coords.is_some() {
                station.coords = coords;
            }
        } else if station.coords.is_none() {
            station.coords = coords;
        }

        self
    }
}

/// Merge raw stops into logical stations.
pub fn merge_stations(stops: &[StopRecord], report: &mut FeedReport) -> StationTable {
    let table = stops
        .iter()
        .fold(StationTable::default(), |table, stop| table.absorb(stop, report));
    report.stations_merged = table.len();
    table
}
