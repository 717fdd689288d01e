//! GTFS CSV loader.
//!
//! # Files
//!
//! | File             | Required | Record              |
//! |------------------|----------|---------------------|
//! | `routes.txt`     | yes      | [`RouteRecord`]     |
//! | `trips.txt`      | yes      | [`TripRecord`]      |
//! | `stops.txt`      | yes      | [`StopRecord`]      |
//! | `stop_times.txt` | yes      | [`StopTimeRecord`]  |
//! | `transfers.txt`  | no       | [`TransferRecord`]  |
//!
//! A row the CSV layer cannot decode is skipped and counted in
//! [`RawFeed::unreadable_rows`]; only an unreadable file or header aborts the
//! load.
//!
//! # Large files
//!
//! Every table is buffered in memory as owned strings; `stop_times.txt`
//! dominates.  For region-wide feeds under tight memory, pre-filter the feed
//! to the wanted route types.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::records::{RawFeed, RouteRecord, StopRecord, StopTimeRecord, TransferRecord, TripRecord};
use crate::{FeedError, FeedResult};

// ── Public API ────────────────────────────────────────────────────────────────

impl RawFeed {
    /// Load a GTFS feed from an unpacked directory.
    pub fn load_dir(dir: &Path) -> FeedResult<RawFeed> {
        let open = |name: &str| -> FeedResult<BufReader<File>> {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(FeedError::MissingFile(path));
            }
            Ok(BufReader::new(File::open(path)?))
        };

        let transfers_path = dir.join("transfers.txt");
        let transfers = if transfers_path.is_file() {
            Some(BufReader::new(File::open(transfers_path)?))
        } else {
            debug!(dir = %dir.display(), "no transfers.txt; building without transfer edges");
            None
        };

        let feed = RawFeed::from_readers(
            open("routes.txt")?,
            open("trips.txt")?,
            open("stops.txt")?,
            open("stop_times.txt")?,
            transfers,
        )?;
        info!(
            dir = %dir.display(),
            routes = feed.routes.len(),
            trips = feed.trips.len(),
            stops = feed.stops.len(),
            stop_times = feed.stop_times.len(),
            transfers = feed.transfers.len(),
            "loaded GTFS feed"
        );
        Ok(feed)
    }

    /// Like [`load_dir`](Self::load_dir) but accepts any `Read` sources.
    ///
    /// Useful for testing (pass byte slices) or loading from archives.
    pub fn from_readers<R: Read>(
        routes: R,
        trips: R,
        stops: R,
        stop_times: R,
        transfers: Option<R>,
    ) -> FeedResult<RawFeed> {
        let mut unreadable = 0;
        let routes     = read_records::<RouteRecord, _>(routes, "routes.txt", &mut unreadable)?;
        let trips      = read_records::<TripRecord, _>(trips, "trips.txt", &mut unreadable)?;
        let stops      = read_records::<StopRecord, _>(stops, "stops.txt", &mut unreadable)?;
        let stop_times = read_records::<StopTimeRecord, _>(stop_times, "stop_times.txt", &mut unreadable)?;
        let transfers  = match transfers {
            Some(r) => read_records::<TransferRecord, _>(r, "transfers.txt", &mut unreadable)?,
            None => Vec::new(),
        };
        Ok(RawFeed {
            routes,
            trips,
            stops,
            stop_times,
            transfers,
            unreadable_rows: unreadable,
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_records<T: DeserializeOwned, R: Read>(
    reader: R,
    file: &'static str,
    unreadable: &mut usize,
) -> FeedResult<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // A broken header makes every row meaningless.
    csv_reader.headers()?;

    let mut rows = Vec::new();
    for (line, result) in csv_reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!(file, row = line + 1, error = %e, "skipping unreadable row");
                *unreadable += 1;
            }
        }
    }
    Ok(rows)
}
