//! `tn-feed` — GTFS feed loading and the pipeline that turns it into a
//! station graph.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`records`]   | Raw row types, `RawFeed`                                      |
//! | [`loader`]    | `RawFeed::load_dir`, `RawFeed::from_readers`                  |
//! | [`merger`]    | `merge_stations`, `StationTable`                              |
//! | [`extractor`] | `trip_lines`, `extract_rides`, `extract_transfers`, `RawEdge` |
//! | [`dedupe`]    | `EdgeDeduplicator`, `dedupe_edges`                            |
//! | [`pipeline`]  | `build_graph`, `FeedBuild`                                    |
//! | [`report`]    | `FeedReport` data-quality counters                            |
//! | [`error`]     | `FeedError`, `FeedResult<T>`                                  |
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tn_core::FeedConfig;
//! use tn_feed::{RawFeed, build_graph};
//!
//! let feed = RawFeed::load_dir(Path::new("gtfs/")).unwrap();
//! let built = build_graph(&feed, &FeedConfig::default()).unwrap();
//! println!("{} stations", built.graph.station_count());
//! ```

pub mod dedupe;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod merger;
pub mod pipeline;
pub mod records;
pub mod report;


pub use dedupe::{EdgeDeduplicator, dedupe_edges};
pub use error::{FeedError, FeedResult};
pub use extractor::{Extraction, RawEdge, extract_rides, extract_transfers, trip_lines};
pub use merger::{MergedStation, StationTable, merge_stations};
pub use pipeline::{FeedBuild, build_graph};
pub use records::{RawFeed, RouteRecord, StopRecord, StopTimeRecord, TransferRecord, TripRecord};
pub use report::FeedReport;
