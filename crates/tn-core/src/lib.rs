//! `tn-core` — foundational types for the `transit_net` station graph.
//!
//! This crate is a dependency of every other `tn-*` crate.  It has no `tn-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `StationIdx`, `EdgeIdx`, `LineId`                      |
//! | [`geo`]    | `GeoPoint`, haversine distance                         |
//! | [`time`]   | GTFS `HH:MM:SS` parsing, `Seconds`                     |
//! | [`kind`]   | `EdgeKind` (ride / transfer)                           |
//! | [`config`] | `FeedConfig` (route types, valid lines, ride ceiling)  |
//! | [`error`]  | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                           |
//! |---------|------------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on public types (snapshot codec, config) |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::FeedConfig;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeIdx, LineId, StationIdx};
pub use kind::EdgeKind;
pub use time::{Seconds, parse_gtfs_time};
