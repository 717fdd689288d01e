//! Graph construction configuration.

use std::collections::BTreeSet;

use crate::{CoreError, CoreResult, LineId, Seconds};

/// GTFS `route_type` for subway / metro service.
pub const ROUTE_TYPE_METRO: u16 = 1;

/// Ride deltas at or above this many seconds are rejected as bad data.
pub const DEFAULT_MAX_RIDE_SECS: Seconds = 3_600;

const PARIS_METRO_LINES: [&str; 16] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "3bis", "7bis",
];

/// Controls which parts of a raw feed become part of the station graph.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// `tn_feed::build_graph`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeedConfig {
    /// Accepted GTFS `route_type` values.  Empty accepts every route type.
    pub route_types: Vec<u16>,

    /// Recognized service lines, matched against `route_short_name`.  Empty
    /// accepts every line of an accepted route type.  Stations served by
    /// none of these lines are dropped from the graph.
    pub valid_lines: BTreeSet<LineId>,

    /// Exclusive ceiling on a ride edge's time delta.  Guards against bad or
    /// overnight data producing absurd weights.
    pub max_ride_secs: Seconds,
}

impl FeedConfig {
    /// `true` if a route of this type and short name contributes edges.
    pub fn accepts_route(&self, route_type: u16, short_name: &str) -> bool {
        (self.route_types.is_empty() || self.route_types.contains(&route_type))
            && self.accepts_line(short_name)
    }

    /// `true` if `line` is a recognized service line.
    #[inline]
    pub fn accepts_line(&self, line: &str) -> bool {
        self.valid_lines.is_empty() || self.valid_lines.contains(line)
    }

    /// `true` if a station served by `lines` survives the final filter.
    pub fn keeps_station<'a>(&self, mut lines: impl Iterator<Item = &'a LineId>) -> bool {
        lines.any(|l| self.accepts_line(l.as_str()))
    }

    /// Reject settings that would silently produce an edgeless graph.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_ride_secs == 0 {
            return Err(CoreError::Config("max_ride_secs must be positive".into()));
        }
        Ok(())
    }
}

impl Default for FeedConfig {
    /// Paris metro: route type 1, lines 1–14 plus 3bis and 7bis, one-hour
    /// ride ceiling.
    fn default() -> Self {
        Self {
            route_types: vec![ROUTE_TYPE_METRO],
            valid_lines: PARIS_METRO_LINES.iter().map(|&l| LineId::from(l)).collect(),
            max_ride_secs: DEFAULT_MAX_RIDE_SECS,
        }
    }
}
