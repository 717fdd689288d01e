//! Feed time model.
//!
//! GTFS stop times are `HH:MM:SS` strings measured from "noon minus 12h" of
//! the service day, so hours may exceed 23 for trips running past midnight
//! (`25:10:00` is 01:10 the next morning).  Every duration in the graph is a
//! whole number of seconds.

/// A duration or time-of-service-day in whole seconds.
pub type Seconds = u32;

/// Parse a GTFS `HH:MM:SS` time into seconds since the start of the service
/// day.
///
/// Hours are unbounded (beyond 24 is legal); minutes and seconds must be
/// below 60.  Blank or malformed strings yield `None`: a missing time is a
/// row-level data-quality defect, never a fatal error.
pub fn parse_gtfs_time(s: &str) -> Option<Seconds> {
    let mut parts = s.trim().split(':');
    let h = parse_field(parts.next()?)?;
    let m = parse_field(parts.next()?)?;
    let sec = parse_field(parts.next()?)?;
    if parts.next().is_some() || m >= 60 || sec >= 60 {
        return None;
    }
    h.checked_mul(3_600)?.checked_add(m * 60 + sec)
}

fn parse_field(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
