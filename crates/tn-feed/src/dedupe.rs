//! Edge deduplicator: many candidates per ordered station pair → one edge.
//!
//! For each `(from, to)`:
//! - `duration` is the mean of the candidates, rounded to the nearest second
//!   (halves round up);
//! - `kind` is the first candidate's kind;
//! - `line` is the first ride candidate's line, kept only when the edge is a
//!   ride.
//!
//! Variance in observed travel time is discarded.  Output order is the
//! first-seen order of each pair, so deduplicating its own output is a no-op.

use rustc_hash::FxHashMap;
use tracing::debug;

use tn_core::{EdgeKind, LineId, Seconds};

use crate::extractor::RawEdge;

struct Accumulator {
    from: String,
    to: String,
    sum: u64,
    count: u64,
    kind: EdgeKind,
    line: Option<LineId>,
    mixed: bool,
}

/// Streaming deduplicator; feed candidates with [`push`](Self::push).
#[derive(Default)]
pub struct EdgeDeduplicator {
    slot: FxHashMap<(String, String), usize>,
    acc: Vec<Accumulator>,
    mixed_kind_pairs: usize,
}

impl EdgeDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: RawEdge) {
        let ride_line = match edge.kind {
            EdgeKind::Ride => edge.line,
            EdgeKind::Transfer => None,
        };

        let key = (edge.from, edge.to);
        if let Some(&i) = self.slot.get(&key) {
            let a = &mut self.acc[i];
            a.sum += u64::from(edge.duration);
            a.count += 1;
            if a.kind != edge.kind && !a.mixed {
                debug!(from = %a.from, to = %a.to, first = %a.kind, "ride and transfer candidates for one station pair");
                a.mixed = true;
                self.mixed_kind_pairs += 1;
            }
            if a.line.is_none() {
                a.line = ride_line;
            }
            return;
        }

        self.slot.insert(key.clone(), self.acc.len());
        self.acc.push(Accumulator {
            from: key.0,
            to: key.1,
            sum: u64::from(edge.duration),
            count: 1,
            kind: edge.kind,
            line: ride_line,
            mixed: false,
        });
    }

    /// Station pairs that received both ride and transfer candidates.
    pub fn mixed_kind_pairs(&self) -> usize {
        self.mixed_kind_pairs
    }

    pub fn finish(self) -> Vec<RawEdge> {
        self.acc
            .into_iter()
            .map(|a| RawEdge {
                duration: rounded_mean(a.sum, a.count),
                line: match a.kind {
                    EdgeKind::Ride => a.line,
                    EdgeKind::Transfer => None,
                },
                from: a.from,
                to: a.to,
                kind: a.kind,
            })
            .collect()
    }
}

/// `sum / count` rounded half up.
fn rounded_mean(sum: u64, count: u64) -> Seconds {
    debug_assert!(count > 0);
    // A mean never exceeds the largest candidate, which fit in `Seconds`.
    ((sum + count / 2) / count) as Seconds
}

/// Deduplicate a batch of candidates.
pub fn dedupe_edges(raw: impl IntoIterator<Item = RawEdge>) -> Vec<RawEdge> {
    let mut d = EdgeDeduplicator::new();
    for e in raw {
        d.push(e);
    }
    d.finish()
}
