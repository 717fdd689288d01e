//! Graph-subsystem error type.

use thiserror::Error;

/// Errors produced by `tn-graph`.
///
/// An unreachable destination is *not* an error: it is reported as an empty
/// [`PathResult`](crate::PathResult).
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown station {0:?}")]
    UnknownStation(String),

    #[error("station {0:?} added twice")]
    DuplicateStation(String),

    #[error("self-loop on station {0:?}")]
    SelfLoop(String),

    #[error("duplicate edge {from:?} -> {to:?}")]
    DuplicateEdge { from: String, to: String },

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::Snapshot(e.to_string())
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
