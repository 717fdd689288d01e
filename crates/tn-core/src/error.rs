//! Core error type.
//!
//! Sub-crates define their own error enums (`GraphError`, `FeedError`) and
//! wrap `CoreError` where a core parse surfaces through them.

use thiserror::Error;

/// Errors produced by `tn-core` parsers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown edge kind {0:?}: expected \"ride\" or \"transfer\"")]
    UnknownEdgeKind(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
