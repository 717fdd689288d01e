use std::path::PathBuf;

use thiserror::Error;

use tn_core::CoreError;
use tn_graph::GraphError;

/// Construction failures that stop the pipeline.
///
/// Malformed rows are not errors: they are skipped and tallied in
/// [`FeedReport`](crate::FeedReport).
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("required feed file missing: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid feed configuration: {0}")]
    Config(#[from] CoreError),

    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
