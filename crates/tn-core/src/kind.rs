//! Edge classification shared by the graph, the feed pipeline, and the
//! snapshot codec.

use std::str::FromStr;

use crate::CoreError;

/// What a directed edge between two logical stations represents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EdgeKind {
    /// In-vehicle travel along one line.
    Ride,
    /// Walking or waiting between lines at the same physical location.
    Transfer,
}

impl EdgeKind {
    /// Label used in snapshots and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Ride     => "ride",
            EdgeKind::Transfer => "transfer",
        }
    }
}

impl FromStr for EdgeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ride"     => Ok(EdgeKind::Ride),
            "transfer" => Ok(EdgeKind::Transfer),
            other      => Err(CoreError::UnknownEdgeKind(other.to_owned())),
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
