//! `tn-graph` — logical-station graph and the queries that run over it.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`graph`]        | `Graph` (CSR + reverse CSR + R-tree), `GraphBuilder`      |
//! | [`router`]       | `Router` trait, `DijkstraRouter`, `PathResult`            |
//! | [`spanning`]     | `minimum_spanning_forest` (Kruskal), `UnionFind`          |
//! | [`connectivity`] | `is_connected`, `components`, `ComponentSet`              |
//! | [`snapshot`]     | JSON snapshot model, `load_snapshot`, `save_snapshot`     |
//! | [`slot`]         | `GraphSlot` — atomic swap of the served graph             |
//! | [`error`]        | `GraphError`, `GraphResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `shortest_paths` batches run on Rayon's thread pool.     |
//!
//! A built `Graph` is immutable; every query allocates its own working state,
//! so any number of queries may share one graph across threads.

pub mod connectivity;
pub mod error;
pub mod graph;
pub mod router;
pub mod slot;
pub mod snapshot;
pub mod spanning;

#[cfg(test)]
mod tests;

pub use connectivity::{ComponentSet, components, is_connected};
pub use error::{GraphError, GraphResult};
pub use graph::{EdgeRef, Graph, GraphBuilder, Station};
pub use router::{
    DijkstraRouter, PathResult, PathStep, Route, Router, shortest_path, shortest_path_with,
    shortest_paths,
};
pub use slot::GraphSlot;
pub use snapshot::{Snapshot, load_snapshot, save_snapshot};
pub use spanning::{EdgeFilter, ForestEdge, SpanningForest, minimum_spanning_forest};
