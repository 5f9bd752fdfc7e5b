//! `fleet-graph`: navigation graph, loading, spatial lookup, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`graph`]  | `NavGraph` (CSR + R-tree), `NavGraphBuilder`, `VertexAttributes` |
//! | [`loader`] | `load_graph_file` / `_reader` / `_str` / `_value` (JSON)      |
//! | [`router`] | `Router` trait, `BfsRouter`, `bfs`                            |
//! | [`error`]  | `GraphLoadError`, `GraphError`, `GraphResult<T>`              |
//!
//! The graph is immutable after load: vertex ids are input positions and
//! lanes are undirected with uniform cost.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Propagates serde derives to `fleet-core` types.              |

pub mod error;
pub mod graph;
pub mod loader;
pub mod router;


pub use error::{GraphError, GraphLoadError, GraphResult};
pub use graph::{NavGraph, NavGraphBuilder, VertexAttributes};
pub use loader::{load_graph_file, load_graph_reader, load_graph_str, load_graph_value};
pub use router::{bfs, BfsRouter, Router};
