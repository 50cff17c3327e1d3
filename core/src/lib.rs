//! neuronet-core: compact graph store and bounded traversal engine.
//!
//! Reads plain-text edge lists with arbitrary sparse node IDs, remaps them to
//! dense indices and builds an immutable CSR adjacency store in two passes.
//! Bounded BFS, degree lookup and footprint reporting run over that store.
//! No UI or process concerns live here; the `neuronet` binary wraps this crate.
//!
//! ```no_run
//! use neuronet_core::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! engine.load("web-Google.txt")?;
//! let sub = engine.bfs(0, 2)?;
//! println!("{} nodes, {} edges", sub.nodes.len(), sub.edges.len());
//! # Ok::<(), neuronet_core::Error>(())
//! ```

mod config;
mod engine;
mod error;
mod graph;
mod index;
mod load;
mod traversal;

pub use config::EngineConfig;
pub use engine::{Engine, EngineStatus, LoadState, LoadedGraph};
pub use error::{Error, Result};
pub use graph::{ExternalId, Graph, GraphBuilder, NodeIndex, Orientation};
pub use index::IdIndex;
pub use load::{load_edge_list, read_edge_list};
pub use traversal::{bfs, degree_of, neighbors_of, top_degree, DegreeEntry, EdgeMode, Subgraph};
