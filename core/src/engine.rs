use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::graph::{ExternalId, Graph, Orientation};
use crate::load;
use crate::traversal::{self, DegreeEntry, EdgeMode, Subgraph};

/// A fully built graph plus metadata about the load that produced it.
#[derive(Debug)]
pub struct LoadedGraph {
    pub graph: Graph,
    pub source: PathBuf,
    pub load_time_ms: f64,
    /// Engine generation at the time this graph was installed.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    NotLoaded,
    Loaded,
}

/// Snapshot of what the engine is currently serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub state: LoadState,
    pub source: Option<String>,
    pub generation: u64,
    pub orientation: Orientation,
    pub node_count: usize,
    pub edge_count: usize,
    pub self_loops: usize,
    pub memory_bytes: usize,
    pub load_time_ms: f64,
}

/// Owns at most one loaded graph and answers queries against it.
///
/// A load builds into a fresh graph and swaps it in only on success, so a
/// failed load leaves the previous graph current. Queries go through `&self`
/// and may run concurrently; [`Engine::snapshot`] hands out the current graph
/// so it stays usable across a later reload.
///
/// With nothing loaded the engine behaves like an empty graph: BFS returns an
/// empty subgraph and degree queries fail with `UnknownNode`.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    current: Option<Arc<LoadedGraph>>,
    generation: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            current: None,
            generation: 0,
        }
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the graph with the contents of an edge-list file.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&LoadedGraph> {
        let path = path.as_ref();
        let started = Instant::now();
        let built = load::load_edge_list(path, &self.config);
        self.install(built, path, started)
    }

    /// Replace the graph with edges read from `reader`.
    pub fn load_reader<R: BufRead>(&mut self, reader: R, source: impl AsRef<Path>) -> Result<&LoadedGraph> {
        let source = source.as_ref();
        let started = Instant::now();
        let built = load::read_edge_list(reader, &self.config, source);
        self.install(built, source, started)
    }

    fn install(&mut self, built: Result<Graph>, source: &Path, started: Instant) -> Result<&LoadedGraph> {
        let graph = match built {
            Ok(graph) => graph,
            Err(e) => {
                warn!(
                    source = %source.display(),
                    error = %e,
                    kept_generation = self.generation,
                    "load failed, keeping current graph"
                );
                return Err(e);
            }
        };

        self.generation += 1;
        let loaded = Arc::new(LoadedGraph {
            graph,
            source: source.to_path_buf(),
            load_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            generation: self.generation,
        });
        info!(
            source = %source.display(),
            generation = self.generation,
            load_time_ms = loaded.load_time_ms,
            "graph installed"
        );
        let slot = self.current.insert(loaded);
        Ok(&**slot)
    }

    /// Drop the current graph.
    pub fn reset(&mut self) {
        if self.current.take().is_some() {
            self.generation += 1;
            info!(generation = self.generation, "graph dropped");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current graph, shared. Stays valid after a reload or reset.
    pub fn snapshot(&self) -> Option<Arc<LoadedGraph>> {
        self.current.clone()
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.current.as_deref().map(|lg| &lg.graph)
    }

    pub fn node_count(&self) -> usize {
        self.graph().map_or(0, Graph::node_count)
    }

    pub fn edge_count(&self) -> usize {
        self.graph().map_or(0, Graph::edge_count)
    }

    pub fn estimated_memory_bytes(&self) -> usize {
        self.graph().map_or(0, Graph::estimated_memory_bytes)
    }

    /// Bounded BFS reporting the induced subgraph.
    pub fn bfs(&self, start: ExternalId, max_depth: i64) -> Result<Subgraph> {
        self.bfs_with(start, max_depth, EdgeMode::Induced)
    }

    pub fn bfs_with(&self, start: ExternalId, max_depth: i64, mode: EdgeMode) -> Result<Subgraph> {
        let depth = check_depth(max_depth)?;
        Ok(match self.graph() {
            Some(graph) => traversal::bfs(graph, start, depth, mode),
            None => traversal::bfs(&Graph::empty(self.config.orientation), start, depth, mode),
        })
    }

    pub fn degree_of(&self, id: ExternalId) -> Result<usize> {
        let graph = self.graph().ok_or(Error::UnknownNode(id))?;
        traversal::degree_of(graph, id)
    }

    pub fn neighbors_of(&self, id: ExternalId) -> Result<Vec<ExternalId>> {
        let graph = self.graph().ok_or(Error::UnknownNode(id))?;
        traversal::neighbors_of(graph, id)
    }

    pub fn top_degree(&self, top_n: usize) -> Vec<DegreeEntry> {
        self.graph()
            .map(|g| traversal::top_degree(g, top_n))
            .unwrap_or_default()
    }

    pub fn status(&self) -> EngineStatus {
        match self.current.as_deref() {
            Some(lg) => EngineStatus {
                state: LoadState::Loaded,
                source: Some(lg.source.display().to_string()),
                generation: self.generation,
                orientation: lg.graph.orientation(),
                node_count: lg.graph.node_count(),
                edge_count: lg.graph.edge_count(),
                self_loops: lg.graph.self_loop_count(),
                memory_bytes: lg.graph.estimated_memory_bytes(),
                load_time_ms: lg.load_time_ms,
            },
            None => EngineStatus {
                state: LoadState::NotLoaded,
                source: None,
                generation: self.generation,
                orientation: self.config.orientation,
                node_count: 0,
                edge_count: 0,
                self_loops: 0,
                memory_bytes: 0,
                load_time_ms: 0.0,
            },
        }
    }
}

/// Validate a caller-supplied depth. Depths past `u32::MAX` saturate.
fn check_depth(depth: i64) -> Result<u32> {
    if depth < 0 {
        return Err(Error::InvalidDepth(depth));
    }
    Ok(u32::try_from(depth).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1 2\n2 3\n1 3\n5 6\n";

    fn loaded(text: &str) -> Engine {
        let mut engine = Engine::default();
        engine.load_reader(text.as_bytes(), "sample.txt").unwrap();
        engine
    }

    #[test]
    fn test_not_loaded_behaves_empty() {
        let engine = Engine::default();
        assert!(!engine.is_loaded());
        assert_eq!(engine.node_count(), 0);
        assert_eq!(engine.edge_count(), 0);
        assert_eq!(engine.estimated_memory_bytes(), 0);
        assert!(engine.bfs(1, 2).unwrap().is_empty());
        assert!(matches!(engine.degree_of(1), Err(Error::UnknownNode(1))));
        assert!(engine.top_degree(5).is_empty());
        assert_eq!(engine.status().state, LoadState::NotLoaded);
    }

    #[test]
    fn test_load_reader_counts() {
        let engine = loaded(SAMPLE);
        assert_eq!(engine.node_count(), 5);
        assert_eq!(engine.edge_count(), 4);
        assert_eq!(engine.degree_of(1).unwrap(), 2);
        assert!(engine.estimated_memory_bytes() > 0);
    }

    #[test]
    fn test_negative_depth_rejected() {
        let engine = loaded(SAMPLE);
        assert!(matches!(engine.bfs(1, -1), Err(Error::InvalidDepth(-1))));
    }

    #[test]
    fn test_huge_depth_saturates() {
        let engine = loaded(SAMPLE);
        let sub = engine.bfs(1, i64::MAX).unwrap();
        assert_eq!(sub.nodes.len(), 3);
    }

    #[test]
    fn test_failed_load_keeps_previous_graph() {
        let mut engine = loaded(SAMPLE);
        let before = engine.generation();

        let err = engine
            .load_reader("7 8\n8 oops\n".as_bytes(), "bad.txt")
            .unwrap_err();
        assert!(err.is_load_error());

        assert_eq!(engine.generation(), before);
        assert_eq!(engine.node_count(), 5);
        assert_eq!(engine.degree_of(1).unwrap(), 2);
        assert!(engine.degree_of(7).is_err());
        assert_eq!(engine.status().source.as_deref(), Some("sample.txt"));
    }

    #[test]
    fn test_reload_discards_old_ids() {
        let mut engine = loaded(SAMPLE);
        engine.load_reader("5 10\n10 11\n".as_bytes(), "next.txt").unwrap();

        assert!(matches!(engine.degree_of(1), Err(Error::UnknownNode(1))));
        assert!(engine.bfs(1, 3).unwrap().is_empty());
        // 5 appears in both datasets
        assert_eq!(engine.degree_of(5).unwrap(), 1);
        assert_eq!(engine.node_count(), 3);
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let mut engine = loaded(SAMPLE);
        let old = engine.snapshot().unwrap();
        engine.load_reader("100 200\n".as_bytes(), "other.txt").unwrap();

        assert_eq!(old.graph.node_count(), 5);
        assert_eq!(engine.node_count(), 2);
        assert!(old.generation < engine.generation());
    }

    #[test]
    fn test_generation_bumps() {
        let mut engine = Engine::default();
        assert_eq!(engine.generation(), 0);
        engine.load_reader(SAMPLE.as_bytes(), "a").unwrap();
        assert_eq!(engine.generation(), 1);
        engine.load_reader(SAMPLE.as_bytes(), "b").unwrap();
        assert_eq!(engine.generation(), 2);
        engine.reset();
        assert_eq!(engine.generation(), 3);
        assert!(!engine.is_loaded());
        // Resetting an empty engine is a no-op
        engine.reset();
        assert_eq!(engine.generation(), 3);
    }

    #[test]
    fn test_status_loaded() {
        let engine = loaded("1 1\n1 2\n");
        let status = engine.status();
        assert_eq!(status.state, LoadState::Loaded);
        assert_eq!(status.node_count, 2);
        assert_eq!(status.edge_count, 2);
        assert_eq!(status.self_loops, 1);
        assert_eq!(status.memory_bytes, engine.estimated_memory_bytes());
        assert_eq!(status.orientation, Orientation::Undirected);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let cfg = EngineConfig {
            comment_prefix: String::new(),
            ..EngineConfig::default()
        };
        assert!(matches!(Engine::new(cfg), Err(Error::Config(_))));
    }

    #[test]
    fn test_concurrent_queries() {
        let engine = loaded(SAMPLE);
        std::thread::scope(|s| {
            for start in [1u64, 2, 3, 5] {
                let engine = &engine;
                s.spawn(move || {
                    let sub = engine.bfs(start, 3).unwrap();
                    assert!(!sub.is_empty());
                    assert!(engine.degree_of(start).unwrap() >= 1);
                });
            }
        });
    }
}
