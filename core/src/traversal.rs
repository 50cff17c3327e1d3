use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{ExternalId, Graph, NodeIndex};

/// Which edges a BFS reports between the nodes it visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Every stored edge whose endpoints are both visited.
    #[default]
    Induced,
    /// Only edges read while expanding nodes above the depth limit.
    Traversed,
}

/// Result of a bounded BFS, in external IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgraph {
    pub start: ExternalId,
    /// Visited nodes in first-visit order, start first.
    pub nodes: Vec<ExternalId>,
    /// Each input edge at most once; both endpoints are in `nodes`.
    pub edges: Vec<(ExternalId, ExternalId)>,
    /// Deepest level that reached at least one new node.
    pub depth_reached: u32,
}

impl Subgraph {
    fn empty(start: ExternalId) -> Self {
        Self {
            start,
            nodes: Vec::new(),
            edges: Vec::new(),
            depth_reached: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Degree of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeEntry {
    pub id: ExternalId,
    pub degree: usize,
}

/// Level-synchronous BFS from `start` up to `max_depth` hops.
///
/// Each level is expanded in first-visit order and each node's run in stored
/// order, so the result is fully determined by the input file. An unknown
/// `start` yields an empty subgraph.
///
/// Work is proportional to the visited nodes and their runs. Visit state lives
/// in a map keyed by internal index rather than a per-graph array.
pub fn bfs(graph: &Graph, start: ExternalId, max_depth: u32, mode: EdgeMode) -> Subgraph {
    let Some(start_idx) = graph.index_of(start) else {
        return Subgraph::empty(start);
    };

    // node -> position in `visited`
    let mut order: HashMap<NodeIndex, u32> = HashMap::new();
    let mut visited: Vec<NodeIndex> = vec![start_idx];
    order.insert(start_idx, 0);

    let mut frontier_start = 0;
    let mut depth_reached = 0;
    for depth in 0..max_depth {
        let frontier_end = visited.len();
        if frontier_start == frontier_end {
            break;
        }
        for pos in frontier_start..frontier_end {
            for &v in graph.neighbors(visited[pos]) {
                if let Entry::Vacant(slot) = order.entry(v) {
                    slot.insert(visited.len() as u32);
                    visited.push(v);
                }
            }
        }
        if visited.len() > frontier_end {
            depth_reached = depth + 1;
        }
        frontier_start = frontier_end;
    }
    // Nodes before `frontier_start` had their runs walked.
    let expanded = frontier_start;

    let scan = match mode {
        EdgeMode::Induced => visited.len(),
        EdgeMode::Traversed => expanded,
    };
    let directed = graph.orientation().is_directed();
    let externals = graph.ids().externals();

    let mut edges = Vec::new();
    for (pos, &u) in visited[..scan].iter().enumerate() {
        for &v in graph.neighbors(u) {
            let Some(&v_pos) = order.get(&v) else {
                continue;
            };
            // An undirected edge sits in both runs; keep the copy owned by the
            // earlier-visited endpoint. Self-loops sit in one run only.
            if directed || v_pos as usize >= pos {
                edges.push((externals[u as usize], externals[v as usize]));
            }
        }
    }

    Subgraph {
        start,
        nodes: visited.iter().map(|&i| externals[i as usize]).collect(),
        edges,
        depth_reached,
    }
}

/// Degree of an external ID. Unknown IDs are an error, unlike [`bfs`].
pub fn degree_of(graph: &Graph, id: ExternalId) -> Result<usize> {
    graph
        .index_of(id)
        .map(|idx| graph.degree(idx))
        .ok_or(Error::UnknownNode(id))
}

/// Neighbor run of an external ID in stored order.
pub fn neighbors_of(graph: &Graph, id: ExternalId) -> Result<Vec<ExternalId>> {
    let idx = graph.index_of(id).ok_or(Error::UnknownNode(id))?;
    Ok(graph.neighbor_ids(idx).collect())
}

/// Return nodes ranked by degree.
///
/// If `top_n` is 0, returns all nodes. Otherwise returns the top N by degree
/// (descending). Ties are broken by external ID (ascending).
pub fn top_degree(graph: &Graph, top_n: usize) -> Vec<DegreeEntry> {
    let mut results: Vec<DegreeEntry> = graph
        .ids()
        .externals()
        .iter()
        .enumerate()
        .map(|(idx, &id)| DegreeEntry {
            id,
            degree: graph.degree(idx as NodeIndex),
        })
        .collect();

    results.sort_unstable_by(|a, b| b.degree.cmp(&a.degree).then(a.id.cmp(&b.id)));

    if top_n > 0 && top_n < results.len() {
        results.truncate(top_n);
    }
    results
}
