use std::mem::size_of;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::index::IdIndex;

/// Node identifier as it appears in the input file.
pub type ExternalId = u64;

/// Dense node identifier inside the store, `0..node_count()`.
pub type NodeIndex = u32;

/// How an input line `a b` is stored.
///
/// `Undirected` places `b` in `a`'s run and `a` in `b`'s run; `Directed`
/// only places `b` in `a`'s run. A self-loop occupies a single slot either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Undirected,
    Directed,
}

impl Orientation {
    pub fn is_directed(self) -> bool {
        matches!(self, Self::Directed)
    }
}

/// Immutable compressed adjacency store (CSR).
///
/// `offsets` has `node_count() + 1` entries; node `i`'s neighbors occupy
/// `neighbors[offsets[i]..offsets[i + 1]]` in input order.
#[derive(Debug, Clone)]
pub struct Graph {
    ids: IdIndex,
    offsets: Vec<u64>,
    neighbors: Vec<NodeIndex>,
    edge_count: usize,
    self_loops: usize,
    orientation: Orientation,
}

impl Graph {
    /// A graph with no nodes.
    pub fn empty(orientation: Orientation) -> Self {
        Self {
            ids: IdIndex::new(),
            offsets: vec![0],
            neighbors: Vec::new(),
            edge_count: 0,
            self_loops: 0,
            orientation,
        }
    }

    /// Build from (source, target) pairs of external IDs.
    pub fn from_edges<I>(orientation: Orientation, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ExternalId, ExternalId)>,
    {
        let mut builder = GraphBuilder::new(orientation);
        for (source, target) in edges {
            builder.add_edge(source, target)?;
        }
        builder.finish()
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Edges as present in the input, each line counted once.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn self_loop_count(&self) -> usize {
        self.self_loops
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Length of node `idx`'s run. Zero for an index outside the graph.
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.neighbors(idx).len()
    }

    /// Node `idx`'s neighbor run in input order. Empty for an index outside the graph.
    pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        let i = idx as usize;
        if i + 1 >= self.offsets.len() {
            return &[];
        }
        &self.neighbors[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }

    /// Neighbor run of `idx` translated to external IDs.
    pub fn neighbor_ids(&self, idx: NodeIndex) -> impl Iterator<Item = ExternalId> + '_ {
        let externals = self.ids.externals();
        self.neighbors(idx).iter().map(move |&n| externals[n as usize])
    }

    pub fn index_of(&self, id: ExternalId) -> Option<NodeIndex> {
        self.ids.get(id)
    }

    pub fn external_of(&self, idx: NodeIndex) -> Result<ExternalId> {
        self.ids.external_of(idx)
    }

    pub fn ids(&self) -> &IdIndex {
        &self.ids
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// The concatenated neighbor runs of all nodes.
    pub fn neighbor_slots(&self) -> &[NodeIndex] {
        &self.neighbors
    }

    /// Analytical footprint of the offsets array, the neighbors array and
    /// both identifier tables, from element widths and current lengths.
    pub fn estimated_memory_bytes(&self) -> usize {
        self.offsets.len() * size_of::<u64>()
            + self.neighbors.len() * size_of::<NodeIndex>()
            + self.ids.estimated_memory_bytes()
    }
}

/// Two-pass CSR construction.
///
/// `add_edge` is the scan pass: it interns both endpoints, counts degrees and
/// buffers the internalized pair. `finish` runs the prefix sum over the
/// degree counts and then the fill pass over the buffered pairs.
#[derive(Debug)]
pub struct GraphBuilder {
    orientation: Orientation,
    ids: IdIndex,
    degrees: Vec<u64>,
    edges: Vec<(NodeIndex, NodeIndex)>,
    slots: u64,
    self_loops: usize,
}

impl GraphBuilder {
    pub fn new(orientation: Orientation) -> Self {
        Self::with_capacity(orientation, 0, 0)
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(orientation: Orientation, node_count: usize, edge_count: usize) -> Self {
        Self {
            orientation,
            ids: IdIndex::with_capacity(node_count),
            degrees: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count),
            slots: 0,
            self_loops: 0,
        }
    }

    pub fn add_edge(&mut self, source: ExternalId, target: ExternalId) -> Result<()> {
        let u = self.intern(source)?;
        let v = self.intern(target)?;

        self.degrees[u as usize] += 1;
        self.slots += 1;
        if u == v {
            self.self_loops += 1;
        } else if !self.orientation.is_directed() {
            self.degrees[v as usize] += 1;
            self.slots += 1;
        }

        self.edges.push((u, v));
        Ok(())
    }

    fn intern(&mut self, id: ExternalId) -> Result<NodeIndex> {
        if let Some(idx) = self.ids.get(id) {
            return Ok(idx);
        }
        if self.ids.is_full() {
            return Err(Error::TooManyNodes {
                limit: IdIndex::MAX_NODES,
            });
        }
        let idx = self.ids.internalize(id);
        self.degrees.push(0);
        Ok(idx)
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Footprint the finished graph will report, known before any CSR
    /// array is allocated.
    pub fn estimated_memory_bytes(&self) -> u64 {
        let offsets = (self.ids.len() as u64 + 1) * size_of::<u64>() as u64;
        let neighbors = self.slots * size_of::<NodeIndex>() as u64;
        offsets + neighbors + self.ids.estimated_memory_bytes() as u64
    }

    pub fn finish(self) -> Result<Graph> {
        let Self {
            orientation,
            mut ids,
            degrees,
            edges,
            slots,
            self_loops,
        } = self;
        let n = ids.len();

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0u64);
        let mut total = 0u64;
        for &d in &degrees {
            total += d;
            offsets.push(total);
        }
        debug_assert_eq!(total, slots);

        // Degree counts are no longer needed; reuse the buffer as fill cursors.
        let mut cursors = degrees;
        cursors.copy_from_slice(&offsets[..n]);

        let mut neighbors: Vec<NodeIndex> = vec![0; total as usize];
        for &(u, v) in &edges {
            place(&offsets, &mut cursors, &mut neighbors, u, v)?;
            if u != v && !orientation.is_directed() {
                place(&offsets, &mut cursors, &mut neighbors, v, u)?;
            }
        }

        for (node, (&cursor, &expected)) in cursors.iter().zip(&offsets[1..]).enumerate() {
            if cursor != expected {
                return Err(Error::InconsistentBuild {
                    node,
                    cursor,
                    expected,
                });
            }
        }

        ids.shrink_to_fit();
        debug!(
            nodes = n,
            edges = edges.len(),
            slots = total,
            self_loops,
            "CSR built"
        );

        Ok(Graph {
            ids,
            offsets,
            neighbors,
            edge_count: edges.len(),
            self_loops,
            orientation,
        })
    }
}

/// Write `v` into `u`'s next free slot.
fn place(
    offsets: &[u64],
    cursors: &mut [u64],
    neighbors: &mut [NodeIndex],
    u: NodeIndex,
    v: NodeIndex,
) -> Result<()> {
    let node = u as usize;
    let cursor = cursors[node];
    if cursor >= offsets[node + 1] {
        return Err(Error::InconsistentBuild {
            node,
            cursor,
            expected: offsets[node + 1],
        });
    }
    neighbors[cursor as usize] = v;
    cursors[node] = cursor + 1;
    Ok(())
}
