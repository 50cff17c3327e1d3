use std::collections::HashMap;
use std::mem::size_of;

use crate::error::{Error, Result};
use crate::graph::{ExternalId, NodeIndex};

/// Bidirectional map between external IDs and dense internal indices.
///
/// Indices are handed out in first-seen order, so `0..len()` is always fully
/// populated. Memory is proportional to the number of distinct IDs, not to
/// their numeric range.
#[derive(Debug, Default, Clone)]
pub struct IdIndex {
    forward: HashMap<ExternalId, NodeIndex>,
    reverse: Vec<ExternalId>,
}

impl IdIndex {
    /// Largest number of distinct nodes an index can hold.
    pub const MAX_NODES: usize = NodeIndex::MAX as usize;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            forward: HashMap::with_capacity(capacity),
            reverse: Vec::with_capacity(capacity),
        }
    }

    /// Return the index for `id`, assigning the next free one on first sight.
    ///
    /// The caller is responsible for not exceeding [`Self::MAX_NODES`];
    /// the loader checks [`Self::is_full`] before interning an unseen ID.
    pub fn internalize(&mut self, id: ExternalId) -> NodeIndex {
        if let Some(&idx) = self.forward.get(&id) {
            return idx;
        }
        let idx = self.reverse.len() as NodeIndex;
        self.forward.insert(id, idx);
        self.reverse.push(id);
        idx
    }

    /// Look up an ID without assigning one.
    pub fn get(&self, id: ExternalId) -> Option<NodeIndex> {
        self.forward.get(&id).copied()
    }

    pub fn contains(&self, id: ExternalId) -> bool {
        self.forward.contains_key(&id)
    }

    pub fn external_of(&self, idx: NodeIndex) -> Result<ExternalId> {
        self.reverse
            .get(idx as usize)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index: idx as usize,
                len: self.reverse.len(),
            })
    }

    /// Reverse table as a slice, position = internal index.
    pub fn externals(&self) -> &[ExternalId] {
        &self.reverse
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.reverse.len() >= Self::MAX_NODES
    }

    /// Analytical size of both tables: one (key, value) pair per forward entry
    /// plus one external ID per reverse slot.
    pub fn estimated_memory_bytes(&self) -> usize {
        let forward = self.forward.len() * (size_of::<ExternalId>() + size_of::<NodeIndex>());
        let reverse = self.reverse.len() * size_of::<ExternalId>();
        forward + reverse
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.forward.shrink_to_fit();
        self.reverse.shrink_to_fit();
    }
}
