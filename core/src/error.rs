//! Error types for engine operations.
//!
//! Load errors (`Parse`, `Io`, `MemoryLimit`, `TooManyNodes`) abort a load and
//! leave whatever graph was current before the load in place. Query errors
//! (`UnknownNode`, `InvalidDepth`) never touch engine state.

use std::path::PathBuf;

use thiserror::Error;

use crate::graph::ExternalId;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A significant input line is not exactly two non-negative integers.
    #[error("line {line}: {reason}: {content:?}")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },

    /// The edge-list file could not be opened or read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Degree or neighbor query on an ID that never appeared in the input.
    #[error("node {0} not found")]
    UnknownNode(ExternalId),

    #[error("depth must be non-negative, got {0}")]
    InvalidDepth(i64),

    /// More distinct external IDs than the internal index type can address.
    #[error("input has more than {limit} distinct nodes")]
    TooManyNodes { limit: usize },

    #[error("graph needs ~{estimated_bytes} bytes, exceeds max_memory_mb ({limit_bytes} bytes)")]
    MemoryLimit {
        estimated_bytes: u64,
        limit_bytes: u64,
    },

    /// A fill cursor did not land on the next node's offset.
    #[error("inconsistent build: node {node} cursor at {cursor}, expected {expected}")]
    InconsistentBuild {
        node: usize,
        cursor: u64,
        expected: u64,
    },

    #[error("internal index {index} out of range (node count {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error aborted a load.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. }
                | Self::Io { .. }
                | Self::TooManyNodes { .. }
                | Self::MemoryLimit { .. }
                | Self::InconsistentBuild { .. }
        )
    }

    /// Returns `true` if this error was raised by a read-only query.
    #[must_use]
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::UnknownNode(_) | Self::InvalidDepth(_))
    }

    pub(crate) fn parse(line: usize, content: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }
}
