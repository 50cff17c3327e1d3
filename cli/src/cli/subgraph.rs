//! `neuronet bfs` command implementation.

use std::io::Write;
use std::time::Instant;

use neuronet_core::{EdgeMode, Engine, ExternalId};

use super::util::elapsed_ms;
use super::{display, CliError};

/// Run a bounded BFS and print the subgraph it reaches.
///
/// A start node that is not in the graph prints an empty result rather than
/// failing; a negative depth fails before any traversal.
pub fn run<W: Write>(
    engine: &Engine,
    start: ExternalId,
    depth: i64,
    mode: EdgeMode,
    out: &mut W,
    json: bool,
) -> Result<(), CliError> {
    let t = Instant::now();
    let subgraph = engine.bfs_with(start, depth, mode)?;
    let elapsed = elapsed_ms(t);
    tracing::debug!(
        start,
        depth,
        nodes = subgraph.nodes.len(),
        edges = subgraph.edges.len(),
        elapsed_ms = elapsed,
        "bfs"
    );
    display::write_subgraph(out, &subgraph, mode, elapsed, json)
}
