//! Text and JSON rendering for command results.
//!
//! JSON output is complete and meant for a renderer on the other end of a
//! pipe. Text output caps long node and edge listings.

use std::io::Write;

use colored::Colorize;
use neuronet_core::{DegreeEntry, EdgeMode, EngineConfig, EngineStatus, ExternalId, LoadState, Subgraph};
use serde::Serialize;
use serde_json::json;

use super::util::{edge_mode_str, format_bytes};
use super::CliError;

/// Maximum nodes or edges listed in text mode.
const MAX_LISTED: usize = 50;

#[derive(Serialize)]
struct BfsReport<'a> {
    #[serde(flatten)]
    subgraph: &'a Subgraph,
    mode: EdgeMode,
    elapsed_ms: f64,
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_status<W: Write>(
    out: &mut W,
    status: &EngineStatus,
    config: &EngineConfig,
    json: bool,
) -> Result<(), CliError> {
    if json {
        return write_json(out, &json!({ "status": status, "config": config }));
    }

    match status.state {
        LoadState::NotLoaded => {
            writeln!(
                out,
                "{} (generation {})",
                "No graph loaded".yellow(),
                status.generation
            )?;
        }
        LoadState::Loaded => {
            writeln!(
                out,
                "{}: {}",
                "Source".white().bold(),
                status.source.as_deref().unwrap_or("-")
            )?;
            writeln!(
                out,
                "  {}: {}  {}: {}  {}: {}",
                "Nodes".white().bold(),
                status.node_count.to_string().green(),
                "Edges".white().bold(),
                status.edge_count.to_string().green(),
                "Self-loops".white().bold(),
                status.self_loops
            )?;
            writeln!(
                out,
                "  {}: ~{} (CSR + id tables)",
                "Memory".white().bold(),
                format_bytes(status.memory_bytes)
            )?;
            writeln!(
                out,
                "  {}: {:.1} ms  {}: {}",
                "Load time".white().bold(),
                status.load_time_ms,
                "Generation".white().bold(),
                status.generation
            )?;
        }
    }
    writeln!(
        out,
        "  {}: {:?}, comment prefix {:?}, memory cap {}",
        "Config".dimmed(),
        config.orientation,
        config.comment_prefix,
        config
            .max_memory_mb
            .map_or_else(|| "none".to_string(), |mb| format!("{mb} MiB"))
    )?;
    Ok(())
}

pub fn write_subgraph<W: Write>(
    out: &mut W,
    subgraph: &Subgraph,
    mode: EdgeMode,
    elapsed_ms: f64,
    json: bool,
) -> Result<(), CliError> {
    if json {
        return write_json(
            out,
            &BfsReport {
                subgraph,
                mode,
                elapsed_ms,
            },
        );
    }

    if subgraph.is_empty() {
        writeln!(
            out,
            "Node {} not found; nothing to traverse",
            subgraph.start.to_string().cyan()
        )?;
        return Ok(());
    }

    writeln!(
        out,
        "{} from {}: {} nodes, {} {} edges, depth reached {} ({:.3} ms)",
        "BFS".white().bold(),
        subgraph.start.to_string().cyan().bold(),
        subgraph.nodes.len().to_string().green(),
        subgraph.edges.len().to_string().green(),
        edge_mode_str(mode),
        subgraph.depth_reached,
        elapsed_ms
    )?;

    let nodes: Vec<String> = subgraph.nodes.iter().map(ToString::to_string).collect();
    write_listing(out, "nodes", &nodes)?;
    let edges: Vec<String> = subgraph.edges.iter().map(|(a, b)| format!("{a}-{b}")).collect();
    write_listing(out, "edges", &edges)?;
    Ok(())
}

fn write_listing<W: Write>(out: &mut W, title: &str, items: &[String]) -> Result<(), CliError> {
    let shown = &items[..items.len().min(MAX_LISTED)];
    write!(out, "  {}: {}", title.dimmed(), shown.join(" "))?;
    if items.len() > shown.len() {
        write!(out, " {}", format!("... and {} more", items.len() - shown.len()).dimmed())?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn write_degree<W: Write>(
    out: &mut W,
    id: ExternalId,
    degree: usize,
    json: bool,
) -> Result<(), CliError> {
    if json {
        return write_json(out, &DegreeEntry { id, degree });
    }
    writeln!(out, "Node {} has degree {}", id.to_string().cyan(), degree.to_string().green())?;
    Ok(())
}

pub fn write_neighbors<W: Write>(
    out: &mut W,
    id: ExternalId,
    neighbors: &[ExternalId],
    json: bool,
) -> Result<(), CliError> {
    if json {
        return write_json(out, &json!({ "id": id, "neighbors": neighbors }));
    }
    writeln!(
        out,
        "Node {} has {} neighbors",
        id.to_string().cyan(),
        neighbors.len().to_string().green()
    )?;
    let items: Vec<String> = neighbors.iter().map(ToString::to_string).collect();
    write_listing(out, "in stored order", &items)
}

pub fn write_top<W: Write>(out: &mut W, entries: &[DegreeEntry], json: bool) -> Result<(), CliError> {
    if json {
        return write_json(out, &entries);
    }
    if entries.is_empty() {
        writeln!(out, "No nodes")?;
        return Ok(());
    }
    writeln!(out, "{:>6} {:>20} {:>10}", "rank", "node", "degree")?;
    writeln!(out, "{:->6} {:->20} {:->10}", "", "", "")?;
    for (rank, entry) in entries.iter().enumerate() {
        writeln!(out, "{:>6} {:>20} {:>10}", rank + 1, entry.id, entry.degree)?;
    }
    Ok(())
}
