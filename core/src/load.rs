//! Edge-list parsing.
//!
//! Input is plain text, one `source target` pair per significant line.
//! Blank lines and lines whose first non-blank characters are the comment
//! prefix are skipped without being decoded, so comments may hold any
//! bytes. Anything else that is not exactly two non-negative integers in
//! UTF-8 text aborts the load with the offending line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::graph::{ExternalId, Graph, GraphBuilder};

/// Longest line excerpt carried in a parse error.
const MAX_EXCERPT: usize = 120;

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Skip,
    Edge(ExternalId, ExternalId),
}

/// Load and build a graph from an edge-list file.
pub fn load_edge_list(path: &Path, config: &EngineConfig) -> Result<Graph> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_edge_list(BufReader::new(file), config, path)
}

/// Build a graph from any buffered reader. `source` only labels errors and logs.
pub fn read_edge_list<R: BufRead>(mut reader: R, config: &EngineConfig, source: &Path) -> Result<Graph> {
    config.validate()?;
    info!(source = %source.display(), orientation = ?config.orientation, "loading edge list");

    let t = Instant::now();
    let mut builder = GraphBuilder::new(config.orientation);
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut skipped = 0usize;

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(|e| Error::Io {
            path: source.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        line_no += 1;

        match parse_line(&buf, &config.comment_prefix) {
            Ok(Line::Skip) => skipped += 1,
            Ok(Line::Edge(from, to)) => builder.add_edge(from, to)?,
            Err(reason) => {
                let text = String::from_utf8_lossy(&buf);
                return Err(Error::parse(line_no, excerpt(&text), reason));
            }
        }
    }
    debug!(
        lines = line_no,
        skipped,
        nodes = builder.node_count(),
        edges = builder.edge_count(),
        elapsed_ms = t.elapsed().as_secs_f64() * 1000.0,
        "scan pass done"
    );

    if let Some(limit_bytes) = config.max_memory_bytes() {
        let estimated_bytes = builder.estimated_memory_bytes();
        if estimated_bytes > limit_bytes {
            return Err(Error::MemoryLimit {
                estimated_bytes,
                limit_bytes,
            });
        }
    }

    let graph = builder.finish()?;
    info!(
        source = %source.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        memory_bytes = graph.estimated_memory_bytes(),
        elapsed_ms = t.elapsed().as_secs_f64() * 1000.0,
        "edge list loaded"
    );
    Ok(graph)
}

fn parse_line(raw: &[u8], comment_prefix: &str) -> std::result::Result<Line, String> {
    let line = raw.trim_ascii();
    if line.is_empty() || line.starts_with(comment_prefix.as_bytes()) {
        return Ok(Line::Skip);
    }
    let line = std::str::from_utf8(line).map_err(|_| "line is not valid UTF-8".to_string())?;

    let mut fields = line.split_whitespace();
    let (Some(source), Some(target), None) = (fields.next(), fields.next(), fields.next()) else {
        let count = line.split_whitespace().count();
        return Err(format!("expected 2 fields, found {count}"));
    };

    let source = parse_id(source).ok_or("source is not a non-negative integer")?;
    let target = parse_id(target).ok_or("target is not a non-negative integer")?;
    Ok(Line::Edge(source, target))
}

fn parse_id(field: &str) -> Option<ExternalId> {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn excerpt(raw: &str) -> &str {
    let line = raw.trim_end_matches(['\n', '\r']);
    match line.char_indices().nth(MAX_EXCERPT) {
        Some((cut, _)) => &line[..cut],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Orientation;

    fn read(text: &str) -> Result<Graph> {
        read_edge_list(text.as_bytes(), &EngineConfig::default(), Path::new("<test>"))
    }

    #[test]
    fn test_parse_line_kinds() {
        assert_eq!(parse_line(b"1 2\n", "#"), Ok(Line::Edge(1, 2)));
        assert_eq!(parse_line(b"  7\t\t8  \r\n", "#"), Ok(Line::Edge(7, 8)));
        assert_eq!(parse_line(b"\n", "#"), Ok(Line::Skip));
        assert_eq!(parse_line(b"   \t\n", "#"), Ok(Line::Skip));
        assert_eq!(parse_line(b"# FromNodeId ToNodeId\n", "#"), Ok(Line::Skip));
        assert_eq!(parse_line(b"  # indented comment", "#"), Ok(Line::Skip));
        assert_eq!(parse_line(b"% matrix market", "%"), Ok(Line::Skip));
    }

    #[test]
    fn test_parse_line_rejects() {
        assert!(parse_line(b"1", "#").is_err());
        assert!(parse_line(b"1 2 3", "#").is_err());
        assert!(parse_line(b"1 -2", "#").is_err());
        assert!(parse_line(b"+1 2", "#").is_err());
        assert!(parse_line(b"a b", "#").is_err());
        assert!(parse_line(b"1.5 2", "#").is_err());
        assert!(parse_line(b"1 99999999999999999999999", "#").is_err());
    }

    #[test]
    fn test_large_ids_accepted() {
        assert_eq!(
            parse_line(b"18446744073709551615 0", "#"),
            Ok(Line::Edge(u64::MAX, 0))
        );
    }

    #[test]
    fn test_read_snap_style_file() {
        let text = "# Directed graph: sample\n# Nodes: 5 Edges: 4\n1 2\n2 3\n\n1 3\n5 6\n";
        let g = read(text).unwrap();
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_no_trailing_newline() {
        let g = read("1 2\n3 4").unwrap();
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = read("1 2\n# fine\n3 x\n4 5\n").unwrap_err();
        match err {
            Error::Parse { line, content, .. } => {
                assert_eq!(line, 3);
                assert_eq!(content, "3 x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_long_line_excerpt_truncated() {
        let long = format!("1 {}\n", "9".repeat(500));
        let err = read(&long).unwrap_err();
        let Error::Parse { content, .. } = err else {
            panic!("expected parse error");
        };
        assert_eq!(content.chars().count(), MAX_EXCERPT);
    }

    #[test]
    fn test_empty_input() {
        let g = read("").unwrap();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.offsets(), &[0]);
    }

    #[test]
    fn test_directed_config() {
        let g = read_edge_list(
            "1 2\n".as_bytes(),
            &EngineConfig::directed(),
            Path::new("<test>"),
        )
        .unwrap();
        assert_eq!(g.orientation(), Orientation::Directed);
        assert_eq!(g.degree(g.index_of(2).unwrap()), 0);
    }

    #[test]
    fn test_memory_cap() {
        let cfg = EngineConfig {
            max_memory_mb: Some(1),
            ..EngineConfig::default()
        };
        // 100k distinct pairs: well over 1 MiB of offsets, slots and id tables.
        let text: String = (0..100_000u64).map(|i| format!("{} {}\n", 2 * i, 2 * i + 1)).collect();
        let err = read_edge_list(text.as_bytes(), &cfg, Path::new("<test>")).unwrap_err();
        assert!(matches!(err, Error::MemoryLimit { .. }));

        assert!(read_edge_list("1 2\n".as_bytes(), &cfg, Path::new("<test>")).is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_edge_list(Path::new("/nonexistent/edges.txt"), &EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_non_utf8_comment_skipped() {
        let bytes: &[u8] = b"# Author: M\xfcller\n  #\xff\xfe\n1 2\n2 3\n";
        let g = read_edge_list(bytes, &EngineConfig::default(), Path::new("<test>")).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_non_utf8_data_line_is_parse_error() {
        let bytes: &[u8] = b"1 2\n3 \xff4\n";
        let err = read_edge_list(bytes, &EngineConfig::default(), Path::new("<test>")).unwrap_err();
        match err {
            Error::Parse { line, content, reason } => {
                assert_eq!(line, 2);
                assert_eq!(content, "3 \u{fffd}4");
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
