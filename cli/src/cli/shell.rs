//! `neuronet shell`: one engine kept alive across loads and queries.
//!
//! Reads one command per line. Query and load failures are reported and the
//! session continues with whatever graph is current; only terminal I/O
//! failures end it.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use colored::Colorize;
use neuronet_core::{EdgeMode, Engine, Error, ExternalId};
use serde_json::json;

use super::util::{elapsed_ms, parse_edge_mode};
use super::{degree, load, neighborhood, status, subgraph, CliError};

const HELP: &str = "\
commands:
  load PATH                   load an edge list (replaces the graph on success)
  status                      counts, memory estimate, load time
  bfs ID DEPTH [MODE]         bounded BFS; MODE is induced (default) or traversed
  degree ID                   degree of a node
  neighbors ID                neighbor list in stored order
  top [N]                     N highest-degree nodes (default 10, 0 = all)
  reset                       drop the current graph
  help                        this text
  quit                        leave the shell";

#[derive(Debug, PartialEq)]
enum Command {
    Load(PathBuf),
    Status,
    Bfs {
        start: ExternalId,
        depth: i64,
        mode: EdgeMode,
    },
    Degree(ExternalId),
    Neighbors(ExternalId),
    Top(usize),
    Reset,
    Help,
    Quit,
}

/// Run a session until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    engine: &mut Engine,
    mut input: R,
    out: &mut W,
    json: bool,
    prompt: bool,
) -> Result<(), CliError> {
    let mut line = String::new();
    loop {
        if prompt {
            write!(out, "{} ", "neuronet>".cyan().bold())?;
            out.flush()?;
        }
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                report(out, &msg, "usage", json)?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        // bfs reports its own query time
        let timed = !json && !matches!(command, Command::Bfs { .. } | Command::Help);
        let t = Instant::now();
        match execute(engine, command, out, json) {
            Ok(()) if timed => writeln!(out, "  {}", format!("({:.3} ms)", elapsed_ms(t)).dimmed())?,
            Ok(()) => {}
            Err(CliError::Engine(e)) => report(out, &e.to_string(), error_kind(&e), json)?,
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

fn execute<W: Write>(engine: &mut Engine, command: Command, out: &mut W, json: bool) -> Result<(), CliError> {
    match command {
        Command::Load(path) => {
            load::load_into(engine, &path)?;
            status::run(engine, out, json)
        }
        Command::Status => status::run(engine, out, json),
        Command::Bfs { start, depth, mode } => subgraph::run(engine, start, depth, mode, out, json),
        Command::Degree(id) => degree::run(engine, id, out, json),
        Command::Neighbors(id) => neighborhood::run(engine, id, out, json),
        Command::Top(n) => degree::run_top(engine, n, out, json),
        Command::Reset => {
            engine.reset();
            status::run(engine, out, json)
        }
        Command::Help => {
            writeln!(out, "{HELP}")?;
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}

fn report<W: Write>(out: &mut W, message: &str, kind: &str, json: bool) -> Result<(), CliError> {
    if json {
        serde_json::to_writer(&mut *out, &json!({ "error": message, "kind": kind }))?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}: {message}", "error".red().bold())?;
    }
    Ok(())
}

fn error_kind(e: &Error) -> &'static str {
    match e {
        Error::Parse { .. } => "load_parse",
        Error::Io { .. } => "load_io",
        Error::UnknownNode(_) => "unknown_node",
        Error::InvalidDepth(_) => "invalid_depth",
        Error::MemoryLimit { .. } => "memory_limit",
        Error::TooManyNodes { .. } => "too_many_nodes",
        Error::Config(_) => "config",
        Error::InconsistentBuild { .. } | Error::IndexOutOfRange { .. } => "internal",
    }
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match (verb.to_lowercase().as_str(), args.as_slice()) {
        // the path is the rest of the line, inner spaces included
        ("load", [_, ..]) => Command::Load(PathBuf::from(rest)),
        ("load", []) => return Err("load needs a file path".to_string()),
        ("status" | "stats", []) => Command::Status,
        ("bfs", [start, depth]) => Command::Bfs {
            start: parse_id(start)?,
            depth: parse_depth(depth)?,
            mode: EdgeMode::Induced,
        },
        ("bfs", [start, depth, mode]) => Command::Bfs {
            start: parse_id(start)?,
            depth: parse_depth(depth)?,
            mode: parse_edge_mode(mode)?,
        },
        ("degree", [id]) => Command::Degree(parse_id(id)?),
        ("neighbors", [id]) => Command::Neighbors(parse_id(id)?),
        ("top", []) => Command::Top(10),
        ("top", [n]) => Command::Top(n.parse().map_err(|_| format!("invalid count '{n}'"))?),
        ("reset", []) => Command::Reset,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        (verb, _) => return Err(format!("unrecognized command '{verb}' (try 'help')")),
    };
    Ok(Some(command))
}

fn parse_id(s: &str) -> Result<ExternalId, String> {
    s.parse()
        .map_err(|_| format!("invalid node id '{s}' (expected a non-negative integer)"))
}

fn parse_depth(s: &str) -> Result<i64, String> {
    s.parse().map_err(|_| format!("invalid depth '{s}'"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn session(engine: &mut Engine, script: &str) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        run(engine, script.as_bytes(), &mut out, true, false).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("   \n"), Ok(None));
        assert_eq!(
            parse_command("bfs 1 2\n"),
            Ok(Some(Command::Bfs {
                start: 1,
                depth: 2,
                mode: EdgeMode::Induced
            }))
        );
        assert_eq!(
            parse_command("BFS 7 -1 traversed"),
            Ok(Some(Command::Bfs {
                start: 7,
                depth: -1,
                mode: EdgeMode::Traversed
            }))
        );
        assert_eq!(parse_command("top"), Ok(Some(Command::Top(10))));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
        assert!(parse_command("degree -4").is_err());
        assert!(parse_command("bfs 1").is_err());
        assert!(parse_command("fly 1").unwrap_err().contains("fly"));
        assert!(parse_command("load").unwrap_err().contains("path"));
    }

    #[test]
    fn test_load_path_with_spaces() {
        assert_eq!(
            parse_command("load  /data/my graphs/web  edges.txt \n"),
            Ok(Some(Command::Load(PathBuf::from("/data/my graphs/web  edges.txt"))))
        );

        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("road network");
        fs::create_dir(&nested).unwrap();
        let path = nested.join("ca roads.txt");
        fs::write(&path, "1 2\n").unwrap();

        let mut engine = Engine::default();
        let replies = session(&mut engine, &format!("load {}\n", path.display()));
        assert_eq!(replies[0]["status"]["node_count"], 2);
    }

    #[test]
    fn test_session_queries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        fs::write(&path, "1 2\n2 3\n1 3\n5 6\n").unwrap();

        let mut engine = Engine::default();
        let script = format!(
            "load {}\nbfs 1 1\ndegree 1\ndegree 9\nbfs 9 2\nbfs 1 -3\nneighbors 5\ntop 1\nquit\nstatus\n",
            path.display()
        );
        let replies = session(&mut engine, &script);

        assert_eq!(replies.len(), 8);
        assert_eq!(replies[0]["status"]["node_count"], 5);
        assert_eq!(replies[1]["nodes"], json!([1, 2, 3]));
        assert_eq!(replies[2], json!({ "id": 1, "degree": 2 }));
        assert_eq!(replies[3]["kind"], "unknown_node");
        assert_eq!(replies[4]["nodes"], json!([]));
        assert_eq!(replies[5]["kind"], "invalid_depth");
        assert_eq!(replies[6]["neighbors"], json!([6]));
        assert_eq!(replies[7][0]["degree"], 2);
    }

    #[test]
    fn test_session_failed_reload_keeps_graph() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.txt");
        fs::write(&good, "10 20\n").unwrap();
        fs::write(&bad, "10 20\nbroken\n").unwrap();

        let mut engine = Engine::default();
        let script = format!(
            "load {}\nload {}\nload {}\ndegree 10\nreset\ndegree 10\n",
            good.display(),
            bad.display(),
            dir.path().join("missing.txt").display()
        );
        let replies = session(&mut engine, &script);

        assert_eq!(replies[1]["kind"], "load_parse");
        assert_eq!(replies[2]["kind"], "load_io");
        assert_eq!(replies[3]["degree"], 1);
        assert_eq!(replies[4]["status"]["state"], "not_loaded");
        assert_eq!(replies[5]["kind"], "unknown_node");
    }

    #[test]
    fn test_usage_errors_do_not_end_session() {
        let mut engine = Engine::default();
        let replies = session(&mut engine, "bogus\ntop\n");
        assert_eq!(replies[0]["kind"], "usage");
        assert_eq!(replies[1], json!([]));
    }
}
