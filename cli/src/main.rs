//! Neuronet CLI - bounded BFS neighborhoods over large edge lists.
//!
//! Each query subcommand loads the edge list, runs one query and exits.
//! `shell` keeps one engine alive so a graph is loaded once and queried
//! many times.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use neuronet_core::{EdgeMode, Engine};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::settings::ConfigArgs;
use cli::CliError;

/// Neuronet: load an edge list into a compact adjacency store and query it.
#[derive(Parser)]
#[command(name = "neuronet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as one JSON document per line
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an edge list and show node/edge counts, memory and load time
    Stats {
        /// Edge list file (two integer ids per line)
        file: PathBuf,
    },

    /// Nodes and edges within DEPTH hops of a start node
    Bfs {
        /// Edge list file
        file: PathBuf,

        /// External id of the start node
        #[arg(short, long)]
        start: u64,

        /// Maximum hop count (0 returns only the start node)
        #[arg(short, long, default_value = "2", allow_negative_numbers = true)]
        depth: i64,

        /// Which edges to report: induced (all among visited nodes) or traversed
        #[arg(long, value_parser = cli::util::parse_edge_mode, default_value = "induced")]
        edges: EdgeMode,
    },

    /// Degree of a single node
    Degree {
        /// Edge list file
        file: PathBuf,

        /// External node id
        id: u64,
    },

    /// Neighbors of a single node in stored order
    Neighbors {
        /// Edge list file
        file: PathBuf,

        /// External node id
        id: u64,
    },

    /// Highest-degree nodes
    Top {
        /// Edge list file
        file: PathBuf,

        /// Number of nodes to list (0 lists all)
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Interactive session: load once, query many times
    Shell {
        /// Edge list to load before the first prompt
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries results (possibly JSON), so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.to_config();
    let json = cli.json;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Stats { file } => {
            let engine = cli::load::open(&file, config)?;
            cli::status::run(&engine, &mut out, json)
        }
        Commands::Bfs {
            file,
            start,
            depth,
            edges,
        } => {
            let engine = cli::load::open(&file, config)?;
            cli::subgraph::run(&engine, start, depth, edges, &mut out, json)
        }
        Commands::Degree { file, id } => {
            let engine = cli::load::open(&file, config)?;
            cli::degree::run(&engine, id, &mut out, json)
        }
        Commands::Neighbors { file, id } => {
            let engine = cli::load::open(&file, config)?;
            cli::neighborhood::run(&engine, id, &mut out, json)
        }
        Commands::Top { file, limit } => {
            let engine = cli::load::open(&file, config)?;
            cli::degree::run_top(&engine, limit, &mut out, json)
        }
        Commands::Shell { file } => {
            let mut engine = Engine::new(config)?;
            if let Some(file) = file {
                cli::load::load_into(&mut engine, &file)?;
                cli::status::run(&engine, &mut out, json)?;
            }
            let stdin = io::stdin();
            let prompt = stdin.is_terminal() && !json;
            cli::shell::run(&mut engine, stdin.lock(), &mut out, json, prompt)?;
            out.flush()?;
            Ok(())
        }
    }
}
