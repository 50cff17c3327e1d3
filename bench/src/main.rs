use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use neuronet_core::{EdgeMode, Engine, EngineConfig, ExternalId, Graph, GraphBuilder, Orientation};
use tracing_subscriber::EnvFilter;

/// Synthetic load and query benchmarks for the neuronet adjacency store.
#[derive(Parser)]
#[command(name = "neuronet-bench", version, about, long_about = None)]
struct Args {
    /// Topology to generate
    #[arg(value_enum, default_value = "all")]
    mode: Mode,

    /// Target node count
    #[arg(default_value = "1000000")]
    node_count: u64,

    /// Also dump each generated graph as an edge list and time loading it back
    #[arg(long, value_name = "PATH")]
    write: Option<PathBuf>,

    /// Build directed graphs
    #[arg(long)]
    directed: bool,

    /// Verbose output (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run every generator
    All,
    /// Fractal branching tree (deep paths)
    Lsystem,
    /// Preferential attachment via edge sampling (hub-and-spoke)
    Scalefree,
    /// Watts-Strogatz ring lattice + shortcuts
    Smallworld,
    /// Erdos-Renyi uniform random edges
    Random,
    /// Two dense clusters joined by a thin bridge
    Barbell,
    /// Diffusion-limited aggregation (organic branching)
    Dla,
}

type Generator = fn(u64) -> Vec<(u64, u64)>;

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let generators: Vec<(&str, Generator)> = match args.mode {
        Mode::Lsystem => vec![("L-system tree", gen_lsystem)],
        Mode::Scalefree => vec![("Scale-free (edge sampling)", gen_scale_free)],
        Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Barbell => vec![("Barbell (cluster-bridge-cluster)", gen_barbell)],
        Mode::Dla => vec![("DLA (organic branching)", gen_dla)],
        Mode::All => vec![
            ("L-system tree", gen_lsystem as Generator),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (cluster-bridge-cluster)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
    };

    let orientation = if args.directed {
        Orientation::Directed
    } else {
        Orientation::Undirected
    };

    println!("neuronet-bench");
    println!("==============");
    println!();

    for (name, generator) in generators {
        if let Err(e) = run_benchmark(name, generator, args.node_count, orientation, args.write.as_deref()) {
            eprintln!("error: {name}: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn run_benchmark(
    name: &str,
    generator: Generator,
    node_count: u64,
    orientation: Orientation,
    write: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- {name} ---");
    println!("Target: {node_count} nodes");

    let t = Instant::now();
    let edges = generator(node_count);
    println!("Generated {} edge lines in {:.2}s", edges.len(), t.elapsed().as_secs_f64());

    let t = Instant::now();
    let mut builder = GraphBuilder::with_capacity(orientation, node_count as usize, edges.len());
    for &(a, b) in &edges {
        builder.add_edge(scramble(a), scramble(b))?;
    }
    let graph = builder.finish()?;
    println!(
        "Built CSR in {:.2}s: {} nodes, {} edges, ~{:.1} MiB",
        t.elapsed().as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.estimated_memory_bytes() as f64 / 1_048_576.0
    );

    // dense id 0 is the root or first seed in every generator
    let start = scramble(0);
    bfs_table(&graph, start);
    degree_lookups(&graph, node_count);

    if let Some(path) = write {
        file_round_trip(&graph, &edges, path, orientation)?;
    }
    println!();
    Ok(())
}

fn bfs_table(graph: &Graph, start: ExternalId) {
    println!();
    println!("{:>8} {:>12} {:>12} {:>8} {:>10}", "depth", "nodes", "edges", "reached", "time");
    println!("{:->8} {:->12} {:->12} {:->8} {:->10}", "", "", "", "", "");

    for depth in [1u32, 2, 3, 5, 10] {
        let t = Instant::now();
        let sub = neuronet_core::bfs(graph, start, depth, EdgeMode::Induced);
        let elapsed = t.elapsed();
        println!(
            "{:>8} {:>12} {:>12} {:>8} {:>8.1}ms",
            depth,
            sub.nodes.len(),
            sub.edges.len(),
            sub.depth_reached,
            elapsed.as_secs_f64() * 1000.0
        );
        if sub.nodes.len() >= graph.node_count() {
            println!("{:>8} (entire graph reached)", "");
            break;
        }
    }
}

fn degree_lookups(graph: &Graph, node_count: u64) {
    const LOOKUPS: u64 = 100_000;
    let mut rng = FastRng::new(2024);
    let mut total = 0usize;
    let mut missing = 0usize;

    let t = Instant::now();
    for _ in 0..LOOKUPS {
        // ~1 in 8 probes is outside the generated range
        let id = scramble(rng.next(node_count + node_count / 8 + 1));
        match neuronet_core::degree_of(graph, id) {
            Ok(d) => total += d,
            Err(_) => missing += 1,
        }
    }
    let elapsed = t.elapsed();
    println!();
    println!(
        "Degree: {LOOKUPS} lookups in {:.1}ms ({:.0} ns/lookup, {missing} unknown, degree sum {total})",
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_nanos() as f64 / LOOKUPS as f64
    );
}

fn file_round_trip(
    graph: &Graph,
    edges: &[(u64, u64)],
    path: &Path,
    orientation: Orientation,
) -> Result<(), Box<dyn std::error::Error>> {
    let t = Instant::now();
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# neuronet-bench: {} nodes, {} edges", graph.node_count(), edges.len())?;
    writeln!(out, "# FromNodeId\tToNodeId")?;
    for &(a, b) in edges {
        writeln!(out, "{}\t{}", scramble(a), scramble(b))?;
    }
    out.flush()?;
    println!("Wrote {} in {:.2}s", path.display(), t.elapsed().as_secs_f64());

    let mut engine = Engine::new(EngineConfig {
        orientation,
        ..EngineConfig::default()
    })?;
    let loaded = engine.load(path)?;
    println!(
        "Loaded back in {:.1}ms ({} nodes, {} edges)",
        loaded.load_time_ms,
        loaded.graph.node_count(),
        loaded.graph.edge_count()
    );
    if loaded.graph.node_count() != graph.node_count() || loaded.graph.edge_count() != graph.edge_count() {
        return Err("file load disagrees with in-memory build".into());
    }
    Ok(())
}

/// Map dense generator ids onto a sparse 64-bit space. Odd-constant
/// multiplication is a bijection mod 2^64, so distinct ids stay distinct.
fn scramble(id: u64) -> ExternalId {
    id.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0x0000_5DEE_CE66_D000
}

// ---------------------------------------------------------------------------
// Generators: all O(n) or O(n + edges), single-threaded, deterministic.
// They emit dense ids starting at 0; the harness scrambles them.
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// L-system fractal tree: every node spawns three children.
fn gen_lsystem(node_count: u64) -> Vec<(u64, u64)> {
    let branching = 3u64;
    let mut edges = Vec::with_capacity(node_count as usize);
    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                edges.push((parent, next_id));
                next_frontier.push(next_id);
                next_id += 1;
            }
        }
        frontier = next_frontier;
    }
    edges
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Picking a random endpoint of an existing edge is picking a node with
/// probability proportional to its degree.
fn gen_scale_free(node_count: u64) -> Vec<(u64, u64)> {
    let edges_per_node = 10u64;
    let mut edges = Vec::with_capacity((node_count * edges_per_node) as usize);
    let mut endpoints: Vec<u64> = Vec::with_capacity((node_count * edges_per_node * 2) as usize);
    let mut rng = FastRng::new(12345);

    let seed = 5u64.min(node_count);
    for i in 0..seed {
        for j in (i + 1)..seed {
            edges.push((i, j));
            endpoints.extend([i, j]);
        }
    }

    for new_node in seed..node_count {
        let attach = edges_per_node.min(new_node);
        for _ in 0..attach {
            if endpoints.is_empty() {
                break;
            }
            let target = endpoints[rng.next(endpoints.len() as u64) as usize];
            if target != new_node {
                edges.push((new_node, target));
                endpoints.extend([new_node, target]);
            }
        }
    }
    edges
}

/// Small-world (Watts-Strogatz): ring lattice with 5% of edges rewired.
fn gen_small_world(node_count: u64) -> Vec<(u64, u64)> {
    let k = 10u64;
    let p = 0.05f64;
    let mut edges = Vec::with_capacity((node_count * k) as usize);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k.min(node_count.saturating_sub(1)) {
            let neighbor = (i + j) % node_count;
            if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                edges.push((i, if rewired != i { rewired } else { neighbor }));
            } else {
                edges.push((i, neighbor));
            }
        }
    }
    edges
}

/// Erdos-Renyi: ~10 uniform random edges per node, no structure.
fn gen_random(node_count: u64) -> Vec<(u64, u64)> {
    let target_edges = node_count * 10;
    let mut edges = Vec::with_capacity(target_edges as usize);
    let mut rng = FastRng::new(54321);

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            edges.push((from, to));
        }
    }
    edges
}

/// Barbell: two dense clusters joined by a chain of ten bridge nodes.
fn gen_barbell(node_count: u64) -> Vec<(u64, u64)> {
    let bridge_len = 10u64;
    let cluster = node_count.saturating_sub(bridge_len) / 2;
    let mut edges = Vec::with_capacity((cluster * 40 + bridge_len + 1) as usize);
    let mut rng = FastRng::new(99999);
    let fanout = 20u64.min(cluster.saturating_sub(1));

    let b_start = cluster + bridge_len;
    for base in [0, b_start] {
        for i in 0..cluster {
            for _ in 0..fanout {
                let target = rng.next(cluster);
                if target != i {
                    edges.push((base + i, base + target));
                }
            }
        }
    }

    // chain: last of A -> bridge nodes -> first of B
    let mut prev = cluster.saturating_sub(1);
    for id in cluster..=b_start {
        edges.push((prev, id));
        prev = id;
    }
    edges
}

/// DLA: each new node sticks to a recent "surface" node, with a 10% chance
/// of a second long-range link.
fn gen_dla(node_count: u64) -> Vec<(u64, u64)> {
    let surface_max = 10_000usize;
    let mut edges = Vec::with_capacity((node_count + node_count / 10) as usize);
    let mut rng = FastRng::new(77777);
    let mut surface: VecDeque<u64> = VecDeque::with_capacity(surface_max + 1);
    surface.push_back(0);

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        edges.push((new_node, attach_to));

        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                edges.push((new_node, other));
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }
    edges
}
