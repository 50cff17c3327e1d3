use clap::Args;
use neuronet_core::{EngineConfig, Orientation};

/// Load settings shared by every subcommand. Each flag falls back to an
/// environment variable so a shell profile can pin them.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Store each line as a directed edge (source -> target)
    #[arg(long, global = true, env = "NEURONET_DIRECTED")]
    pub directed: bool,

    /// Lines starting with this marker are skipped
    #[arg(long, global = true, env = "NEURONET_COMMENT_PREFIX", default_value = "#")]
    pub comment_prefix: String,

    /// Refuse to load graphs whose estimated footprint exceeds this many MiB
    #[arg(
        long,
        global = true,
        env = "NEURONET_MAX_MEMORY_MB",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_memory_mb: Option<u64>,
}

impl ConfigArgs {
    pub fn to_config(&self) -> EngineConfig {
        EngineConfig {
            orientation: if self.directed {
                Orientation::Directed
            } else {
                Orientation::Undirected
            },
            comment_prefix: self.comment_prefix.clone(),
            max_memory_mb: self.max_memory_mb,
        }
    }
}
