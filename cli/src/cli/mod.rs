//! CLI command implementations.

mod display;

pub mod degree;
pub mod load;
pub mod neighborhood;
pub mod settings;
pub mod shell;
pub mod status;
pub mod subgraph;
pub mod util;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] neuronet_core::Error),

    #[error("cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
