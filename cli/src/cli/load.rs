use std::path::Path;

use neuronet_core::{Engine, EngineConfig};

use super::CliError;

/// Create an engine and load `file` into it.
pub fn open(file: &Path, config: EngineConfig) -> Result<Engine, CliError> {
    let mut engine = Engine::new(config)?;
    load_into(&mut engine, file)?;
    Ok(engine)
}

/// Load `file`, replacing the current graph only on success.
pub fn load_into(engine: &mut Engine, file: &Path) -> Result<(), CliError> {
    let loaded = engine.load(file)?;
    tracing::info!(
        path = %file.display(),
        nodes = loaded.graph.node_count(),
        edges = loaded.graph.edge_count(),
        load_time_ms = loaded.load_time_ms,
        "dataset ready"
    );
    Ok(())
}
