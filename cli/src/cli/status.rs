//! `neuronet stats` command implementation.

use std::io::Write;

use neuronet_core::Engine;

use super::{display, CliError};

/// Print counts, footprint and load timing for the engine's current graph.
pub fn run<W: Write>(engine: &Engine, out: &mut W, json: bool) -> Result<(), CliError> {
    display::write_status(out, &engine.status(), engine.config(), json)
}
