//! `neuronet neighbors` command implementation.

use std::io::Write;

use neuronet_core::{Engine, ExternalId};

use super::{display, CliError};

pub fn run<W: Write>(engine: &Engine, id: ExternalId, out: &mut W, json: bool) -> Result<(), CliError> {
    let neighbors = engine.neighbors_of(id)?;
    display::write_neighbors(out, id, &neighbors, json)
}
