//! `neuronet degree` and `neuronet top` command implementations.

use std::io::Write;

use neuronet_core::{Engine, ExternalId};

use super::{display, CliError};

pub fn run<W: Write>(engine: &Engine, id: ExternalId, out: &mut W, json: bool) -> Result<(), CliError> {
    let degree = engine.degree_of(id)?;
    display::write_degree(out, id, degree, json)
}

/// Print the `limit` highest-degree nodes (all nodes if 0).
pub fn run_top<W: Write>(engine: &Engine, limit: usize, out: &mut W, json: bool) -> Result<(), CliError> {
    display::write_top(out, &engine.top_degree(limit), json)
}
