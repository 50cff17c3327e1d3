use std::time::Instant;

use neuronet_core::EdgeMode;

/// Parse an edge reporting mode.
///
/// Accepts: "induced", "traversed" (case-insensitive), plus the short forms
/// "all" and "walked".
pub fn parse_edge_mode(s: &str) -> Result<EdgeMode, String> {
    match s.to_lowercase().as_str() {
        "induced" | "all" => Ok(EdgeMode::Induced),
        "traversed" | "walked" => Ok(EdgeMode::Traversed),
        other => Err(format!(
            "invalid edge mode '{other}' (use 'induced' or 'traversed')"
        )),
    }
}

pub fn edge_mode_str(mode: EdgeMode) -> &'static str {
    match mode {
        EdgeMode::Induced => "induced",
        EdgeMode::Traversed => "traversed",
    }
}

/// Human-readable byte count, binary units.
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

pub fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
