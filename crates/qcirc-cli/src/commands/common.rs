//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qcirc_qasm::{Decoded, decode_with_report};

/// Read a circuit file.
pub fn load_source(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

/// Read and leniently decode a circuit file.
pub fn load_graph(path: &str) -> Result<Decoded> {
    let source = load_source(path)?;
    let decoded = decode_with_report(&source);
    tracing::info!(
        path,
        nodes = decoded.graph.len(),
        skipped = decoded.skipped.len(),
        "decoded circuit"
    );
    Ok(decoded)
}

/// Print skipped lines to stderr.
pub fn report_skipped(decoded: &Decoded) {
    for skipped in &decoded.skipped {
        eprintln!(
            "  {} line {}: {} ({})",
            style("!").yellow().bold(),
            skipped.line,
            style(&skipped.text).dim(),
            skipped.reason
        );
    }
}
