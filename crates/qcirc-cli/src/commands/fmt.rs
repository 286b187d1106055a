//! Fmt command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use qcirc_qasm::encode;

use super::common::{load_graph, report_skipped};

/// Execute the fmt command.
pub fn execute(input: &str, output: Option<&str>, strict: bool) -> Result<()> {
    let decoded = load_graph(input)?;

    if !decoded.skipped.is_empty() {
        report_skipped(&decoded);
        if strict {
            anyhow::bail!(
                "{} line(s) of {input} could not be decoded",
                decoded.skipped.len()
            );
        }
    }

    let text = encode(&decoded.graph);

    match output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("Failed to write file: {path}"))?;
            println!(
                "{} Formatted {} → {}",
                style("✓").green().bold(),
                style(input).green(),
                style(path).green()
            );
            if !decoded.skipped.is_empty() {
                println!(
                    "  Dropped {} line(s)",
                    style(decoded.skipped.len()).yellow()
                );
            }
        }
        None => print!("{text}"),
    }

    Ok(())
}
