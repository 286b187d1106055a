//! Check command implementation.

use anyhow::Result;
use console::style;

use super::common::{load_graph, report_skipped};

/// Execute the check command.
pub fn execute(input: &str) -> Result<()> {
    println!("{} Checking {}", style("→").cyan().bold(), style(input).green());

    let decoded = load_graph(input)?;
    let graph = &decoded.graph;
    println!(
        "  Decoded: {} nodes, {} qubits, {} classical bits",
        graph.len(),
        graph.qubit_count(),
        graph.clbit_count()
    );

    let mut problems = decoded.skipped.len();
    if !decoded.skipped.is_empty() {
        println!(
            "  {} line(s) could not be decoded:",
            style(decoded.skipped.len()).yellow()
        );
        report_skipped(&decoded);
    }

    if let Err(e) = graph.verify_integrity() {
        problems += 1;
        println!("  {} {}", style("✗").red().bold(), e);
    }

    if problems > 0 {
        anyhow::bail!("{problems} problem(s) found in {input}");
    }

    println!("{} No problems found", style("✓").green().bold());
    Ok(())
}
