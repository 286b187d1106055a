//! Inspect command implementation.

use anyhow::{Context, Result};
use console::style;

use super::common::{load_graph, report_skipped};

/// Execute the inspect command.
pub fn execute(input: &str, json: bool) -> Result<()> {
    let decoded = load_graph(input)?;
    let graph = &decoded.graph;

    if json {
        let nodes = graph.nodes();
        let text =
            serde_json::to_string_pretty(&nodes).context("Failed to serialize node list")?;
        println!("{text}");
        return Ok(());
    }

    println!("{} {}", style("Circuit").cyan().bold(), style(input).green());
    println!("  Qubits:         {}", graph.qubit_count());
    println!("  Classical bits: {}", graph.clbit_count());
    println!("  Nodes:          {}", graph.len());
    println!(
        "  Steps:          {}",
        graph.max_step().map_or(0, |s| s.saturating_add(1))
    );

    if !decoded.skipped.is_empty() {
        println!("  Skipped lines:  {}", style(decoded.skipped.len()).yellow());
        report_skipped(&decoded);
    }

    if graph.is_empty() {
        return Ok(());
    }

    println!();
    let ordered = graph.nodes_by_step();
    for layer in ordered.chunk_by(|a, b| a.step == b.step) {
        let ids: Vec<String> = layer.iter().map(|n| n.id.to_string()).collect();
        println!(
            "  {} {}",
            style(format!("step {:>3}", layer[0].step)).yellow(),
            ids.join("  ")
        );
    }

    Ok(())
}
