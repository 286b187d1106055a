//! Simulate command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use qcirc_sim::{BasisState, QubitProbability, Simulator};

use super::common::{load_graph, report_skipped};
use crate::config::Config;

/// Options for one simulate invocation, after flags and config are merged.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub up_to_step: Option<u32>,
    pub shots: usize,
    pub seed: Option<u64>,
    pub json: bool,
}

#[derive(Serialize)]
struct Report {
    num_qubits: usize,
    up_to_step: Option<u32>,
    states: Vec<BasisState>,
    qubits: Vec<QubitProbability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<BTreeMap<String, usize>>,
}

/// Execute the simulate command.
pub fn execute(input: &str, options: &Options, config: &Config) -> Result<()> {
    let decoded = load_graph(input)?;
    if !decoded.skipped.is_empty() && !options.json {
        report_skipped(&decoded);
    }

    let simulator = Simulator::with_max_qubits(config.simulator.max_qubits);
    let state = match options.up_to_step {
        Some(step) => simulator.run_up_to(&decoded.graph, step),
        None => simulator.run(&decoded.graph),
    }
    .with_context(|| format!("Failed to simulate {input}"))?;

    let counts = (options.shots > 0).then(|| {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        state.sample(options.shots, &mut rng)
    });

    let report = Report {
        num_qubits: state.num_qubits(),
        up_to_step: options.up_to_step,
        states: state.basis_states(config.output.amplitude_threshold),
        qubits: state.qubit_probabilities(),
        counts,
    };

    if options.json {
        let text =
            serde_json::to_string_pretty(&report).context("Failed to serialize result")?;
        println!("{text}");
        return Ok(());
    }

    print_report(input, &report, config.output.probability_precision);
    Ok(())
}

fn print_report(input: &str, report: &Report, precision: usize) {
    let scope = match report.up_to_step {
        Some(step) => format!("up to step {step}"),
        None => "all steps".to_string(),
    };
    println!(
        "{} Simulated {} ({} qubits, {})",
        style("✓").green().bold(),
        style(input).green(),
        report.num_qubits,
        scope
    );

    println!("\n  Basis states:");
    for basis in &report.states {
        println!(
            "  |{}⟩  {:+.p$}{:+.p$}i  p={:.p$}",
            style(&basis.bits).cyan(),
            basis.amplitude.re,
            basis.amplitude.im,
            basis.probability,
            p = precision
        );
    }

    println!("\n  Qubit marginals:");
    for (q, p) in report.qubits.iter().enumerate() {
        println!(
            "  q[{q}]  P(0)={:.p$}  P(1)={:.p$}",
            p.p0,
            p.p1,
            p = precision
        );
    }

    if let Some(counts) = &report.counts {
        let total: usize = counts.values().sum();
        let mut sorted: Vec<_> = counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        println!("\n  Samples ({total} shots):");
        for (bitstring, count) in sorted.iter().take(16) {
            let prob = **count as f64 / total as f64 * 100.0;
            let bar: String = "█".repeat((prob / 2.0).round() as usize);
            println!(
                "  {}: {:>6} ({:>5.2}%) {}",
                style(bitstring).cyan(),
                count,
                prob,
                style(bar).green()
            );
        }
        if sorted.len() > 16 {
            println!("  ... and {} more outcomes", sorted.len() - 16);
        }
    }
}
