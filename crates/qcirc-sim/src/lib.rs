//! Statevector preview simulator for qcirc
//!
//! Computes the unitary preview of a [`CircuitGraph`]: every gate node is
//! applied to a dense amplitude array, while measurements, classically
//! controlled operations, barriers and noise annotations are skipped.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 25 | ~512 MB | Slow |
//!
//! # Example
//!
//! ```rust
//! use qcirc_ir::{CircuitGraph, QubitId, StandardGate};
//! use qcirc_sim::{Simulator, probabilities};
//!
//! let mut graph = CircuitGraph::new();
//! graph.add_gate(StandardGate::H, QubitId(0), 0);
//! graph.add_controlled(StandardGate::CX, QubitId(0), QubitId(1), None, 1);
//!
//! let state = Simulator::new().run(&graph).unwrap();
//! for p in probabilities(state.amplitudes()) {
//!     assert!((p.p0 - 0.5).abs() < 1e-10);
//! }
//! ```

mod error;
mod simulator;
mod statevector;

use num_complex::Complex64;
use qcirc_ir::CircuitGraph;

pub use error::{SimError, SimResult};
pub use simulator::{DEFAULT_MAX_QUBITS, Simulator};
pub use statevector::{BasisState, Matrix2, QubitProbability, Statevector, matrix};

/// Simulate `graph` up to `up_to_step` (all steps when `None`) with the
/// default qubit ceiling and return the amplitudes.
pub fn simulate(graph: &CircuitGraph, up_to_step: Option<u32>) -> SimResult<Vec<Complex64>> {
    let sim = Simulator::new();
    let state = match up_to_step {
        Some(step) => sim.run_up_to(graph, step)?,
        None => sim.run(graph)?,
    };
    Ok(state.into_amplitudes())
}

/// Per-qubit P(0)/P(1) of an amplitude array.
///
/// The qubit count is `log2` of the array length, rounded down.
pub fn probabilities(amplitudes: &[Complex64]) -> Vec<QubitProbability> {
    let num_qubits = amplitudes.len().checked_ilog2().unwrap_or(0) as usize;
    statevector::marginals(amplitudes, num_qubits)
}
