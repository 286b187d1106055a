//! Graph simulation driver.

use std::time::Instant;

use qcirc_ir::{CircuitGraph, Operation};
use tracing::{debug, instrument};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Default ceiling on simulated qubits.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Statevector preview simulator.
///
/// Nodes are applied in ascending step order, ties in insertion order. This
/// is not a topological sort: nodes sharing a step are assumed independent.
/// Each run starts from a fresh |0...0⟩ state; nothing is cached between
/// runs.
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    /// Maximum number of qubits supported.
    max_qubits: u32,
}

impl Simulator {
    /// Create a simulator with the default qubit ceiling.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Create a simulator with a custom qubit ceiling.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self { max_qubits }
    }

    /// The qubit ceiling.
    pub fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    /// Simulate every node of the graph.
    pub fn run(&self, graph: &CircuitGraph) -> SimResult<Statevector> {
        self.simulate(graph, None)
    }

    /// Simulate only the nodes with `step <= up_to_step`.
    pub fn run_up_to(&self, graph: &CircuitGraph, up_to_step: u32) -> SimResult<Statevector> {
        self.simulate(graph, Some(up_to_step))
    }

    /// The operations a run applies, in application order.
    pub fn ordered_operations<'a>(
        &self,
        graph: &'a CircuitGraph,
        up_to_step: Option<u32>,
    ) -> Vec<&'a Operation> {
        graph
            .nodes_by_step()
            .into_iter()
            .filter(|node| up_to_step.is_none_or(|limit| node.step <= limit))
            .map(|node| &node.op)
            .collect()
    }

    #[instrument(skip(self, graph), fields(nodes = graph.len()))]
    fn simulate(&self, graph: &CircuitGraph, up_to_step: Option<u32>) -> SimResult<Statevector> {
        let start = Instant::now();

        // An empty register still has a well-defined one-qubit preview.
        let num_qubits = graph.qubit_count().max(1);
        if num_qubits > self.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: self.max_qubits,
            });
        }

        let ops = self.ordered_operations(graph, up_to_step);
        debug!(num_qubits, ops = ops.len(), "starting simulation");

        let mut sv = Statevector::new(num_qubits as usize);
        for op in ops {
            sv.apply(op);
        }

        debug!(elapsed = ?start.elapsed(), "simulation completed");
        Ok(sv)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
