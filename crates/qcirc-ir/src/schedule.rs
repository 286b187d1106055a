//! Step assignment for circuits read from a sequential description.

use rustc_hash::FxHashSet;

use crate::operation::Operation;
use crate::qubit::QubitId;

/// Assigns steps to operations arriving one at a time.
///
/// Consecutive operations on disjoint qubits share a step. A conflict on
/// any qubit starts the next step and clears the occupied set. Barriers and
/// operations with several qubit roles (or a measured source) never join a
/// step that already holds something; barriers and noise annotations also
/// close their step behind them.
#[derive(Debug, Clone, Default)]
pub struct StepScheduler {
    step: u32,
    occupied: FxHashSet<QubitId>,
}

impl StepScheduler {
    /// Start at step 0 with nothing occupied.
    pub fn new() -> Self {
        Self::default()
    }

    /// The step the next non-conflicting operation would receive.
    pub fn current_step(&self) -> u32 {
        self.step
    }

    /// Assign a step to `op` and record its qubits as occupied.
    pub fn schedule(&mut self, op: &Operation) -> u32 {
        let qubits = op.qubits();

        match op {
            Operation::Barrier => {
                self.open_fresh();
                let step = self.step;
                self.advance();
                step
            }
            Operation::Noise { .. } => {
                if self.conflicts(&qubits) {
                    self.advance();
                }
                let step = self.step;
                self.advance();
                step
            }
            _ => {
                if op.is_multi_qubit() || op.measure_source().is_some() {
                    self.open_fresh();
                } else if self.conflicts(&qubits) {
                    self.advance();
                }
                self.occupied.extend(qubits);
                self.step
            }
        }
    }

    fn conflicts(&self, qubits: &[QubitId]) -> bool {
        qubits.iter().any(|q| self.occupied.contains(q))
    }

    fn open_fresh(&mut self) {
        if !self.occupied.is_empty() {
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.step += 1;
        self.occupied.clear();
    }
}
