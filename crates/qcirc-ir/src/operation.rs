//! Operations carried by graph nodes.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::noise::NoiseChannel;
use crate::qubit::{ClbitId, QubitId};

/// One operation of a circuit, tagged by kind.
///
/// Every variant carries exactly the roles its kind needs, so a measurement
/// can never hold a control list and a barrier never names a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// A fixed single-qubit gate, optionally adjointed.
    Gate {
        /// The gate kind.
        gate: StandardGate,
        /// The qubit acted on.
        target: QubitId,
        /// Apply the conjugate transpose.
        adjoint: bool,
    },
    /// A single-qubit gate taking one to three real parameters.
    ///
    /// A short `params` list is tolerated; missing values read as zero.
    Rotation {
        /// The gate kind.
        gate: StandardGate,
        /// The qubit acted on.
        target: QubitId,
        /// Parameter values in declaration order.
        params: Vec<f64>,
    },
    /// A two-qubit gate with a control role and an optional parameter.
    ///
    /// For SWAP the `control` slot holds the first swapped qubit.
    Controlled {
        /// The gate kind.
        gate: StandardGate,
        /// The control qubit.
        control: QubitId,
        /// The target qubit.
        target: QubitId,
        /// Parameter of the controlled rotation, if any.
        param: Option<f64>,
    },
    /// A single-qubit gate applied when every control is `|1⟩`.
    ///
    /// Toffoli is `MultiControlled { gate: X, controls: [c0, c1], .. }`.
    MultiControlled {
        /// The single-qubit gate applied to the target.
        gate: StandardGate,
        /// The control qubits, in order.
        controls: Vec<QubitId>,
        /// The target qubit.
        target: QubitId,
    },
    /// Measurement of a qubit into the classical bit of the same index.
    Measure {
        /// The measured qubit.
        qubit: QubitId,
    },
    /// Measure `source`, then flip `target` when the outcome is 1.
    MeasureControlledX {
        /// The measured qubit.
        source: QubitId,
        /// The qubit flipped on outcome 1.
        target: QubitId,
    },
    /// Reset a qubit to `|0⟩`.
    Reset {
        /// The qubit reset.
        qubit: QubitId,
    },
    /// Synchronization marker spanning every qubit.
    Barrier,
    /// A unitary applied when a classical bit reads 1.
    Conditional {
        /// The classical bit tested.
        bit: ClbitId,
        /// The unitary operation applied.
        op: Box<Operation>,
    },
    /// A noise annotation on one qubit.
    Noise {
        /// The channel kind.
        channel: NoiseChannel,
        /// The qubit the channel acts on.
        target: QubitId,
        /// Channel probability, if given.
        probability: Option<f64>,
    },
}

impl Operation {
    /// A fixed single-qubit gate.
    pub fn gate(gate: StandardGate, target: QubitId) -> Self {
        Operation::Gate {
            gate,
            target,
            adjoint: false,
        }
    }

    /// The adjoint of a fixed single-qubit gate.
    pub fn adjoint(gate: StandardGate, target: QubitId) -> Self {
        Operation::Gate {
            gate,
            target,
            adjoint: gate.has_adjoint(),
        }
    }

    /// A parameterized single-qubit gate.
    pub fn rotation(gate: StandardGate, target: QubitId, params: Vec<f64>) -> Self {
        Operation::Rotation {
            gate,
            target,
            params,
        }
    }

    /// A two-qubit gate.
    pub fn controlled(gate: StandardGate, control: QubitId, target: QubitId) -> Self {
        Operation::Controlled {
            gate,
            control,
            target,
            param: gate.is_parameterized().then_some(0.0),
        }
    }

    /// A parameterized two-qubit gate.
    pub fn controlled_param(
        gate: StandardGate,
        control: QubitId,
        target: QubitId,
        param: f64,
    ) -> Self {
        Operation::Controlled {
            gate,
            control,
            target,
            param: Some(param),
        }
    }

    /// The Toffoli gate.
    pub fn toffoli(c0: QubitId, c1: QubitId, target: QubitId) -> Self {
        Operation::MultiControlled {
            gate: StandardGate::X,
            controls: vec![c0, c1],
            target,
        }
    }

    /// Wrap a unitary operation in a classical condition.
    pub fn conditional(bit: ClbitId, op: Operation) -> IrResult<Self> {
        if !op.is_unitary() {
            return Err(IrError::NotUnitary(op.name()));
        }
        Ok(Operation::Conditional {
            bit,
            op: Box::new(op),
        })
    }

    /// The operation an editor places for `gate` on `target` when no
    /// parameter values were entered: parameters default to zero, the
    /// control of a two-qubit gate defaults to `target + 1`.
    pub fn with_default_params(gate: StandardGate, target: QubitId) -> Self {
        match (gate.num_qubits(), gate.num_params()) {
            (1, 0) => Operation::gate(gate, target),
            (1, n) => Operation::rotation(gate, target, vec![0.0; n]),
            _ => Operation::controlled(gate, target, QubitId(target.0 + 1)),
        }
    }

    /// Whether the operation is a unitary gate application.
    pub fn is_unitary(&self) -> bool {
        matches!(
            self,
            Operation::Gate { .. }
                | Operation::Rotation { .. }
                | Operation::Controlled { .. }
                | Operation::MultiControlled { .. }
        )
    }

    /// The target role, if the kind has one.
    pub fn target(&self) -> Option<QubitId> {
        match self {
            Operation::Gate { target, .. }
            | Operation::Rotation { target, .. }
            | Operation::Controlled { target, .. }
            | Operation::MultiControlled { target, .. }
            | Operation::MeasureControlledX { target, .. }
            | Operation::Noise { target, .. } => Some(*target),
            Operation::Measure { qubit } | Operation::Reset { qubit } => Some(*qubit),
            Operation::Conditional { op, .. } => op.target(),
            Operation::Barrier => None,
        }
    }

    /// The control roles, in order.
    pub fn controls(&self) -> Vec<QubitId> {
        match self {
            Operation::Controlled { control, .. } => vec![*control],
            Operation::MultiControlled { controls, .. } => controls.clone(),
            Operation::Conditional { op, .. } => op.controls(),
            _ => Vec::new(),
        }
    }

    /// The measured qubit of a measurement-controlled operation.
    pub fn measure_source(&self) -> Option<QubitId> {
        match self {
            Operation::MeasureControlledX { source, .. } => Some(*source),
            _ => None,
        }
    }

    /// The classical bit written or read by the operation.
    pub fn classical_bit(&self) -> Option<ClbitId> {
        match self {
            Operation::Measure { qubit } => Some(ClbitId(qubit.0)),
            Operation::MeasureControlledX { source, .. } => Some(ClbitId(source.0)),
            Operation::Conditional { bit, .. } => Some(*bit),
            _ => None,
        }
    }

    /// Parameter values. Noise annotations report their probability.
    pub fn params(&self) -> &[f64] {
        match self {
            Operation::Rotation { params, .. } => params,
            Operation::Controlled { param, .. } => param.as_slice(),
            Operation::Noise { probability, .. } => probability.as_slice(),
            Operation::Conditional { op, .. } => op.params(),
            _ => &[],
        }
    }

    /// Parameter `index`, reading missing values as zero.
    pub fn param(&self, index: usize) -> f64 {
        self.params().get(index).copied().unwrap_or(0.0)
    }

    /// Whether the operation applies a gate's adjoint.
    pub fn is_adjoint(&self) -> bool {
        match self {
            Operation::Gate { adjoint, .. } => *adjoint,
            Operation::Conditional { op, .. } => op.is_adjoint(),
            _ => false,
        }
    }

    /// Every qubit role of the operation: controls, measured source, target.
    ///
    /// A barrier has no roles; the graph expands it to the whole register.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits = self.controls();
        qubits.extend(self.measure_source());
        qubits.extend(self.target());
        qubits
    }

    /// Whether the operation fills two or more qubit roles.
    pub fn is_multi_qubit(&self) -> bool {
        self.qubits().len() >= 2
    }

    /// The first qubit named twice, if any.
    pub fn duplicate_qubit(&self) -> Option<QubitId> {
        let qubits = self.qubits();
        qubits
            .iter()
            .enumerate()
            .find(|(i, q)| qubits[..*i].contains(q))
            .map(|(_, q)| *q)
    }

    /// Uppercase kind label used in node ids.
    pub fn label(&self) -> String {
        match self {
            Operation::Gate { gate, .. }
            | Operation::Rotation { gate, .. }
            | Operation::Controlled { gate, .. } => gate.label(),
            Operation::MultiControlled { .. } => self.name().to_ascii_uppercase(),
            Operation::Measure { .. } => "MEASURE".into(),
            Operation::MeasureControlledX { .. } => "MCX".into(),
            Operation::Reset { .. } => "RESET".into(),
            Operation::Barrier => "BARRIER".into(),
            Operation::Conditional { op, .. } => op.label(),
            Operation::Noise { .. } => "NOISE".into(),
        }
    }

    /// Lowercase textual name, including the `dg` suffix of adjoints and
    /// the `c` prefixes of multi-controlled gates.
    pub fn name(&self) -> String {
        match self {
            Operation::Gate { gate, adjoint, .. } => {
                if *adjoint && gate.has_adjoint() {
                    format!("{}dg", gate.name())
                } else {
                    gate.name().to_string()
                }
            }
            Operation::Rotation { gate, .. } | Operation::Controlled { gate, .. } => {
                gate.name().to_string()
            }
            Operation::MultiControlled { gate, controls, .. } => {
                format!("{}{}", "c".repeat(controls.len()), gate.name())
            }
            Operation::Measure { .. } => "measure".into(),
            Operation::MeasureControlledX { .. } => "mcx".into(),
            Operation::Reset { .. } => "reset".into(),
            Operation::Barrier => "barrier".into(),
            Operation::Conditional { op, .. } => op.name(),
            Operation::Noise { channel, .. } => channel.name().to_string(),
        }
    }
}
