//! The closed catalog of unitary gate kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unitary gate kinds understood by the graph, the codec and the simulator.
///
/// The catalog only carries what the core needs: a textual name, how many
/// qubit roles a gate fills and how many real parameters it takes. Display
/// symbols and menu grouping belong to front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit fixed gates
    /// Identity gate.
    I,
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z) phase).
    S,
    /// T gate (fourth root of Z).
    T,
    /// sqrt(X) gate.
    SX,
    /// sqrt(Y) gate.
    SY,
    /// sqrt(Z) gate.
    SZ,

    // Single-qubit parameterized gates
    /// Rotation around X axis.
    RX,
    /// Rotation around Y axis.
    RY,
    /// Rotation around Z axis.
    RZ,
    /// Phase gate.
    P,
    /// Legacy single-parameter phase gate.
    U1,
    /// Two-parameter single-qubit gate U2(φ, λ).
    U2,
    /// Universal single-qubit gate U3(θ, φ, λ).
    U3,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around X.
    CRX,
    /// Controlled rotation around Y.
    CRY,
    /// Controlled rotation around Z.
    CRZ,
    /// Controlled phase gate.
    CU1,
}

impl StandardGate {
    /// Every gate of the catalog, single-qubit kinds first.
    pub const ALL: [StandardGate; 26] = [
        StandardGate::I,
        StandardGate::H,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::S,
        StandardGate::T,
        StandardGate::SX,
        StandardGate::SY,
        StandardGate::SZ,
        StandardGate::RX,
        StandardGate::RY,
        StandardGate::RZ,
        StandardGate::P,
        StandardGate::U1,
        StandardGate::U2,
        StandardGate::U3,
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
        StandardGate::CRX,
        StandardGate::CRY,
        StandardGate::CRZ,
        StandardGate::CU1,
    ];

    /// Get the textual name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::T => "t",
            StandardGate::SX => "sx",
            StandardGate::SY => "sy",
            StandardGate::SZ => "sz",
            StandardGate::RX => "rx",
            StandardGate::RY => "ry",
            StandardGate::RZ => "rz",
            StandardGate::P => "p",
            StandardGate::U1 => "u1",
            StandardGate::U2 => "u2",
            StandardGate::U3 => "u3",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRX => "crx",
            StandardGate::CRY => "cry",
            StandardGate::CRZ => "crz",
            StandardGate::CU1 => "cu1",
        }
    }

    /// Uppercase label used when deriving node ids.
    pub fn label(&self) -> String {
        self.name().to_ascii_uppercase()
    }

    /// Look up a gate by textual name, ignoring case.
    ///
    /// Accepts the common aliases `i`, `u`, `cp` and `cnot`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let gate = match lower.as_str() {
            "i" => StandardGate::I,
            "u" => StandardGate::U3,
            "cp" | "cphase" => StandardGate::CU1,
            "cnot" => StandardGate::CX,
            other => return Self::ALL.iter().copied().find(|g| g.name() == other),
        };
        Some(gate)
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRX
            | StandardGate::CRY
            | StandardGate::CRZ
            | StandardGate::CU1 => 2,
            _ => 1,
        }
    }

    /// Number of real parameters the gate requires.
    #[inline]
    pub fn num_params(&self) -> usize {
        match self {
            StandardGate::RX
            | StandardGate::RY
            | StandardGate::RZ
            | StandardGate::P
            | StandardGate::U1
            | StandardGate::CRX
            | StandardGate::CRY
            | StandardGate::CRZ
            | StandardGate::CU1 => 1,
            StandardGate::U2 => 2,
            StandardGate::U3 => 3,
            _ => 0,
        }
    }

    /// Whether the gate takes parameters.
    #[inline]
    pub fn is_parameterized(&self) -> bool {
        self.num_params() > 0
    }

    /// Whether the gate has a distinct adjoint spelled with a `dg` suffix.
    pub fn has_adjoint(&self) -> bool {
        matches!(
            self,
            StandardGate::S
                | StandardGate::T
                | StandardGate::SX
                | StandardGate::SY
                | StandardGate::SZ
        )
    }

    /// The single-qubit gate a controlled kind applies to its target.
    ///
    /// Returns `None` for single-qubit gates and for SWAP, which has no
    /// control role.
    pub fn base(&self) -> Option<StandardGate> {
        match self {
            StandardGate::CX => Some(StandardGate::X),
            StandardGate::CY => Some(StandardGate::Y),
            StandardGate::CZ => Some(StandardGate::Z),
            StandardGate::CH => Some(StandardGate::H),
            StandardGate::CRX => Some(StandardGate::RX),
            StandardGate::CRY => Some(StandardGate::RY),
            StandardGate::CRZ => Some(StandardGate::RZ),
            StandardGate::CU1 => Some(StandardGate::U1),
            _ => None,
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
