//! Syntax tree of one source line.

use serde::{Deserialize, Serialize};

/// Reference to a register element: `q[3]`, `c1`, `c0[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegRef {
    /// Register name.
    pub register: String,
    /// Element index, when bracketed.
    pub index: Option<u32>,
}

impl RegRef {
    /// Reference `register[index]`.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }
}

/// Gate application: `name(params) operand, operand, ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Gate name as written.
    pub name: String,
    /// Parameter values; `None` when no parentheses were written.
    pub params: Option<Vec<f64>>,
    /// Qubit operands in order.
    pub operands: Vec<RegRef>,
}

/// One statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `OPENQASM <version>;`
    Version(String),

    /// `include "<file>";`
    Include(String),

    /// `qreg name[size];`
    QReg { name: String, size: u32 },

    /// `creg name[size];`
    CReg { name: String, size: u32 },

    /// `reset q[i];`
    Reset(RegRef),

    /// `barrier q[0], q[1];` The operand list may be empty.
    Barrier(Vec<RegRef>),

    /// `measure q[i] -> c[j];`
    Measure { qubit: RegRef, bit: RegRef },

    /// `if (c[j]==v) <application>;`
    Conditional {
        bit: RegRef,
        value: u64,
        apply: Application,
    },

    /// A gate application.
    Apply(Application),
}

/// A `// noise <channel> q[i] [param=<p>]` annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseAnnotation {
    /// Channel name as written.
    pub channel: String,
    /// The annotated qubit.
    pub qubit: RegRef,
    /// Channel probability, if given.
    pub param: Option<f64>,
}
