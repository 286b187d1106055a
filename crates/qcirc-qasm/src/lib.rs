//! `OpenQASM` 2.0 line codec and parameter evaluator for qcirc
//!
//! This crate reads and writes the line-oriented text form of a
//! [`CircuitGraph`](qcirc_ir::CircuitGraph) and evaluates the parameter
//! expressions that appear in it.
//!
//! # Supported Statements
//!
//! | Statement | Example |
//! |-----------|---------|
//! | Header | `OPENQASM 2.0;`, `include "qelib1.inc";` |
//! | Registers | `qreg q[3];`, `creg c0[1];` |
//! | Gates | `h q[0];`, `sdg q[1];`, `cx q[0], q[1];` |
//! | Parameterized gates | `rx(pi/2) q[0];`, `crz(-pi/4) q[0], q[1];` |
//! | Multi-controlled | `ccx q[0], q[1], q[2];`, `cccz q[0], q[1], q[2], q[3];` |
//! | Measurement | `measure q[0] -> c[0];` |
//! | Conditionals | `if (c[0]==1) x q[1];` |
//! | Reset, barrier | `reset q[0];`, `barrier q[0], q[1];` |
//! | Noise annotations | `// noise depolarizing q[0] param=0.01` |
//!
//! Decoding is lenient. Lines that cannot be used are skipped, and
//! [`decode_with_report`] lists them.
//!
//! # Example: Decoding
//!
//! ```rust
//! use qcirc_qasm::decode;
//!
//! let text = "
//!     OPENQASM 2.0;
//!     include \"qelib1.inc\";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//! ";
//!
//! let graph = decode(text);
//! assert_eq!(graph.qubit_count(), 2);
//! assert_eq!(graph.len(), 2);
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use qcirc_ir::{CircuitGraph, QubitId, StandardGate};
//! use qcirc_qasm::{decode, encode};
//!
//! let mut graph = CircuitGraph::new();
//! graph.add_rotation(StandardGate::RY, QubitId(0), vec![std::f64::consts::PI / 4.0], 0);
//!
//! let text = encode(&graph);
//! assert!(text.contains("ry(pi/4) q[0];"));
//!
//! let decoded = decode(&text);
//! assert_eq!(decoded.len(), 1);
//! ```
//!
//! # Example: Parameters
//!
//! ```rust
//! use qcirc_qasm::{format_param, parse_param};
//!
//! let theta = parse_param("3*pi/4").unwrap();
//! assert_eq!(format_param(theta), "3*pi/4");
//! assert!(parse_param("pi/0").is_err());
//! ```

mod ast;
mod decoder;
mod emitter;
mod error;
mod lexer;
mod param;
mod parser;

pub use decoder::{Decoded, SkippedLine, decode, decode_with_report};
pub use emitter::{Emitter, encode};
pub use error::{ParamError, ParseError, ParseResult};
pub use param::{format_param, format_params, parse_param, parse_param_list};
pub use parser::{parse_line, parse_noise_comment};

// Re-export syntax types for callers working line by line
pub mod syntax {
    pub use crate::ast::*;
    pub use crate::lexer::{SpannedToken, Token, tokenize};
}
