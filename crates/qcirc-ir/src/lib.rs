//! qcirc Circuit Graph
//!
//! This crate holds the authoritative model of a circuit being edited: a
//! dependency graph of gate operations with a per-qubit frontier, derived
//! register sizes and the step (parallel layer) of every operation.
//!
//! # Core Components
//!
//! - **Indices**: [`QubitId`], [`ClbitId`] for the flat qubit and classical-bit spaces
//! - **Gates**: [`StandardGate`], the closed catalog of unitary kinds and their arities
//! - **Operations**: [`Operation`], one tagged variant per kind of node
//! - **Graph**: [`CircuitGraph`] arena of [`GateNode`]s keyed by [`NodeId`]
//! - **Scheduling**: [`StepScheduler`] for assigning steps to sequential input
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qcirc_ir::{CircuitGraph, QubitId, StandardGate};
//!
//! let mut graph = CircuitGraph::new();
//! let h = graph.add_gate(StandardGate::H, QubitId(0), 0);
//! let cx = graph.add_controlled(StandardGate::CX, QubitId(0), QubitId(1), None, 1);
//!
//! assert_eq!(graph.qubit_count(), 2);
//! assert_eq!(graph.get(&cx).unwrap().dependencies, vec![h]);
//! assert!(!graph.can_place_at(1, &[QubitId(0)]));
//! ```

pub mod error;
pub mod gate;
pub mod graph;
pub mod noise;
pub mod operation;
pub mod qubit;
pub mod schedule;

pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use graph::{CircuitGraph, GateNode, NodeId};
pub use noise::NoiseChannel;
pub use operation::Operation;
pub use qubit::{ClbitId, QubitId};
pub use schedule::StepScheduler;
