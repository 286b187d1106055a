//! Error types for the IR crate.

use crate::graph::NodeId;
use crate::qubit::QubitId;
use thiserror::Error;

/// Errors reported by IR checks.
///
/// Graph mutation itself never fails; these surface from constructors that
/// validate their input and from [`CircuitGraph::verify_integrity`].
///
/// [`CircuitGraph::verify_integrity`]: crate::CircuitGraph::verify_integrity
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A node lists a dependency that is not in the graph.
    #[error("Node {node} depends on missing node {missing}")]
    DanglingDependency {
        /// The node holding the stale reference.
        node: NodeId,
        /// The id that no longer exists.
        missing: NodeId,
    },

    /// The dependency relation contains a cycle.
    #[error("Dependency cycle through node {0}")]
    Cycle(NodeId),

    /// An operation names the same qubit in two roles.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Two nodes of the same step share a qubit.
    #[error("Nodes {first} and {second} both use {qubit} at step {step}")]
    StepConflict {
        /// The shared step.
        step: u32,
        /// The shared qubit.
        qubit: QubitId,
        /// The earlier node.
        first: NodeId,
        /// The later node.
        second: NodeId,
    },

    /// A node is scheduled before one of its dependencies.
    #[error("Node {node} at step {step} precedes its dependency {dependency} at step {dependency_step}")]
    StepOrder {
        /// The dependent node.
        node: NodeId,
        /// Its step.
        step: u32,
        /// The dependency scheduled later.
        dependency: NodeId,
        /// The dependency's step.
        dependency_step: u32,
    },

    /// Only unitary operations can be classically controlled.
    #[error("Operation '{0}' cannot be classically controlled")]
    NotUnitary(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
