//! Error types for the simulator.

use thiserror::Error;

/// Errors that can occur when simulating a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The graph needs more qubits than the configured ceiling.
    #[error("Circuit has {requested} qubits but the simulator supports at most {max}")]
    TooManyQubits { requested: u32, max: u32 },

    /// Amplitude array length is not a power of two.
    #[error("Amplitude count {0} is not a power of two")]
    InvalidLength(usize),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
