//! Error types for the codec and the parameter evaluator.

use thiserror::Error;

/// Reasons a parameter expression is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParamError {
    /// No tokens where a value was expected.
    #[error("Empty parameter expression")]
    Empty,

    /// Text the lexer does not recognize.
    #[error("Invalid token in parameter: '{0}'")]
    InvalidToken(String),

    /// Tokens that form neither a decimal nor a π-expression.
    #[error("Malformed parameter expression: {0}")]
    Malformed(String),

    /// A π-expression divided by zero.
    #[error("Division by zero in parameter expression")]
    ZeroDenominator,
}

/// Reasons a line cannot be decoded.
///
/// The decoder never surfaces these as failures; they label the skipped
/// lines of a [`Decoded`](crate::Decoded) report.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at column {position}: {message}")]
    LexerError { position: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of line.
    #[error("Unexpected end of line {line}: {expected}")]
    UnexpectedEol { line: usize, expected: String },

    /// Gate name outside the catalog.
    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    /// Wrong number of operands.
    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// An operation names the same qubit twice.
    #[error("Qubit {0} used twice in one operation")]
    DuplicateQubit(u32),

    /// Qubit operand written without an index.
    #[error("Qubit operand '{0}' has no index")]
    MissingIndex(String),

    /// Index too large for the flat index space.
    #[error("Index {0} out of range")]
    IndexOutOfRange(u64),

    /// Rejected parameter list.
    #[error("Invalid parameter: {0}")]
    Param(#[from] ParamError),

    /// Comment line that is not a noise annotation.
    #[error("Not a noise annotation")]
    NotNoise,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
