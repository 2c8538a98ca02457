//! Error types for circuit construction, execution and I/O

use qtraj_state::StateError;
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors that can occur while building, replaying or (de)serializing a
/// circuit
#[derive(Debug, Error)]
pub enum CircuitError {
    /// Qubit index outside the circuit's register
    #[error("Invalid qubit index {index}: circuit has only {num_qubits} qubits")]
    InvalidQubit { index: usize, num_qubits: usize },

    /// Gate applied to wrong number of qubits
    #[error("Gate '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Duplicate qubit in one operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(usize),

    /// Parametrized gate given without a parameter
    #[error("Gate '{gate}' requires a parameter")]
    MissingParameter { gate: &'static str },

    /// Fixed gate given a parameter
    #[error("Gate '{gate}' takes no parameter")]
    UnexpectedParameter { gate: &'static str },

    /// Angle or probability is NaN or infinite
    #[error("Gate '{gate}' parameter must be finite")]
    NonFiniteParameter { gate: &'static str },

    /// Circuit has no qubits
    #[error("Circuit must have at least one qubit")]
    EmptyCircuit,

    /// State and circuit disagree on the register size
    #[error("Circuit has {circuit} qubits but the state has {state}")]
    RegisterMismatch { circuit: usize, state: usize },

    /// Malformed text-format input
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The operation log could not grow
    #[error("Failed to grow the operation log: {0}")]
    Allocation(#[from] TryReserveError),

    /// Error raised by the state-vector engine
    #[error(transparent)]
    State(#[from] StateError),

    /// Serialized circuit written by a newer format
    #[error("Unsupported circuit format version {actual}, expected at most {expected}")]
    VersionMismatch { expected: u32, actual: u32 },

    /// JSON encoding or decoding failed
    #[cfg(feature = "serialization")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CircuitError {
    pub(crate) fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Result type for circuit operations
pub type Result<T> = std::result::Result<T, CircuitError>;
