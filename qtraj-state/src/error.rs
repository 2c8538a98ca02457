//! Error types for state vector operations

use thiserror::Error;

/// Errors that can occur during state vector operations
///
/// Every public operation validates its arguments before touching the
/// amplitudes, so an `Err` always leaves the state exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// The same qubit was used twice in one multi-qubit operation
    #[error("Qubit {index} used more than once in a multi-qubit operation")]
    DuplicateQubit { index: usize },

    /// Basis index outside 0..2^n
    #[error("Basis index {index} out of range for dimension {dimension}")]
    InvalidBasisIndex { index: usize, dimension: usize },

    /// Register too large to allocate
    #[error("Cannot simulate {num_qubits} qubits, maximum is {max}")]
    TooManyQubits { num_qubits: usize, max: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Classical bit value other than 0 or 1
    #[error("Invalid bit value {value}, expected 0 or 1")]
    InvalidBitValue { value: u8 },

    /// Probability or channel parameter outside [0, 1]
    #[error("Parameter {name} must be in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// Caller-supplied uniform variate outside [0, 1)
    #[error("Variate must be in [0, 1), got {value}")]
    InvalidVariate { value: f64 },

    /// Renormalization of a vector whose norm is zero
    #[error("Cannot renormalize a state with zero norm")]
    ZeroNorm,

    /// Trajectory ensemble requested with zero trajectories
    #[error("Trajectory count must be at least 1")]
    NoTrajectories,
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;
