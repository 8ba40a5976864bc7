//! Error types for qknit circuits

use crate::QubitId;
use thiserror::Error;

/// Errors that can occur in quantum circuit operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// Invalid qubit index used
    #[error("Invalid qubit index {0}: circuit has only {1} qubits")]
    InvalidQubit(usize, usize),

    /// Invalid classical bit index used
    #[error("Invalid clbit index {0}: circuit has only {1} classical bits")]
    InvalidClbit(usize, usize),

    /// Gate applied to wrong number of qubits
    #[error("Gate '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Operation given the wrong number of classical bits
    #[error("Operation '{operation}' requires {expected} classical bits, but {actual} were provided")]
    InvalidClbitCount {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// Circuit has no qubits
    #[error("Circuit must have at least one qubit")]
    EmptyCircuit,

    /// Duplicate qubit in gate operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// A register with this name already exists
    #[error("Classical register '{0}' already exists")]
    DuplicateRegister(String),

    /// Instruction index out of range
    #[error("Instruction index {0} out of range for circuit with {1} instructions")]
    InvalidInstruction(usize, usize),

    /// Generic circuit validation error
    #[error("Circuit validation failed: {0}")]
    ValidationError(String),
}

impl QuantumError {
    /// Create an invalid qubit error
    pub fn invalid_qubit(qubit: usize, num_qubits: usize) -> Self {
        Self::InvalidQubit(qubit, num_qubits)
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }
}
