//! Error types for the simulator

use std::fmt;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that can occur during simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorError {
    /// Invalid configuration
    InvalidConfig(String),

    /// Circuit is invalid or malformed
    InvalidCircuit(String),

    /// Too many qubits for the configured limit
    TooManyQubits {
        num_qubits: usize,
        max_qubits: usize,
    },

    /// Gate has no matrix and cannot be simulated
    UnsupportedOperation {
        instruction_index: usize,
        name: String,
    },

    /// Circuit measures before its final layer but the sampler needs
    /// terminal measurements
    MidCircuitMeasurement {
        sampler: String,
    },

    /// State error from state operations
    StateError {
        message: String,
    },

    /// Other error
    Other(String),
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::InvalidConfig(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            SimulatorError::InvalidCircuit(msg) => {
                write!(f, "Invalid circuit: {}", msg)
            }
            SimulatorError::TooManyQubits {
                num_qubits,
                max_qubits,
            } => {
                write!(
                    f,
                    "Too many qubits: circuit has {}, max supported is {}",
                    num_qubits, max_qubits
                )
            }
            SimulatorError::UnsupportedOperation {
                instruction_index,
                name,
            } => {
                write!(
                    f,
                    "Instruction {} ('{}') has no matrix representation and cannot be simulated",
                    instruction_index, name
                )
            }
            SimulatorError::MidCircuitMeasurement { sampler } => {
                write!(
                    f,
                    "{} only supports measurements at the end of a circuit",
                    sampler
                )
            }
            SimulatorError::StateError { message } => {
                write!(f, "State error: {}", message)
            }
            SimulatorError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SimulatorError {}

impl From<qknit_core::QuantumError> for SimulatorError {
    fn from(err: qknit_core::QuantumError) -> Self {
        SimulatorError::InvalidCircuit(err.to_string())
    }
}

impl From<qknit_state::StateError> for SimulatorError {
    fn from(err: qknit_state::StateError) -> Self {
        SimulatorError::StateError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SimulatorError::TooManyQubits {
            num_qubits: 30,
            max_qubits: 24,
        };
        assert_eq!(err.to_string(), "Too many qubits: circuit has 30, max supported is 24");
    }

    #[test]
    fn test_from_state_error() {
        let err: SimulatorError = qknit_state::StateError::InvalidPauli('q').into();
        assert!(matches!(err, SimulatorError::StateError { .. }));
        assert!(err.to_string().contains("'q'"));
    }
}
