//! Error types for circuit cutting

use qknit_core::QuantumError;
use qknit_sim::SimulatorError;
use qknit_state::StateError;
use thiserror::Error;

/// Errors raised while partitioning, executing or reconstructing a cut
/// circuit
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CuttingError {
    #[error("The number of requested samples must be positive.")]
    InvalidSampleCount,

    #[error(
        "If a partition mapping (dict[label, subcircuit]) is passed as the circuits argument, a \
         partition mapping (dict[label, subobservables]) is expected as the subobservables argument."
    )]
    PartitionMappingExpected,

    #[error(
        "If a QuantumCircuit is passed as the circuits argument, a PauliList is expected as the \
         subobservables argument."
    )]
    PauliListExpected,

    #[error("The keys for the circuits and observables dicts should be equivalent.")]
    ObservableKeysMismatch,

    #[error("The keys for the circuits and samplers dicts should be equivalent.")]
    SamplerKeysMismatch,

    #[error("A partition mapping of samplers can only be used with a partition mapping of circuits.")]
    SamplerMappingForSingleCircuit,

    #[error(
        "Currently, if a samplers dict is passed to execute_experiments(), then each sampler must be \
         unique; however, subsystems {first} and {second} were passed the same sampler."
    )]
    DuplicateSampler { first: String, second: String },

    #[error("{sampler} does not support mid-circuit measurements. Use an exact sampler to generate exact distributions for each subexperiment.")]
    MidCircuitMeasurementUnsupported { sampler: String },

    #[error("SingleQubitQPDGates are not supported in unseparable circuits.")]
    SingleQubitGateInUnseparableCircuit,

    #[error(
        "TwoQubitQPDGates must be split into SingleQubitQPDGates before a partition mapping is executed; \
         found one in subsystem {label}."
    )]
    UnsplitTwoQubitGate { label: String },

    #[error("Circuits input to execute_experiments should contain no classical registers or bits.")]
    ClassicalBitsInInput,

    #[error(
        "SingleQubitQPDGate labels should be suffixed with \"_<id>\", where <id> is the index of the cut \
         relative to the other cuts in the circuit; found {label:?}."
    )]
    BadQpdGateLabel { label: Option<String> },

    #[error("qubit_locations has {locations} element(s) but the observable(s) have {observable} qubit(s).")]
    QubitLocationsMismatch { locations: usize, observable: usize },

    #[error(
        "Quantum circuit qubit count ({circuit}) does not match qubit count of observable(s) ({observable}).  \
         Try providing `qubit_locations` explicitly."
    )]
    QubitCountMismatch { circuit: usize, observable: usize },

    #[error(
        "Length of partition_labels ({labels}) does not equal the number of qubits in the input circuit ({qubits})."
    )]
    PartitionLabelsMismatch { labels: usize, qubits: usize },

    #[error("Decomposition is only supported for two-qubit gates. Cannot decompose ({name}).")]
    MultiQubitCut { name: String },

    #[error("Operation {name} at index {index} spans more than one partition and cannot be separated.")]
    NonSeparable { index: usize, name: String },

    #[error("An input observable acts on a different number of qubits than the input circuit.")]
    ObservableSizeMismatch,

    #[error("An input observable has a phase not equal to 1.")]
    ObservablePhase,

    #[error("No quasiprobability decomposition is available for gate {name}.")]
    UnsupportedGate { name: String },

    #[error("Invalid QPD basis: {0}")]
    InvalidBasis(String),

    #[error("Invalid observable group: {0}")]
    InvalidObservableGroup(String),

    #[error(
        "The number of map IDs ({map_ids}) must equal the number of decompositions in the circuit ({decompositions})."
    )]
    MapIdCountMismatch { map_ids: usize, decompositions: usize },

    #[error("A circuit data index ({index}) corresponds to a non-QPDGate ({name}).")]
    NotQpdGate { index: usize, name: String },

    #[error("Gates within the same decomposition must share an equivalent QPDBasis.")]
    BasisMismatch,

    #[error("Map id {map_id} is out of range for a basis with {num_maps} maps.")]
    MapIdOutOfRange { map_id: usize, num_maps: usize },

    #[error("Circuit data index {index} is assigned conflicting map ids ({first} and {second}).")]
    ConflictingMapIds { index: usize, first: usize, second: usize },

    #[error("Results hold {actual} subsystem(s) but the observables describe {expected}.")]
    ResultShapeMismatch { expected: usize, actual: usize },

    #[error("Results hold {quasi_dists} sample(s) of distributions but {coefficients} coefficient(s).")]
    SampleCountMismatch { quasi_dists: usize, coefficients: usize },

    #[error("Subsystem {subsystem} has {actual} result group(s) but its observables form {expected}.")]
    GroupCountMismatch {
        subsystem: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Every subsystem must hold the same number of subobservables; found {actual} where {expected} were expected.")]
    SubobservableCountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Circuit(#[from] QuantumError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

/// Result type for cutting operations
pub type Result<T> = std::result::Result<T, CuttingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(
            CuttingError::DuplicateSampler {
                first: "A".into(),
                second: "B".into()
            }
            .to_string(),
            "Currently, if a samplers dict is passed to execute_experiments(), then each sampler must be \
             unique; however, subsystems A and B were passed the same sampler."
        );
        assert_eq!(
            CuttingError::QubitCountMismatch {
                circuit: 2,
                observable: 1
            }
            .to_string(),
            "Quantum circuit qubit count (2) does not match qubit count of observable(s) (1).  Try providing \
             `qubit_locations` explicitly."
        );
        assert_eq!(
            CuttingError::PartitionMappingExpected.to_string(),
            "If a partition mapping (dict[label, subcircuit]) is passed as the circuits argument, a partition \
             mapping (dict[label, subobservables]) is expected as the subobservables argument."
        );
    }

    #[test]
    fn test_lower_layer_errors_convert() {
        let err: CuttingError = QuantumError::EmptyCircuit.into();
        assert_eq!(err.to_string(), "Circuit must have at least one qubit");
    }
}
