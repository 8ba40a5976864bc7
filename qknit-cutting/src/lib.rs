//! Gate cutting for qknit
//!
//! A circuit too wide for one device is split into independent
//! subcircuits by replacing the gates that span partitions with
//! quasiprobability decompositions (QPDs). Expectation values of the full
//! circuit are then recovered from many small subexperiments.
//!
//! The workflow has three steps:
//! - [`partition_problem`]: assign qubits to partitions and cut the gates
//!   between them
//! - [`execute_experiments`]: sample QPD map combinations and run each
//!   subcircuit with a [`Sampler`](qknit_sim::Sampler)
//! - [`reconstruct_expectation_values`]: recombine the distributions
//!
//! # Example
//! ```
//! use qknit_core::Circuit;
//! use qknit_cutting::{char_labels, execute_experiments, partition_problem, reconstruct_expectation_values, SamplerInput};
//! use qknit_gates::CircuitExt;
//! use qknit_sim::ExactSampler;
//! use qknit_state::PauliList;
//!
//! let mut circuit = Circuit::new(2);
//! circuit.h(0).unwrap().cx(0, 1).unwrap();
//! let observables = PauliList::from_labels(&["ZZ"]).unwrap();
//!
//! let problem = partition_problem(&circuit, &char_labels("AB"), Some(&observables)).unwrap();
//! let subobservables = problem.subobservables.unwrap();
//! let results = execute_experiments(
//!     problem.subcircuits,
//!     subobservables.clone(),
//!     1000,
//!     SamplerInput::single(ExactSampler::new()),
//! )
//! .unwrap();
//! assert_eq!(results.quasi_dists.len(), results.coefficients.len());
//!
//! let expvals = reconstruct_expectation_values(&results, subobservables).unwrap();
//! assert!((expvals[0] - 1.0).abs() < 1e-9);
//! ```

pub mod config;
pub mod decomposition;
pub mod error;
pub mod evaluation;
pub mod observable_grouping;
pub mod qpd;
pub mod reconstruction;

pub use config::ExecutionOptions;
pub use decomposition::{
    char_labels, decompose_gates, decompose_observables, partition_circuit_qubits, partition_problem,
    separate_circuit, PartitionedCuttingProblem, SeparatedCircuits,
};
pub use error::{CuttingError, Result};
pub use evaluation::{
    append_measurement_circuit, execute_experiments, execute_experiments_with_options, CircuitInput,
    CoefficientEntry, ExperimentResults, ObservableInput, SamplerInput, SubexperimentResult, OBSERVABLE_MEASUREMENTS,
};
pub use observable_grouping::{CommutingObservableGroup, ObservableCollection};
pub use qpd::{
    decompose_qpd_instructions, generate_qpd_samples, generate_qpd_weights, QpdBasis, QpdWeight, SingleQubitQpdGate,
    TwoQubitQpdGate, WeightType, QPD_MEASUREMENTS,
};
pub use reconstruction::{process_outcome, reconstruct_expectation_values};
