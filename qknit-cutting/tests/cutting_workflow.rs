//! End-to-end gate cutting: partition, execute, reconstruct
//!
//! With an exact sampler and enough samples for every map combination to get
//! an exact weight, reconstruction reproduces the uncut expectation values.

use approx::assert_abs_diff_eq;
use qknit_core::Circuit;
use qknit_cutting::{
    char_labels, decompose_gates, execute_experiments, execute_experiments_with_options, partition_problem,
    reconstruct_expectation_values, ExecutionOptions, SamplerInput, WeightType,
};
use qknit_gates::CircuitExt;
use qknit_sim::{simulate_statevector, ExactSampler, Sampler, ShotSampler, ShotSamplerConfig};
use qknit_state::PauliList;
use std::collections::BTreeMap;
use std::sync::Arc;

const EPSILON: f64 = 1e-9;

/// Enough samples that no map combination of up to three cuts is sampled
const ALL_EXACT: usize = 1_000_000;

fn exact_expectations(circuit: &Circuit, observables: &PauliList) -> Vec<f64> {
    let state = simulate_statevector(circuit).unwrap();
    observables
        .iter()
        .map(|o| o.expectation_value(&state).unwrap())
        .collect()
}

fn bell() -> Circuit {
    let mut circuit = Circuit::new(2);
    circuit.h(0).unwrap().cx(0, 1).unwrap();
    circuit
}

/// Four qubits in partitions "AABB", with three gates crossing between them
fn entangled_circuit() -> Circuit {
    let mut circuit = Circuit::new(4);
    circuit
        .h(0)
        .unwrap()
        .h(1)
        .unwrap()
        .ry(0.4, 2)
        .unwrap()
        .rx(0.9, 3)
        .unwrap()
        .cx(0, 1)
        .unwrap()
        .rzz(0.3, 1, 2)
        .unwrap()
        .crx(0.7, 2, 1)
        .unwrap()
        .cx(3, 0)
        .unwrap()
        .rz(0.2, 0)
        .unwrap()
        .s(3)
        .unwrap();
    circuit
}

fn observables() -> PauliList {
    PauliList::from_labels(&["ZZZZ", "XIIZ", "IYZI", "ZIXX", "IIII"]).unwrap()
}

// ============================================================================
// Partitioned circuits
// ============================================================================

#[test]
fn test_bell_zz_reconstructs_to_one() {
    let observables = PauliList::from_labels(&["ZZ"]).unwrap();
    let problem = partition_problem(&bell(), &char_labels("AB"), Some(&observables)).unwrap();
    let subobservables = problem.subobservables.unwrap();

    let results = execute_experiments(
        problem.subcircuits,
        subobservables.clone(),
        ALL_EXACT,
        SamplerInput::single(ExactSampler::new()),
    )
    .unwrap();
    assert_eq!(results.quasi_dists.len(), 6);
    assert_eq!(results.coefficients.len(), 6);
    assert!(results.coefficients.iter().all(|(_, kind)| *kind == WeightType::Exact));

    let expvals = reconstruct_expectation_values(&results, subobservables).unwrap();
    assert_abs_diff_eq!(expvals[0], 1.0, epsilon = EPSILON);
}

#[test]
fn test_partitioned_matches_statevector() {
    let circuit = entangled_circuit();
    let observables = observables();
    let expected = exact_expectations(&circuit, &observables);

    let problem = partition_problem(&circuit, &char_labels("AABB"), Some(&observables)).unwrap();
    assert_eq!(problem.bases.len(), 3);
    let subobservables = problem.subobservables.unwrap();

    let results = execute_experiments(
        problem.subcircuits,
        subobservables.clone(),
        ALL_EXACT,
        SamplerInput::single(ExactSampler::new()),
    )
    .unwrap();
    let expvals = reconstruct_expectation_values(&results, subobservables).unwrap();

    for (actual, expected) in expvals.iter().zip(&expected) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = EPSILON);
    }
}

#[test]
fn test_per_partition_samplers() {
    let circuit = entangled_circuit();
    let observables = observables();
    let expected = exact_expectations(&circuit, &observables);
    let problem = partition_problem(&circuit, &char_labels("AABB"), Some(&observables)).unwrap();
    let subobservables = problem.subobservables.unwrap();

    let mut samplers: BTreeMap<String, Arc<dyn Sampler>> = BTreeMap::new();
    samplers.insert("A".to_string(), Arc::new(ExactSampler::new()));
    samplers.insert("B".to_string(), Arc::new(ExactSampler::new()));

    let options = ExecutionOptions::new().with_seed(11).with_parallel(false);
    let results =
        execute_experiments_with_options(problem.subcircuits, subobservables.clone(), ALL_EXACT, samplers, &options)
            .unwrap();
    let expvals = reconstruct_expectation_values(&results, subobservables).unwrap();

    for (actual, expected) in expvals.iter().zip(&expected) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = EPSILON);
    }
}

// ============================================================================
// Unseparated circuits
// ============================================================================

#[test]
fn test_single_circuit_matches_partitioned() {
    let circuit = entangled_circuit();
    let observables = observables();
    let expected = exact_expectations(&circuit, &observables);

    // cut the same three gates without separating the circuit
    let (cut, bases) = decompose_gates(&circuit, &[5, 6, 7]).unwrap();
    assert_eq!(bases.len(), 3);

    let results = execute_experiments(
        cut,
        observables.clone(),
        ALL_EXACT,
        SamplerInput::single(ExactSampler::new()),
    )
    .unwrap();
    assert!(results.quasi_dists.iter().all(|sample| sample.len() == 1));
    let expvals = reconstruct_expectation_values(&results, observables).unwrap();

    for (actual, expected) in expvals.iter().zip(&expected) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = EPSILON);
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let circuit = entangled_circuit();
    let observables = observables();
    let problem = partition_problem(&circuit, &char_labels("AABB"), Some(&observables)).unwrap();
    let subobservables = problem.subobservables.unwrap();

    // few samples, so part of the weight is sampled
    let options = ExecutionOptions::new().with_seed(3);
    let run = || {
        execute_experiments_with_options(
            problem.subcircuits.clone(),
            subobservables.clone(),
            20,
            SamplerInput::single(ExactSampler::new()),
            &options,
        )
        .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.coefficients.iter().any(|(_, kind)| *kind == WeightType::Sampled));
    assert_eq!(first.coefficients, second.coefficients);
    assert_eq!(first.quasi_dists.len(), second.quasi_dists.len());
}

// ============================================================================
// Slow
// ============================================================================

#[test]
#[ignore]
fn test_shot_sampler_estimates_expectations() {
    let circuit = entangled_circuit();
    let observables = observables();
    let expected = exact_expectations(&circuit, &observables);
    let problem = partition_problem(&circuit, &char_labels("AABB"), Some(&observables)).unwrap();
    let subobservables = problem.subobservables.unwrap();

    let sampler = ShotSampler::new(ShotSamplerConfig::new().with_shots(50_000).with_seed(7)).unwrap();
    let options = ExecutionOptions::new().with_seed(5).with_parallel(false);
    let results = execute_experiments_with_options(
        problem.subcircuits,
        subobservables.clone(),
        ALL_EXACT,
        SamplerInput::single(sampler),
        &options,
    )
    .unwrap();
    let expvals = reconstruct_expectation_values(&results, subobservables).unwrap();

    for (actual, expected) in expvals.iter().zip(&expected) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 0.2);
    }
}

#[test]
fn test_sampled_weights_keep_total_mass() {
    let circuit = entangled_circuit();
    let observables = observables();
    let problem = partition_problem(&circuit, &char_labels("AABB"), Some(&observables)).unwrap();
    let subobservables = problem.subobservables.unwrap();

    // threshold 1/200 leaves most combinations to Monte Carlo sampling
    let options = ExecutionOptions::new().with_seed(17);
    let results = execute_experiments_with_options(
        problem.subcircuits,
        subobservables.clone(),
        200,
        SamplerInput::single(ExactSampler::new()),
        &options,
    )
    .unwrap();
    let total: f64 = results.coefficients.iter().map(|(c, _)| c.abs()).sum();
    let kappa: f64 = problem.bases.iter().map(|b| b.kappa()).product();
    assert_abs_diff_eq!(total, kappa, epsilon = 1e-9);

    let expvals = reconstruct_expectation_values(&results, subobservables).unwrap();
    assert_eq!(expvals.len(), 5);
    assert!(expvals.iter().all(|v| v.is_finite() && v.abs() <= kappa));
}
