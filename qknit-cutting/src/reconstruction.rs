//! Recombining subexperiment results into expectation values

use crate::error::{CuttingError, Result};
use crate::evaluation::{ExperimentResults, ObservableInput, SubexperimentResult};
use crate::observable_grouping::{CommutingObservableGroup, ObservableCollection};
use qknit_state::PauliList;
use tracing::{debug, instrument};

/// `(-1)^popcount(bits)`
#[inline]
fn parity_sign(bits: u64) -> f64 {
    if bits.count_ones() % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Split an outcome into its QPD bits and its observable bits
#[inline]
fn split_outcome(outcome: u64, num_qpd_bits: usize) -> (u64, u64) {
    if num_qpd_bits >= u64::BITS as usize {
        return (outcome, 0);
    }
    let qpd_mask = (1u64 << num_qpd_bits) - 1;
    (outcome & qpd_mask, outcome >> num_qpd_bits)
}

/// Value of each observable of `group` for one outcome
///
/// The QPD bits contribute their parity as a sign, each observable the
/// parity of the measured bits it depends on.
pub fn process_outcome(group: &CommutingObservableGroup, num_qpd_bits: usize, outcome: u64) -> Vec<f64> {
    let (qpd_bits, measured) = split_outcome(outcome, num_qpd_bits);
    let qpd_factor = parity_sign(qpd_bits);
    group
        .pauli_bitmasks()
        .iter()
        .map(|&mask| qpd_factor * parity_sign(measured & mask))
        .collect()
}

/// Expectation of each observable of `group` under one subexperiment
fn group_expectations(group: &CommutingObservableGroup, result: &SubexperimentResult) -> Vec<f64> {
    let (dist, num_qpd_bits) = result;
    let mut values = vec![0.0; group.commuting_observables().len()];
    for (outcome, quasi_probability) in dist.iter() {
        for (value, term) in values.iter_mut().zip(process_outcome(group, *num_qpd_bits, outcome)) {
            *value += quasi_probability * term;
        }
    }
    values
}

/// Estimate the expectation value of each observable
///
/// `observables` has the shape passed to
/// [`execute_experiments`](crate::execute_experiments): one list for an
/// unseparated circuit, or one list per partition. Entry `i` of the result
/// estimates the product over partitions of the `i`-th subobservables.
///
/// # Example
/// ```
/// use qknit_core::Circuit;
/// use qknit_cutting::{char_labels, execute_experiments, partition_problem, reconstruct_expectation_values, SamplerInput};
/// use qknit_gates::CircuitExt;
/// use qknit_sim::ExactSampler;
/// use qknit_state::PauliList;
///
/// let mut bell = Circuit::new(2);
/// bell.h(0).unwrap().cx(0, 1).unwrap();
/// let observables = PauliList::from_labels(&["ZZ"]).unwrap();
/// let problem = partition_problem(&bell, &char_labels("AB"), Some(&observables)).unwrap();
/// let subobservables = problem.subobservables.unwrap();
///
/// let results = execute_experiments(
///     problem.subcircuits,
///     subobservables.clone(),
///     100,
///     SamplerInput::single(ExactSampler::new()),
/// )
/// .unwrap();
/// let values = reconstruct_expectation_values(&results, subobservables).unwrap();
/// assert!((values[0] - 1.0).abs() < 1e-9);
/// ```
///
/// # Errors
/// Returns error if an observable has a phase, or the results do not have
/// the shape the observables imply
#[instrument(skip_all, fields(num_samples = results.coefficients.len()))]
pub fn reconstruct_expectation_values(
    results: &ExperimentResults,
    observables: impl Into<ObservableInput>,
) -> Result<Vec<f64>> {
    let lists: Vec<PauliList> = observables.into().into_lists();
    if lists.iter().flat_map(PauliList::iter).any(|o| !o.has_unit_phase()) {
        return Err(CuttingError::ObservablePhase);
    }
    let num_observables = lists.first().map_or(0, PauliList::len);
    if let Some(list) = lists.iter().find(|l| l.len() != num_observables) {
        return Err(CuttingError::SubobservableCountMismatch {
            expected: num_observables,
            actual: list.len(),
        });
    }
    if results.quasi_dists.len() != results.coefficients.len() {
        return Err(CuttingError::SampleCountMismatch {
            quasi_dists: results.quasi_dists.len(),
            coefficients: results.coefficients.len(),
        });
    }
    let collections = lists
        .iter()
        .map(ObservableCollection::new)
        .collect::<Result<Vec<_>>>()?;

    let mut expvals = vec![0.0; num_observables];
    for (subsystems, &(coefficient, _)) in results.quasi_dists.iter().zip(&results.coefficients) {
        if subsystems.len() != collections.len() {
            return Err(CuttingError::ResultShapeMismatch {
                expected: collections.len(),
                actual: subsystems.len(),
            });
        }

        let mut current = vec![1.0; num_observables];
        for (subsystem, ((collection, list), groups)) in collections.iter().zip(&lists).zip(subsystems).enumerate() {
            if groups.len() != collection.groups().len() {
                return Err(CuttingError::GroupCountMismatch {
                    subsystem,
                    expected: collection.groups().len(),
                    actual: groups.len(),
                });
            }
            let group_values: Vec<Vec<f64>> = collection
                .groups()
                .iter()
                .zip(groups)
                .map(|(group, result)| group_expectations(group, result))
                .collect();

            for (value, observable) in current.iter_mut().zip(list) {
                let entries = collection.lookup(observable).unwrap_or_default();
                if entries.is_empty() {
                    continue;
                }
                let mean = entries
                    .iter()
                    .map(|&(group, index)| group_values[group][index])
                    .sum::<f64>()
                    / entries.len() as f64;
                *value *= mean;
            }
        }

        for (expval, value) in expvals.iter_mut().zip(current) {
            *expval += coefficient * value;
        }
    }

    debug!(num_observables, "reconstructed expectation values");
    Ok(expvals)
}
