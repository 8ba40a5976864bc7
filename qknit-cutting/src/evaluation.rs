//! Generating and running subexperiments
//!
//! Every sampled combination of QPD maps turns each subcircuit into one
//! concrete circuit per observable group. The circuits of a partition go to
//! its sampler as one batch, and partitions run in parallel.

use crate::config::ExecutionOptions;
use crate::decomposition::is_single_qubit_qpd;
use crate::error::{CuttingError, Result};
use crate::observable_grouping::{CommutingObservableGroup, ObservableCollection};
use crate::qpd::{
    decompose_qpd_instructions, generate_qpd_weights, QpdBasis, SingleQubitQpdGate, TwoQubitQpdGate, WeightType,
    QPD_MEASUREMENTS,
};
use qknit_core::{Circuit, QuantumError};
use qknit_gates::CircuitExt;
use qknit_sim::{QuasiDistribution, Sampler, SimulatorError};
use qknit_state::{Pauli, PauliList};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Name of the register receiving observable measurements
pub const OBSERVABLE_MEASUREMENTS: &str = "observable_measurements";

/// Label used for the partition of an unseparated circuit
const SINGLE_PARTITION: &str = "";

/// A whole circuit, or one subcircuit per partition
#[derive(Debug, Clone)]
pub enum CircuitInput {
    Single(Circuit),
    Partitioned(BTreeMap<String, Circuit>),
}

impl From<Circuit> for CircuitInput {
    fn from(circuit: Circuit) -> Self {
        CircuitInput::Single(circuit)
    }
}

impl From<BTreeMap<String, Circuit>> for CircuitInput {
    fn from(circuits: BTreeMap<String, Circuit>) -> Self {
        CircuitInput::Partitioned(circuits)
    }
}

/// Observables of a whole circuit, or per partition
#[derive(Debug, Clone)]
pub enum ObservableInput {
    Single(PauliList),
    Partitioned(BTreeMap<String, PauliList>),
}

impl From<PauliList> for ObservableInput {
    fn from(observables: PauliList) -> Self {
        ObservableInput::Single(observables)
    }
}

impl From<BTreeMap<String, PauliList>> for ObservableInput {
    fn from(observables: BTreeMap<String, PauliList>) -> Self {
        ObservableInput::Partitioned(observables)
    }
}

impl ObservableInput {
    /// Observable lists in partition order
    pub(crate) fn into_lists(self) -> Vec<PauliList> {
        match self {
            ObservableInput::Single(list) => vec![list],
            ObservableInput::Partitioned(map) => map.into_values().collect(),
        }
    }
}

/// One sampler for everything, or one per partition
#[derive(Debug, Clone)]
pub enum SamplerInput {
    Single(Arc<dyn Sampler>),
    PerPartition(BTreeMap<String, Arc<dyn Sampler>>),
}

impl SamplerInput {
    /// Use `sampler` for every partition
    pub fn single<S: Sampler + 'static>(sampler: S) -> Self {
        SamplerInput::Single(Arc::new(sampler))
    }
}

impl From<Arc<dyn Sampler>> for SamplerInput {
    fn from(sampler: Arc<dyn Sampler>) -> Self {
        SamplerInput::Single(sampler)
    }
}

impl From<BTreeMap<String, Arc<dyn Sampler>>> for SamplerInput {
    fn from(samplers: BTreeMap<String, Arc<dyn Sampler>>) -> Self {
        SamplerInput::PerPartition(samplers)
    }
}

/// Distribution of one subexperiment and its number of QPD measurement bits
///
/// The low `num_qpd_bits` bits of each outcome hold QPD measurements, the
/// remaining bits observable measurements.
pub type SubexperimentResult = (QuasiDistribution, usize);

/// Coefficient of one sample and how its weight was found
pub type CoefficientEntry = (f64, WeightType);

/// Output of [`execute_experiments`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResults {
    /// Indexed by sample, then partition (label order), then observable group
    pub quasi_dists: Vec<Vec<Vec<SubexperimentResult>>>,
    /// One entry per sample
    pub coefficients: Vec<CoefficientEntry>,
}

/// Add measurements of `group`'s observables to `circuit`
///
/// Observable qubit `i` lives on circuit qubit `qubit_locations[i]`, or on
/// qubit `i` when no locations are given. A new `observable_measurements`
/// register receives one bit per qubit the general observable acts on.
///
/// # Errors
/// Returns error if the locations (or, without locations, the circuit)
/// do not match the observable's qubit count. The circuit is left
/// untouched on error.
pub fn append_measurement_circuit(
    circuit: &mut Circuit,
    group: &CommutingObservableGroup,
    qubit_locations: Option<&[usize]>,
) -> Result<()> {
    let general = group.general_observable();
    let num_qubits = general.num_qubits();
    let locations: Vec<usize> = match qubit_locations {
        Some(locations) => {
            if locations.len() != num_qubits {
                return Err(CuttingError::QubitLocationsMismatch {
                    locations: locations.len(),
                    observable: num_qubits,
                });
            }
            locations.to_vec()
        }
        None => {
            if circuit.num_qubits() != num_qubits {
                return Err(CuttingError::QubitCountMismatch {
                    circuit: circuit.num_qubits(),
                    observable: num_qubits,
                });
            }
            (0..num_qubits).collect()
        }
    };
    if let Some(&bad) = locations.iter().find(|&&q| q >= circuit.num_qubits()) {
        return Err(QuantumError::invalid_qubit(bad, circuit.num_qubits()).into());
    }

    let register = circuit.add_register(OBSERVABLE_MEASUREMENTS, group.pauli_indices().len())?;
    for (bit, &index) in group.pauli_indices().iter().enumerate() {
        let qubit = locations[index];
        match general.paulis()[index] {
            Pauli::X => {
                circuit.h(qubit)?;
            }
            Pauli::Y => {
                circuit.sdg(qubit)?.h(qubit)?;
            }
            Pauli::Z | Pauli::I => {}
        }
        circuit.measure(qubit, register.start() + bit)?;
    }
    Ok(())
}

/// Everything needed to run one partition
struct PartitionJob {
    label: String,
    circuit: Circuit,
    observables: PauliList,
    sampler: Arc<dyn Sampler>,
    /// Circuit positions of each QPD gate
    instruction_ids: Vec<Vec<usize>>,
    /// For each QPD gate, the position of its decomposition in the basis list
    basis_positions: Vec<usize>,
}

/// Parse the cut index from a `<name>_<n>` label
fn decomposition_id(gate: &SingleQubitQpdGate) -> Result<usize> {
    let bad_label = || CuttingError::BadQpdGateLabel {
        label: gate.label().map(str::to_string),
    };
    let label = gate.label().ok_or_else(bad_label)?;
    let (_, id) = label.rsplit_once('_').ok_or_else(bad_label)?;
    id.parse().map_err(|_| bad_label())
}

fn check_inputs(
    circuits: CircuitInput,
    observables: ObservableInput,
    samplers: SamplerInput,
) -> Result<(Vec<PartitionJob>, Vec<QpdBasis>)> {
    let (circuits, observables, separated) = match (circuits, observables) {
        (CircuitInput::Single(circuit), ObservableInput::Single(observables)) => {
            if let SamplerInput::PerPartition(_) = samplers {
                return Err(CuttingError::SamplerMappingForSingleCircuit);
            }
            let mut circuits = BTreeMap::new();
            circuits.insert(SINGLE_PARTITION.to_string(), circuit);
            let mut lists = BTreeMap::new();
            lists.insert(SINGLE_PARTITION.to_string(), observables);
            (circuits, lists, false)
        }
        (CircuitInput::Partitioned(circuits), ObservableInput::Partitioned(observables)) => {
            if !circuits.keys().eq(observables.keys()) {
                return Err(CuttingError::ObservableKeysMismatch);
            }
            (circuits, observables, true)
        }
        (CircuitInput::Partitioned(_), ObservableInput::Single(_)) => {
            return Err(CuttingError::PartitionMappingExpected)
        }
        (CircuitInput::Single(_), ObservableInput::Partitioned(_)) => return Err(CuttingError::PauliListExpected),
    };

    let samplers: BTreeMap<String, Arc<dyn Sampler>> = match samplers {
        SamplerInput::Single(sampler) => circuits.keys().map(|k| (k.clone(), sampler.clone())).collect(),
        SamplerInput::PerPartition(samplers) => {
            if !circuits.keys().eq(samplers.keys()) {
                return Err(CuttingError::SamplerKeysMismatch);
            }
            let same = |a: &Arc<dyn Sampler>, b: &Arc<dyn Sampler>| {
                std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
            };
            let entries: Vec<(&String, &Arc<dyn Sampler>)> = samplers.iter().collect();
            for (i, &(first, a)) in entries.iter().enumerate() {
                for &(second, b) in &entries[i + 1..] {
                    if same(a, b) {
                        return Err(CuttingError::DuplicateSampler {
                            first: first.clone(),
                            second: second.clone(),
                        });
                    }
                }
            }
            samplers
        }
    };
    if let Some(sampler) = samplers.values().find(|s| !s.supports_mid_circuit_measurement()) {
        return Err(CuttingError::MidCircuitMeasurementUnsupported {
            sampler: sampler.name().to_string(),
        });
    }
    if circuits.values().any(Circuit::has_classical_bits) {
        return Err(CuttingError::ClassicalBitsInInput);
    }

    let mut jobs = Vec::with_capacity(circuits.len());
    let mut bases = Vec::new();
    if !separated {
        for (label, circuit) in circuits {
            let mut instruction_ids = Vec::new();
            for (index, instruction) in circuit.instructions().enumerate() {
                if is_single_qubit_qpd(instruction) {
                    return Err(CuttingError::SingleQubitGateInUnseparableCircuit);
                }
                if let Some(gate) = instruction.downcast_gate::<TwoQubitQpdGate>() {
                    instruction_ids.push(vec![index]);
                    bases.push(gate.basis().clone());
                }
            }
            let basis_positions = (0..instruction_ids.len()).collect();
            jobs.push(PartitionJob {
                observables: observables[&label].clone(),
                sampler: samplers[&label].clone(),
                label,
                circuit,
                instruction_ids,
                basis_positions,
            });
        }
        return Ok((jobs, bases));
    }

    // cut id -> basis, and per partition the (instruction, cut id) pairs
    let mut by_id: BTreeMap<usize, QpdBasis> = BTreeMap::new();
    let mut gate_ids: Vec<Vec<(usize, usize)>> = Vec::with_capacity(circuits.len());
    for (label, circuit) in &circuits {
        let mut ids = Vec::new();
        for (index, instruction) in circuit.instructions().enumerate() {
            if instruction.downcast_gate::<TwoQubitQpdGate>().is_some() {
                return Err(CuttingError::UnsplitTwoQubitGate { label: label.clone() });
            }
            if let Some(gate) = instruction.downcast_gate::<SingleQubitQpdGate>() {
                let id = decomposition_id(gate)?;
                by_id.entry(id).or_insert_with(|| gate.basis().clone());
                ids.push((index, id));
            }
        }
        gate_ids.push(ids);
    }
    let positions: BTreeMap<usize, usize> = by_id.keys().enumerate().map(|(p, &id)| (id, p)).collect();
    bases.extend(by_id.into_values());

    for ((label, circuit), ids) in circuits.into_iter().zip(gate_ids) {
        let instruction_ids = ids.iter().map(|&(index, _)| vec![index]).collect();
        let basis_positions = ids.iter().map(|(_, id)| positions[id]).collect();
        jobs.push(PartitionJob {
            observables: observables[&label].clone(),
            sampler: samplers[&label].clone(),
            label,
            circuit,
            instruction_ids,
            basis_positions,
        });
    }
    Ok((jobs, bases))
}

/// Run the subexperiments of one partition; result indexed by sample, then
/// group
fn run_partition(job: &PartitionJob, samples: &[Vec<usize>]) -> Result<Vec<Vec<SubexperimentResult>>> {
    let collection = ObservableCollection::new(&job.observables)?;
    let num_groups = collection.groups().len();

    let mut experiments = Vec::with_capacity(samples.len() * num_groups);
    let mut num_qpd_bits = Vec::with_capacity(samples.len());
    for map_ids in samples {
        let partition_map_ids: Vec<usize> = job.basis_positions.iter().map(|&p| map_ids[p]).collect();
        let decomposed = decompose_qpd_instructions(&job.circuit, &job.instruction_ids, &partition_map_ids)?;
        num_qpd_bits.push(decomposed.register(QPD_MEASUREMENTS).map_or(0, |r| r.size()));
        for group in collection.groups() {
            let mut experiment = decomposed.clone();
            append_measurement_circuit(&mut experiment, group, None)?;
            experiments.push(experiment);
        }
    }

    debug!(
        partition = %job.label,
        sampler = job.sampler.name(),
        num_experiments = experiments.len(),
        "running subexperiments"
    );
    let dists = job.sampler.run(&experiments)?;
    if dists.len() != experiments.len() {
        return Err(SimulatorError::Other(format!(
            "{} returned {} distribution(s) for {} circuit(s)",
            job.sampler.name(),
            dists.len(),
            experiments.len()
        ))
        .into());
    }

    let mut dists = dists.into_iter();
    Ok(num_qpd_bits
        .into_iter()
        .map(|bits| dists.by_ref().take(num_groups).map(|d| (d, bits)).collect())
        .collect())
}

/// Generate, run and collect the subexperiments of a cut circuit
///
/// `circuits` is either one circuit holding [`TwoQubitQpdGate`]s, or a
/// mapping from partition label to a subcircuit holding
/// [`SingleQubitQpdGate`]s (as produced by
/// [`partition_problem`](crate::partition_problem)). `subobservables`
/// must have the same shape. Up to `num_samples` map combinations are drawn
/// with [`generate_qpd_weights`].
///
/// # Example
/// ```
/// use qknit_core::Circuit;
/// use qknit_cutting::{char_labels, execute_experiments, partition_problem, SamplerInput};
/// use qknit_gates::CircuitExt;
/// use qknit_sim::ExactSampler;
/// use qknit_state::PauliList;
///
/// let mut bell = Circuit::new(2);
/// bell.h(0).unwrap().cx(0, 1).unwrap();
/// let observables = PauliList::from_labels(&["ZZ"]).unwrap();
/// let problem = partition_problem(&bell, &char_labels("AB"), Some(&observables)).unwrap();
///
/// let results = execute_experiments(
///     problem.subcircuits,
///     problem.subobservables.unwrap(),
///     100,
///     SamplerInput::single(ExactSampler::new()),
/// )
/// .unwrap();
/// assert_eq!(results.quasi_dists.len(), results.coefficients.len());
/// ```
///
/// # Errors
/// Returns error on invalid inputs (see [`CuttingError`]), or if a sampler
/// fails
#[instrument(skip_all, fields(num_samples = num_samples))]
pub fn execute_experiments(
    circuits: impl Into<CircuitInput>,
    subobservables: impl Into<ObservableInput>,
    num_samples: usize,
    samplers: impl Into<SamplerInput>,
) -> Result<ExperimentResults> {
    execute_experiments_with_options(
        circuits,
        subobservables,
        num_samples,
        samplers,
        &ExecutionOptions::default(),
    )
}

/// [`execute_experiments`] with a seed and parallelism control
pub fn execute_experiments_with_options(
    circuits: impl Into<CircuitInput>,
    subobservables: impl Into<ObservableInput>,
    num_samples: usize,
    samplers: impl Into<SamplerInput>,
    options: &ExecutionOptions,
) -> Result<ExperimentResults> {
    if num_samples == 0 {
        return Err(CuttingError::InvalidSampleCount);
    }
    let (jobs, bases) = check_inputs(circuits.into(), subobservables.into(), samplers.into())?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let weights = generate_qpd_weights(&bases, num_samples, &mut rng)?;
    let kappa: f64 = bases.iter().map(QpdBasis::kappa).product();

    let mut samples = Vec::with_capacity(weights.len());
    let mut coefficients = Vec::with_capacity(weights.len());
    for (map_ids, weight, weight_type) in weights {
        let actual: f64 = bases
            .iter()
            .zip(&map_ids)
            .map(|(basis, &map_id)| basis.coeffs()[map_id])
            .product();
        coefficients.push((weight * kappa * actual.signum(), weight_type));
        samples.push(map_ids);
    }
    debug!(
        num_partitions = jobs.len(),
        num_bases = bases.len(),
        num_sampled = samples.len(),
        "executing subexperiments"
    );

    let per_partition: Vec<Vec<Vec<SubexperimentResult>>> = if options.parallel {
        jobs.par_iter().map(|job| run_partition(job, &samples)).collect::<Result<_>>()?
    } else {
        jobs.iter().map(|job| run_partition(job, &samples)).collect::<Result<_>>()?
    };

    // [partition][sample] -> [sample][partition]
    let mut quasi_dists: Vec<Vec<Vec<SubexperimentResult>>> =
        (0..samples.len()).map(|_| Vec::with_capacity(jobs.len())).collect();
    for partition in per_partition {
        for (sample, groups) in quasi_dists.iter_mut().zip(partition) {
            sample.push(groups);
        }
    }

    Ok(ExperimentResults {
        quasi_dists,
        coefficients,
    })
}
