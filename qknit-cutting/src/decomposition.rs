//! Partitioning a circuit into independently executable subcircuits
//!
//! Qubits are assigned to partitions by label. Gates spanning two
//! partitions are replaced by [`TwoQubitQpdGate`]s, which
//! [`separate_circuit`] then splits into one [`SingleQubitQpdGate`] per
//! side. Partitions are keyed by label and iterate in label order.

use crate::error::{CuttingError, Result};
use crate::qpd::{QpdBasis, SingleQubitQpdGate, TwoQubitQpdGate};
use qknit_core::{Circuit, Instruction, Operation, QuantumError, QubitId};
use qknit_state::PauliList;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One label per character, e.g. `"AB"` for a two-qubit circuit
pub fn char_labels(labels: &str) -> Vec<String> {
    labels.chars().map(String::from).collect()
}

/// Qubits of each partition, ascending
fn partition_qubits<L: AsRef<str>>(partition_labels: &[L]) -> BTreeMap<String, Vec<usize>> {
    let mut partitions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (qubit, label) in partition_labels.iter().enumerate() {
        partitions.entry(label.as_ref().to_string()).or_default().push(qubit);
    }
    partitions
}

fn check_labels<L: AsRef<str>>(circuit: &Circuit, partition_labels: &[L]) -> Result<()> {
    if partition_labels.len() != circuit.num_qubits() {
        return Err(CuttingError::PartitionLabelsMismatch {
            labels: partition_labels.len(),
            qubits: circuit.num_qubits(),
        });
    }
    Ok(())
}

/// Replace the gates at `instruction_ids` with [`TwoQubitQpdGate`]s
///
/// Returns the new circuit and the bases of the replaced gates, in the
/// order of `instruction_ids`.
///
/// # Errors
/// Returns error if an id is out of range, points at an operation that is
/// not a two-qubit gate, or the gate has no decomposition
pub fn decompose_gates(circuit: &Circuit, instruction_ids: &[usize]) -> Result<(Circuit, Vec<QpdBasis>)> {
    let mut decomposed = circuit.clone();
    let mut bases = Vec::with_capacity(instruction_ids.len());
    for &index in instruction_ids {
        let instruction = circuit
            .instruction(index)
            .ok_or(QuantumError::InvalidInstruction(index, circuit.len()))?;
        if instruction.num_qubits() != 2 {
            return Err(CuttingError::MultiQubitCut {
                name: instruction.name().to_string(),
            });
        }
        let gate = TwoQubitQpdGate::from_instruction(instruction)?;
        bases.push(gate.basis().clone());
        decomposed.set_instruction(index, Instruction::from_gate(Arc::new(gate), instruction.qubits())?)?;
    }
    Ok((decomposed, bases))
}

/// Replace every gate acting across partitions with a [`TwoQubitQpdGate`]
///
/// `partition_labels[q]` names the partition of qubit `q`. Barriers are
/// left in place.
///
/// # Errors
/// Returns error if the label count differs from the qubit count, or an
/// operation on three or more qubits spans partitions
pub fn partition_circuit_qubits<L: AsRef<str>>(circuit: &Circuit, partition_labels: &[L]) -> Result<Circuit> {
    check_labels(circuit, partition_labels)?;
    let mut cut_ids = Vec::new();
    for (index, instruction) in circuit.instructions().enumerate() {
        if matches!(instruction.operation(), Operation::Barrier(_)) {
            continue;
        }
        let mut labels = instruction.qubits().iter().map(|q| partition_labels[q.index()].as_ref());
        let first = labels.next();
        if labels.any(|label| Some(label) != first) {
            cut_ids.push(index);
        }
    }
    debug!(num_cuts = cut_ids.len(), "decomposing gates across partitions");
    let (decomposed, _) = decompose_gates(circuit, &cut_ids)?;
    Ok(decomposed)
}

/// Subcircuits of a separated circuit
#[derive(Debug, Clone, PartialEq)]
pub struct SeparatedCircuits {
    /// One subcircuit per partition
    pub subcircuits: BTreeMap<String, Circuit>,
    /// For each original qubit, its partition and index there
    pub qubit_map: Vec<(String, usize)>,
}

/// Split a circuit into one subcircuit per partition
///
/// Qubits keep their relative order within a partition, and every
/// subcircuit carries the classical registers of the input. Each
/// [`TwoQubitQpdGate`] becomes two [`SingleQubitQpdGate`] halves labelled
/// `<label>_<n>`, `n` counting cuts in circuit order.
///
/// # Errors
/// Returns error if the label count differs from the qubit count, or an
/// operation other than a barrier or a QPD gate spans partitions
pub fn separate_circuit<L: AsRef<str>>(circuit: &Circuit, partition_labels: &[L]) -> Result<SeparatedCircuits> {
    check_labels(circuit, partition_labels)?;
    let partitions = partition_qubits(partition_labels);

    let mut qubit_map = vec![(String::new(), 0); circuit.num_qubits()];
    let mut subcircuits = BTreeMap::new();
    for (label, qubits) in &partitions {
        for (local, &qubit) in qubits.iter().enumerate() {
            qubit_map[qubit] = (label.clone(), local);
        }
        let mut subcircuit = Circuit::new(qubits.len());
        for register in circuit.registers() {
            match register.name() {
                Some(name) => {
                    subcircuit.add_register(name, register.size())?;
                }
                None => {
                    subcircuit.add_clbits(register.size());
                }
            }
        }
        subcircuits.insert(label.clone(), subcircuit);
    }

    let local = |qubit: &QubitId| QubitId::new(qubit_map[qubit.index()].1);
    let mut num_cuts = 0;
    for (index, instruction) in circuit.instructions().enumerate() {
        let labels: Vec<&str> = instruction
            .qubits()
            .iter()
            .map(|q| qubit_map[q.index()].0.as_str())
            .collect();

        if let Some(gate) = instruction.downcast_gate::<TwoQubitQpdGate>() {
            let label = format!("{}_{}", gate.label().unwrap_or("cut_qpd_2q"), num_cuts);
            num_cuts += 1;
            for (half, qubit) in gate.split(&label).into_iter().zip(instruction.qubits()) {
                let subcircuit = subcircuit_of(&mut subcircuits, &qubit_map[qubit.index()].0)?;
                subcircuit.add_gate(Arc::new(half), &[local(qubit)])?;
            }
            continue;
        }

        if let Operation::Barrier(_) = instruction.operation() {
            let mut per_partition: BTreeMap<&str, Vec<QubitId>> = BTreeMap::new();
            for (qubit, label) in instruction.qubits().iter().zip(&labels) {
                per_partition.entry(*label).or_default().push(local(qubit));
            }
            for (label, qubits) in per_partition {
                subcircuit_of(&mut subcircuits, label)?.append_operation(
                    Operation::Barrier(qubits.len()),
                    &qubits,
                    &[],
                )?;
            }
            continue;
        }

        if labels.windows(2).any(|pair| pair[0] != pair[1]) {
            return Err(CuttingError::NonSeparable {
                index,
                name: instruction.name().to_string(),
            });
        }
        let Some(label) = labels.first() else {
            continue;
        };
        let qubits: Vec<QubitId> = instruction.qubits().iter().map(local).collect();
        subcircuit_of(&mut subcircuits, label)?.append_operation(
            instruction.operation().clone(),
            &qubits,
            instruction.clbits(),
        )?;
    }

    debug!(
        num_partitions = subcircuits.len(),
        num_cuts, "separated circuit"
    );
    Ok(SeparatedCircuits { subcircuits, qubit_map })
}

fn subcircuit_of<'a>(subcircuits: &'a mut BTreeMap<String, Circuit>, label: &str) -> Result<&'a mut Circuit> {
    subcircuits
        .get_mut(label)
        .ok_or_else(|| QuantumError::ValidationError(format!("no partition labelled {}", label)).into())
}

/// Restrict each observable to the qubits of each partition
///
/// # Errors
/// Returns error if the observables act on fewer qubits than are labelled
pub fn decompose_observables<L: AsRef<str>>(
    observables: &PauliList,
    partition_labels: &[L],
) -> Result<BTreeMap<String, PauliList>> {
    if !observables.is_empty() && observables.num_qubits() != partition_labels.len() {
        return Err(CuttingError::ObservableSizeMismatch);
    }
    partition_qubits(partition_labels)
        .into_iter()
        .map(|(label, qubits)| {
            let restricted = observables
                .iter()
                .map(|observable| observable.restrict(&qubits))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok((label, PauliList::new(restricted)?))
        })
        .collect()
}

/// Subcircuits, bases and subobservables of a partitioned problem
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionedCuttingProblem {
    pub subcircuits: BTreeMap<String, Circuit>,
    /// Bases of the cut gates, in circuit order
    pub bases: Vec<QpdBasis>,
    pub subobservables: Option<BTreeMap<String, PauliList>>,
}

/// Cut every gate spanning partitions and separate the circuit
///
/// # Example
/// ```
/// use qknit_core::Circuit;
/// use qknit_cutting::{char_labels, partition_problem};
/// use qknit_gates::CircuitExt;
/// use qknit_state::PauliList;
///
/// let mut bell = Circuit::new(2);
/// bell.h(0).unwrap().cx(0, 1).unwrap();
/// let observables = PauliList::from_labels(&["ZZ"]).unwrap();
///
/// let problem = partition_problem(&bell, &char_labels("AB"), Some(&observables)).unwrap();
/// assert_eq!(problem.subcircuits.len(), 2);
/// assert_eq!(problem.bases.len(), 1);
/// ```
///
/// # Errors
/// Returns error if the label count differs from the qubit count, an
/// observable acts on a different number of qubits than the circuit or
/// has a phase, or a spanning gate cannot be cut
#[instrument(skip_all, fields(num_qubits = circuit.num_qubits(), num_instructions = circuit.len()))]
pub fn partition_problem<L: AsRef<str>>(
    circuit: &Circuit,
    partition_labels: &[L],
    observables: Option<&PauliList>,
) -> Result<PartitionedCuttingProblem> {
    check_labels(circuit, partition_labels)?;
    if let Some(observables) = observables {
        if observables.iter().any(|o| o.num_qubits() != circuit.num_qubits()) {
            return Err(CuttingError::ObservableSizeMismatch);
        }
        if observables.iter().any(|o| !o.has_unit_phase()) {
            return Err(CuttingError::ObservablePhase);
        }
    }

    let qpd_circuit = partition_circuit_qubits(circuit, partition_labels)?;
    let bases: Vec<QpdBasis> = qpd_circuit
        .instructions()
        .filter_map(|i| i.downcast_gate::<TwoQubitQpdGate>())
        .map(|gate| gate.basis().clone())
        .collect();
    let SeparatedCircuits { subcircuits, .. } = separate_circuit(&qpd_circuit, partition_labels)?;
    let subobservables = observables
        .map(|observables| decompose_observables(observables, partition_labels))
        .transpose()?;

    debug!(
        num_subcircuits = subcircuits.len(),
        num_bases = bases.len(),
        "partitioned cutting problem"
    );
    Ok(PartitionedCuttingProblem {
        subcircuits,
        bases,
        subobservables,
    })
}

/// Whether `instruction` holds a [`SingleQubitQpdGate`]
pub(crate) fn is_single_qubit_qpd(instruction: &Instruction) -> bool {
    instruction.downcast_gate::<SingleQubitQpdGate>().is_some()
}
