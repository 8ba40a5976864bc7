//! Replacing QPD gates with the operations of a chosen map

use super::basis::QpdBasis;
use super::gates::{qpd_basis, SingleQubitQpdGate, TwoQubitQpdGate};
use crate::error::{CuttingError, Result};
use qknit_core::{Circuit, ClbitId, Instruction, Operation, QuantumError, QubitId};
use smallvec::SmallVec;

/// Name of the register receiving the signed measurements of QPD maps
pub const QPD_MEASUREMENTS: &str = "qpd_measurements";

/// Operation sequences an instruction expands to, paired with their qubit
type Expansion<'a> = SmallVec<[(QubitId, &'a [Operation]); 2]>;

fn expansion(instruction: &Instruction, map_id: usize) -> Expansion<'_> {
    let mut out = Expansion::new();
    if let Some(gate) = instruction.downcast_gate::<TwoQubitQpdGate>() {
        let map = &gate.basis().maps()[map_id];
        for (qubit, ops) in instruction.qubits().iter().zip(map) {
            out.push((*qubit, ops.as_slice()));
        }
    } else if let Some(gate) = instruction.downcast_gate::<SingleQubitQpdGate>() {
        let map = &gate.basis().maps()[map_id];
        out.push((instruction.qubits()[0], map[gate.qubit_id()].as_slice()));
    }
    out
}

/// Replace QPD gates with the operations of selected maps
///
/// `instruction_ids[i]` lists the circuit positions of the gates making up
/// decomposition `i` (one two-qubit gate, or the halves of a separated
/// cut), and `map_ids[i]` the map to substitute for them. Signed
/// measurements write to a new `qpd_measurements` register, in circuit
/// order. The register is added even when no map measures.
///
/// # Errors
/// Returns error if the two slices differ in length, an id does not point
/// at a QPD gate, the gates of one decomposition have different bases, a
/// map id is out of range, or one index is listed with two different map ids
pub fn decompose_qpd_instructions(
    circuit: &Circuit,
    instruction_ids: &[Vec<usize>],
    map_ids: &[usize],
) -> Result<Circuit> {
    if instruction_ids.len() != map_ids.len() {
        return Err(CuttingError::MapIdCountMismatch {
            map_ids: map_ids.len(),
            decompositions: instruction_ids.len(),
        });
    }

    let mut selected: Vec<(usize, usize)> = Vec::new();
    for (group, &map_id) in instruction_ids.iter().zip(map_ids) {
        let mut group_basis: Option<&QpdBasis> = None;
        for &index in group {
            let instruction = circuit
                .instruction(index)
                .ok_or(QuantumError::InvalidInstruction(index, circuit.len()))?;
            let basis = qpd_basis(instruction.operation()).ok_or_else(|| CuttingError::NotQpdGate {
                index,
                name: instruction.name().to_string(),
            })?;
            match group_basis {
                Some(first) if first != basis => return Err(CuttingError::BasisMismatch),
                _ => group_basis = Some(basis),
            }
            if map_id >= basis.len() {
                return Err(CuttingError::MapIdOutOfRange {
                    map_id,
                    num_maps: basis.len(),
                });
            }
            selected.push((index, map_id));
        }
    }
    selected.sort_unstable_by_key(|&(index, _)| index);
    if let Some(pair) = selected
        .windows(2)
        .find(|pair| pair[0].0 == pair[1].0 && pair[0].1 != pair[1].1)
    {
        return Err(CuttingError::ConflictingMapIds {
            index: pair[0].0,
            first: pair[0].1.min(pair[1].1),
            second: pair[0].1.max(pair[1].1),
        });
    }
    selected.dedup();

    let expansions: Vec<(usize, Expansion<'_>)> = selected
        .iter()
        .filter_map(|&(index, map_id)| {
            circuit
                .instruction(index)
                .map(|instruction| (index, expansion(instruction, map_id)))
        })
        .collect();
    let num_measurements = expansions
        .iter()
        .flat_map(|(_, expansion)| expansion.iter())
        .flat_map(|(_, ops)| ops.iter())
        .filter(|op| matches!(op, Operation::Measure))
        .count();

    let mut decomposed = circuit.clone();
    let register = decomposed.add_register(QPD_MEASUREMENTS, num_measurements)?;
    let mut next_bit = register.start();

    let mut replacements = Vec::with_capacity(expansions.len());
    for (index, expansion) in &expansions {
        let mut instructions = Vec::new();
        for &(qubit, ops) in expansion {
            for op in ops {
                let instruction = if matches!(op, Operation::Measure) {
                    let clbit = ClbitId::new(next_bit);
                    next_bit += 1;
                    Instruction::new(Operation::Measure, &[qubit], &[clbit])?
                } else {
                    Instruction::new(op.clone(), &[qubit], &[])?
                };
                instructions.push(instruction);
            }
        }
        replacements.push((*index, instructions));
    }

    // back to front so earlier indices stay valid
    for (index, instructions) in replacements.into_iter().rev() {
        decomposed.replace_instruction(index, instructions)?;
    }
    Ok(decomposed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qknit_gates::{CNot, CircuitExt, PauliX, PauliY, CZ};
    use std::sync::Arc;

    fn cut_cx_circuit() -> Circuit {
        let mut circuit = Circuit::new(2);
        circuit.h(0).unwrap();
        let gate = TwoQubitQpdGate::new(QpdBasis::from_gate(&CNot).unwrap()).unwrap();
        circuit
            .add_gate(Arc::new(gate), &[QubitId::new(0), QubitId::new(1)])
            .unwrap();
        circuit.x(1).unwrap();
        circuit
    }

    #[test]
    fn test_measuring_map_adds_clbits() {
        let decomposed = decompose_qpd_instructions(&cut_cx_circuit(), &[vec![1]], &[2]).unwrap();

        let register = decomposed.register(QPD_MEASUREMENTS).unwrap();
        assert_eq!(register.size(), 1);
        let names: Vec<&str> = decomposed.instructions().map(|i| i.name()).collect();
        // qubit 0: measure, rz; qubit 1: h, s, rz, h
        assert_eq!(names, vec!["h", "measure", "rz", "h", "s", "rz", "h", "x"]);
        let measure = decomposed.instruction(1).unwrap();
        assert_eq!(measure.qubits(), &[QubitId::new(0)]);
        assert_eq!(measure.clbits(), &[ClbitId::new(0)]);
    }

    #[test]
    fn test_identity_map_keeps_empty_register() {
        let decomposed = decompose_qpd_instructions(&cut_cx_circuit(), &[vec![1]], &[0]).unwrap();
        assert_eq!(decomposed.register(QPD_MEASUREMENTS).unwrap().size(), 0);
        let names: Vec<&str> = decomposed.instructions().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "rz", "h", "rz", "h", "x"]);
    }

    #[test]
    fn test_separated_halves_share_one_map() {
        let basis = QpdBasis::from_gate(&CZ).unwrap();
        let mut circuit = Circuit::new(2);
        let [left, right] = TwoQubitQpdGate::new(basis).unwrap().split("cut_cz_0");
        circuit.add_gate(Arc::new(right), &[QubitId::new(1)]).unwrap();
        circuit.add_gate(Arc::new(left), &[QubitId::new(0)]).unwrap();

        let decomposed = decompose_qpd_instructions(&circuit, &[vec![1, 0]], &[4]).unwrap();
        // map 4 measures qubit 1, which comes first in the circuit
        let first = decomposed.instruction(0).unwrap();
        assert!(first.is_measure());
        assert_eq!(first.qubits(), &[QubitId::new(1)]);
        assert_eq!(decomposed.register(QPD_MEASUREMENTS).unwrap().size(), 1);
    }

    #[test]
    fn test_validation_errors() {
        let circuit = cut_cx_circuit();
        assert_eq!(
            decompose_qpd_instructions(&circuit, &[vec![1]], &[]).unwrap_err(),
            CuttingError::MapIdCountMismatch {
                map_ids: 0,
                decompositions: 1
            }
        );
        assert_eq!(
            decompose_qpd_instructions(&circuit, &[vec![0]], &[0]).unwrap_err(),
            CuttingError::NotQpdGate {
                index: 0,
                name: "h".into()
            }
        );
        assert_eq!(
            decompose_qpd_instructions(&circuit, &[vec![1]], &[6]).unwrap_err(),
            CuttingError::MapIdOutOfRange { map_id: 6, num_maps: 6 }
        );

        let x = || vec![Operation::gate(PauliX)];
        let y = || vec![Operation::gate(PauliY)];
        let mut mixed = Circuit::new(2);
        let a = SingleQubitQpdGate::new(QpdBasis::new(vec![vec![x(), x()]], vec![1.0]).unwrap(), 0).unwrap();
        let b = SingleQubitQpdGate::new(QpdBasis::new(vec![vec![y(), y()]], vec![1.0]).unwrap(), 1).unwrap();
        mixed.add_gate(Arc::new(a), &[QubitId::new(0)]).unwrap();
        mixed.add_gate(Arc::new(b), &[QubitId::new(1)]).unwrap();
        assert_eq!(
            decompose_qpd_instructions(&mixed, &[vec![0, 1]], &[0]).unwrap_err(),
            CuttingError::BasisMismatch
        );
    }

    #[test]
    fn test_repeated_index_needs_one_map_id() {
        let circuit = cut_cx_circuit();
        assert_eq!(
            decompose_qpd_instructions(&circuit, &[vec![1], vec![1]], &[4, 2]).unwrap_err(),
            CuttingError::ConflictingMapIds {
                index: 1,
                first: 2,
                second: 4
            }
        );

        // the same map listed twice is expanded once
        let repeated = decompose_qpd_instructions(&circuit, &[vec![1], vec![1]], &[2, 2]).unwrap();
        let once = decompose_qpd_instructions(&circuit, &[vec![1]], &[2]).unwrap();
        assert_eq!(repeated, once);
    }
}
