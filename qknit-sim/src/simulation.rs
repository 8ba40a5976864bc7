//! Statevector simulation with exact branching over measurements
//!
//! Every mid-circuit measurement and reset splits a branch in two, one per
//! outcome, weighted by the outcome probability. Measurements with no later
//! operation on their qubit or clbit are deferred to the end and read off
//! the final amplitudes, so circuits that only measure at the end never
//! branch.

use crate::config::ExactSamplerConfig;
use crate::error::{Result, SimulatorError};
use crate::result::QuasiDistribution;
use ahash::AHashMap;
use num_complex::Complex64;
use qknit_core::{Circuit, Instruction, Operation};
use qknit_state::DenseState;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Outcome integers are `u64`
const MAX_CLBITS: usize = 64;

/// Compute the final statevector of a measurement-free circuit
///
/// # Errors
/// Returns error if the circuit contains a measurement or reset, or a gate
/// without a matrix
///
/// # Example
/// ```
/// use qknit_core::Circuit;
/// use qknit_gates::CircuitExt;
/// use qknit_sim::simulate_statevector;
///
/// let mut bell = Circuit::new(2);
/// bell.h(0).unwrap().cx(0, 1).unwrap();
/// let state = simulate_statevector(&bell).unwrap();
/// assert!((state.amplitudes()[3].re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// ```
pub fn simulate_statevector(circuit: &Circuit) -> Result<DenseState> {
    let mut state = DenseState::new(circuit.num_qubits())?;
    for (index, inst) in circuit.instructions().enumerate() {
        match inst.operation() {
            Operation::Gate(_) => {
                let matrix = gate_matrix(index, inst)?;
                state.apply_matrix(&matrix, &qubit_indices(inst))?;
            },
            Operation::Barrier(_) => {},
            Operation::Measure | Operation::Reset => {
                return Err(SimulatorError::InvalidCircuit(format!(
                    "instruction {} ({}) is not unitary; use a sampler for circuits with measurements or resets",
                    index,
                    inst.name()
                )));
            },
        }
    }
    Ok(state)
}

/// Whether every measurement is final on its qubit and clbit, with no resets
pub fn measurements_are_terminal(circuit: &Circuit) -> bool {
    let terminal = terminal_measurements(circuit);
    circuit
        .instructions()
        .enumerate()
        .all(|(i, inst)| match inst.operation() {
            Operation::Measure => terminal[i],
            Operation::Reset => false,
            _ => true,
        })
}

/// Exact outcome distribution of `circuit`
///
/// Branches whose probability falls below `config.probability_cutoff` are
/// pruned, so the returned weights may sum to slightly less than one.
pub fn exact_distribution(circuit: &Circuit, config: &ExactSamplerConfig) -> Result<QuasiDistribution> {
    if circuit.num_qubits() > config.max_qubits {
        return Err(SimulatorError::TooManyQubits {
            num_qubits: circuit.num_qubits(),
            max_qubits: config.max_qubits,
        });
    }
    if circuit.num_clbits() > MAX_CLBITS {
        return Err(SimulatorError::InvalidCircuit(format!(
            "{} classical bits exceed the supported maximum of {}",
            circuit.num_clbits(),
            MAX_CLBITS
        )));
    }

    let terminal = terminal_measurements(circuit);
    let mut deferred: Vec<(usize, usize)> = Vec::new();
    let mut branches = vec![Branch {
        state: DenseState::new(circuit.num_qubits())?,
        probability: 1.0,
        outcome: 0,
    }];

    for (index, inst) in circuit.instructions().enumerate() {
        match inst.operation() {
            Operation::Gate(_) => {
                let matrix = gate_matrix(index, inst)?;
                let qubits = qubit_indices(inst);
                branches
                    .par_iter_mut()
                    .try_for_each(|branch| branch.state.apply_matrix(&matrix, &qubits))?;
            },
            Operation::Barrier(_) => {},
            Operation::Measure if terminal[index] => {
                deferred.push((inst.qubits()[0].index(), inst.clbits()[0].index()));
            },
            Operation::Measure => {
                let qubit = inst.qubits()[0].index();
                let clbit = inst.clbits()[0].index();
                branches = split(branches, qubit, config.probability_cutoff, |branch, outcome| {
                    branch.set_bit(clbit, outcome);
                    Ok(())
                })?;
            },
            Operation::Reset => {
                let qubit = inst.qubits()[0].index();
                branches = split(branches, qubit, config.probability_cutoff, |branch, outcome| {
                    if outcome {
                        branch.state.reset_qubit(qubit)?;
                    }
                    Ok(())
                })?;
            },
        }
    }

    debug!(
        branches = branches.len(),
        deferred_measurements = deferred.len(),
        "branching simulation finished"
    );

    let mut accumulated: AHashMap<u64, f64> = AHashMap::new();
    for branch in &branches {
        if deferred.is_empty() {
            *accumulated.entry(branch.outcome).or_insert(0.0) += branch.probability;
            continue;
        }
        for (basis, amp) in branch.state.amplitudes().iter().enumerate() {
            let probability = branch.probability * amp.norm_sqr();
            if probability <= config.probability_cutoff {
                continue;
            }
            let mut outcome = branch.outcome;
            for &(qubit, clbit) in &deferred {
                let bit = ((basis >> qubit) & 1) as u64;
                outcome = (outcome & !(1 << clbit)) | (bit << clbit);
            }
            *accumulated.entry(outcome).or_insert(0.0) += probability;
        }
    }

    Ok(accumulated.into_iter().collect())
}

struct Branch {
    state: DenseState,
    probability: f64,
    outcome: u64,
}

impl Branch {
    fn set_bit(&mut self, clbit: usize, value: bool) {
        if value {
            self.outcome |= 1 << clbit;
        } else {
            self.outcome &= !(1 << clbit);
        }
    }
}

/// Split every branch on the Z-basis outcome of `qubit`
fn split<F>(branches: Vec<Branch>, qubit: usize, cutoff: f64, on_outcome: F) -> Result<Vec<Branch>>
where
    F: Fn(&mut Branch, bool) -> Result<()> + Sync,
{
    let before = branches.len();
    let nested: Vec<Vec<Branch>> = branches
        .into_par_iter()
        .map(|branch| -> Result<Vec<Branch>> {
            let p_one = branch.state.probability_of_one(qubit)?;
            let mut children = Vec::with_capacity(2);
            for (outcome, p) in [(false, 1.0 - p_one), (true, p_one)] {
                let probability = branch.probability * p;
                if probability <= cutoff {
                    continue;
                }
                let mut child = Branch {
                    state: branch.state.clone(),
                    probability,
                    outcome: branch.outcome,
                };
                child.state.project(qubit, outcome)?;
                on_outcome(&mut child, outcome)?;
                children.push(child);
            }
            Ok(children)
        })
        .collect::<Result<_>>()?;

    let branches: Vec<Branch> = nested.into_iter().flatten().collect();
    trace!(qubit, before, after = branches.len(), "split branches");
    Ok(branches)
}

/// For each instruction, whether it is a measurement that nothing later
/// depends on
fn terminal_measurements(circuit: &Circuit) -> Vec<bool> {
    let mut qubit_used = vec![false; circuit.num_qubits()];
    let mut clbit_used = vec![false; circuit.num_clbits()];
    let instructions: Vec<&Instruction> = circuit.instructions().collect();
    let mut terminal = vec![false; instructions.len()];

    for (i, inst) in instructions.iter().enumerate().rev() {
        if matches!(inst.operation(), Operation::Barrier(_)) {
            continue;
        }
        if inst.is_measure() {
            let q = inst.qubits()[0].index();
            let c = inst.clbits()[0].index();
            terminal[i] = !qubit_used[q] && !clbit_used[c];
        }
        for q in inst.qubits() {
            qubit_used[q.index()] = true;
        }
        for c in inst.clbits() {
            clbit_used[c.index()] = true;
        }
    }
    terminal
}

fn gate_matrix(index: usize, inst: &Instruction) -> Result<Vec<Complex64>> {
    inst.gate()
        .and_then(|gate| gate.matrix())
        .ok_or_else(|| SimulatorError::UnsupportedOperation {
            instruction_index: index,
            name: inst.name().to_string(),
        })
}

fn qubit_indices(inst: &Instruction) -> Vec<usize> {
    inst.qubits().iter().map(|q| q.index()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qknit_gates::CircuitExt;

    fn exact(circuit: &Circuit) -> QuasiDistribution {
        exact_distribution(circuit, &ExactSamplerConfig::default()).unwrap()
    }

    #[test]
    fn test_bell_terminal_measurements() {
        let mut circuit = Circuit::new(2);
        circuit.add_register("c", 2).unwrap();
        circuit.h(0).unwrap().cx(0, 1).unwrap();
        circuit.measure(0, 0).unwrap();
        circuit.measure(1, 1).unwrap();

        assert!(measurements_are_terminal(&circuit));
        let dist = exact(&circuit);
        assert_eq!(dist.len(), 2);
        assert_relative_eq!(dist.get(0b00), 0.5, epsilon = 1e-12);
        assert_relative_eq!(dist.get(0b11), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_clbit_order_follows_measure_target() {
        // qubit 0 flipped, measured into clbit 1
        let mut circuit = Circuit::new(2);
        circuit.add_register("c", 2).unwrap();
        circuit.x(0).unwrap();
        circuit.measure(0, 1).unwrap();
        circuit.measure(1, 0).unwrap();

        let dist = exact(&circuit);
        assert_relative_eq!(dist.get(0b10), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mid_circuit_measurement_collapses() {
        // H, measure, H: the measurement destroys the interference
        let mut circuit = Circuit::new(1);
        circuit.add_register("c", 2).unwrap();
        circuit.h(0).unwrap();
        circuit.measure(0, 0).unwrap();
        circuit.h(0).unwrap();
        circuit.measure(0, 1).unwrap();

        assert!(!measurements_are_terminal(&circuit));
        let dist = exact(&circuit);
        for outcome in 0..4 {
            assert_relative_eq!(dist.get(outcome), 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_remeasuring_same_clbit_keeps_last_value() {
        let mut circuit = Circuit::new(1);
        circuit.add_register("c", 1).unwrap();
        circuit.measure(0, 0).unwrap();
        circuit.x(0).unwrap();
        circuit.measure(0, 0).unwrap();

        let dist = exact(&circuit);
        assert_relative_eq!(dist.get(1), 1.0, epsilon = 1e-12);
        assert_eq!(dist.len(), 1);
    }

    #[test]
    fn test_reset_returns_qubit_to_zero() {
        let mut circuit = Circuit::new(2);
        circuit.add_register("c", 2).unwrap();
        circuit.h(0).unwrap().cx(0, 1).unwrap();
        circuit.reset(0).unwrap();
        circuit.measure(0, 0).unwrap();
        circuit.measure(1, 1).unwrap();

        let dist = exact(&circuit);
        assert_relative_eq!(dist.get(0b00), 0.5, epsilon = 1e-12);
        assert_relative_eq!(dist.get(0b10), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_no_classical_bits_gives_single_outcome() {
        let mut circuit = Circuit::new(1);
        circuit.h(0).unwrap();
        let dist = exact(&circuit);
        assert_eq!(dist.len(), 1);
        assert_relative_eq!(dist.get(0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_statevector_rejects_measurement() {
        let mut circuit = Circuit::new(1);
        circuit.add_register("c", 1).unwrap();
        circuit.measure(0, 0).unwrap();
        assert!(matches!(
            simulate_statevector(&circuit),
            Err(SimulatorError::InvalidCircuit(_))
        ));
    }

    #[test]
    fn test_qubit_limit() {
        let circuit = Circuit::new(3);
        let config = ExactSamplerConfig::new().with_max_qubits(2);
        assert!(matches!(
            exact_distribution(&circuit, &config),
            Err(SimulatorError::TooManyQubits { num_qubits: 3, max_qubits: 2 })
        ));
    }
}
