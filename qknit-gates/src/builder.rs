//! Fluent gate-application methods for [`Circuit`]

use crate::standard::*;
use qknit_core::{Circuit, Gate, QubitId, Result};
use std::sync::Arc;

/// Extension trait adding named gate methods to [`Circuit`]
///
/// Every method validates its qubits and returns the circuit for chaining.
///
/// # Example
/// ```
/// use qknit_core::Circuit;
/// use qknit_gates::CircuitExt;
///
/// let mut bell = Circuit::new(2);
/// bell.h(0).unwrap().cx(0, 1).unwrap();
/// assert_eq!(bell.len(), 2);
/// ```
pub trait CircuitExt {
    /// Apply an arbitrary gate to the given qubit indices
    fn apply<G: Gate + 'static>(&mut self, gate: G, qubits: &[usize]) -> Result<&mut Self>;

    fn h(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(Hadamard, &[qubit])
    }

    fn x(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(PauliX, &[qubit])
    }

    fn y(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(PauliY, &[qubit])
    }

    fn z(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(PauliZ, &[qubit])
    }

    fn s(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(SGate, &[qubit])
    }

    fn sdg(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(SGateDagger, &[qubit])
    }

    fn t(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(TGate, &[qubit])
    }

    fn tdg(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(TGateDagger, &[qubit])
    }

    fn sx(&mut self, qubit: usize) -> Result<&mut Self> {
        self.apply(SXGate, &[qubit])
    }

    fn rx(&mut self, theta: f64, qubit: usize) -> Result<&mut Self> {
        self.apply(RotationX::new(theta), &[qubit])
    }

    fn ry(&mut self, theta: f64, qubit: usize) -> Result<&mut Self> {
        self.apply(RotationY::new(theta), &[qubit])
    }

    fn rz(&mut self, theta: f64, qubit: usize) -> Result<&mut Self> {
        self.apply(RotationZ::new(theta), &[qubit])
    }

    fn p(&mut self, lambda: f64, qubit: usize) -> Result<&mut Self> {
        self.apply(Phase::new(lambda), &[qubit])
    }

    fn cx(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(CNot, &[control, target])
    }

    fn cy(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(CY, &[control, target])
    }

    fn cz(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(CZ, &[control, target])
    }

    fn ch(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(CH, &[control, target])
    }

    fn cp(&mut self, lambda: f64, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(CPhase::new(lambda), &[control, target])
    }

    fn crx(&mut self, theta: f64, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(CRX::new(theta), &[control, target])
    }

    fn cry(&mut self, theta: f64, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(CRY::new(theta), &[control, target])
    }

    fn crz(&mut self, theta: f64, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(CRZ::new(theta), &[control, target])
    }

    fn rxx(&mut self, theta: f64, a: usize, b: usize) -> Result<&mut Self> {
        self.apply(RXX::new(theta), &[a, b])
    }

    fn ryy(&mut self, theta: f64, a: usize, b: usize) -> Result<&mut Self> {
        self.apply(RYY::new(theta), &[a, b])
    }

    fn rzz(&mut self, theta: f64, a: usize, b: usize) -> Result<&mut Self> {
        self.apply(RZZ::new(theta), &[a, b])
    }

    fn swap(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.apply(Swap, &[a, b])
    }
}

impl CircuitExt for Circuit {
    fn apply<G: Gate + 'static>(&mut self, gate: G, qubits: &[usize]) -> Result<&mut Self> {
        let qubits: Vec<QubitId> = qubits.iter().copied().map(QubitId::new).collect();
        self.add_gate(Arc::new(gate), &qubits)?;
        Ok(self)
    }
}
