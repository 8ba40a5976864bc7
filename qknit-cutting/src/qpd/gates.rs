//! Placeholder gates marking where a cut gate sits in a circuit

use super::basis::{QpdBasis, QpdMap};
use crate::error::{CuttingError, Result};
use qknit_core::{Gate, Instruction, Operation};
use std::any::Any;

fn check_basis_id(basis: &QpdBasis, basis_id: usize) -> Result<()> {
    if basis_id >= basis.len() {
        return Err(CuttingError::MapIdOutOfRange {
            map_id: basis_id,
            num_maps: basis.len(),
        });
    }
    Ok(())
}

/// A two-qubit gate replaced by its quasiprobability decomposition
///
/// # Example
/// ```
/// use qknit_cutting::{QpdBasis, TwoQubitQpdGate};
/// use qknit_gates::CNot;
///
/// let gate = TwoQubitQpdGate::new(QpdBasis::from_gate(&CNot).unwrap())
///     .unwrap()
///     .with_label("cut_cx");
/// assert_eq!(gate.label(), Some("cut_cx"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TwoQubitQpdGate {
    basis: QpdBasis,
    label: Option<String>,
    basis_id: Option<usize>,
}

impl TwoQubitQpdGate {
    /// Wrap a basis acting on two qubits
    pub fn new(basis: QpdBasis) -> Result<Self> {
        if basis.num_qubits() != 2 {
            return Err(CuttingError::InvalidBasis(format!(
                "TwoQubitQpdGate needs a two-qubit basis, got {} qubit(s)",
                basis.num_qubits()
            )));
        }
        Ok(Self {
            basis,
            label: None,
            basis_id: None,
        })
    }

    /// Decompose the gate of `instruction`, labelled `cut_<gate name>`
    pub fn from_instruction(instruction: &Instruction) -> Result<Self> {
        let basis = QpdBasis::from_instruction(instruction)?;
        Ok(Self::new(basis)?.with_label(format!("cut_{}", instruction.name())))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Fix the map this gate stands for
    pub fn with_basis_id(mut self, basis_id: usize) -> Result<Self> {
        check_basis_id(&self.basis, basis_id)?;
        self.basis_id = Some(basis_id);
        Ok(self)
    }

    pub fn basis(&self) -> &QpdBasis {
        &self.basis
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn basis_id(&self) -> Option<usize> {
        self.basis_id
    }

    /// Operation sequences of the selected map, one per qubit
    pub fn definition(&self) -> Option<&QpdMap> {
        self.basis.maps().get(self.basis_id?)
    }

    /// Split into the halves acting on each qubit
    pub fn split(&self, label: &str) -> [SingleQubitQpdGate; 2] {
        [0, 1].map(|qubit_id| SingleQubitQpdGate {
            basis: self.basis.clone(),
            qubit_id,
            label: Some(label.to_string()),
            basis_id: self.basis_id,
        })
    }
}

impl Gate for TwoQubitQpdGate {
    fn name(&self) -> &str {
        "qpd_2q"
    }

    fn num_qubits(&self) -> usize {
        2
    }

    fn is_unitary(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One qubit's half of a cut gate
#[derive(Clone, Debug, PartialEq)]
pub struct SingleQubitQpdGate {
    basis: QpdBasis,
    qubit_id: usize,
    label: Option<String>,
    basis_id: Option<usize>,
}

impl SingleQubitQpdGate {
    /// Wrap qubit `qubit_id` of `basis`
    pub fn new(basis: QpdBasis, qubit_id: usize) -> Result<Self> {
        if qubit_id >= basis.num_qubits() {
            return Err(CuttingError::InvalidBasis(format!(
                "qubit_id {} is out of range for a {}-qubit basis",
                qubit_id,
                basis.num_qubits()
            )));
        }
        Ok(Self {
            basis,
            qubit_id,
            label: None,
            basis_id: None,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_basis_id(mut self, basis_id: usize) -> Result<Self> {
        check_basis_id(&self.basis, basis_id)?;
        self.basis_id = Some(basis_id);
        Ok(self)
    }

    pub fn basis(&self) -> &QpdBasis {
        &self.basis
    }

    pub fn qubit_id(&self) -> usize {
        self.qubit_id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn basis_id(&self) -> Option<usize> {
        self.basis_id
    }

    /// Operations of the selected map acting on this half's qubit
    pub fn definition(&self) -> Option<&[Operation]> {
        let map = self.basis.maps().get(self.basis_id?)?;
        Some(&map[self.qubit_id])
    }
}

impl Gate for SingleQubitQpdGate {
    fn name(&self) -> &str {
        "qpd_1q"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn is_unitary(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Basis of a QPD gate, `None` for every other operation
pub fn qpd_basis(operation: &Operation) -> Option<&QpdBasis> {
    if let Some(gate) = operation.downcast_gate::<TwoQubitQpdGate>() {
        return Some(gate.basis());
    }
    operation.downcast_gate::<SingleQubitQpdGate>().map(|g| g.basis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qknit_core::QubitId;
    use qknit_gates::{CNot, PauliX, Swap, CRZ};
    use std::f64::consts::FRAC_PI_2;
    use std::sync::Arc;

    fn x_basis() -> QpdBasis {
        let x = || vec![Operation::gate(PauliX)];
        QpdBasis::new(vec![vec![x(), x()]], vec![1.0]).unwrap()
    }

    #[test]
    fn test_from_instruction_labels_gate() {
        let inst = Instruction::from_gate(Arc::new(CRZ::new(0.3)), &[QubitId::new(0), QubitId::new(1)]).unwrap();
        let gate = TwoQubitQpdGate::from_instruction(&inst).unwrap();
        assert_eq!(gate.label(), Some("cut_crz"));
        assert_eq!(gate.name(), "qpd_2q");
        assert!(!gate.is_unitary());
        assert!(gate.matrix().is_none());

        let swap = Instruction::from_gate(Arc::new(Swap), &[QubitId::new(0), QubitId::new(1)]).unwrap();
        assert!(matches!(
            TwoQubitQpdGate::from_instruction(&swap),
            Err(CuttingError::UnsupportedGate { .. })
        ));
    }

    #[test]
    fn test_definition_follows_basis_id() {
        let gate = TwoQubitQpdGate::new(QpdBasis::from_gate(&CNot).unwrap()).unwrap();
        assert!(gate.definition().is_none());

        // CX map 2 measures the control, then applies the trailing RZ(π/2)
        let names = |ops: &[Operation]| ops.iter().map(|o| o.name().to_string()).collect::<Vec<_>>();
        let gate = gate.with_basis_id(2).unwrap();
        let map = gate.definition().unwrap();
        assert_eq!(map[0].len(), 2);
        assert_eq!(map[0][0], Operation::Measure);
        assert_eq!(names(&map[0]), vec!["measure", "rz"]);
        assert_eq!(map[0][1].params(), vec![FRAC_PI_2]);
        assert_eq!(names(&map[1]), vec!["h", "s", "rz", "h"]);

        assert!(matches!(
            gate.clone().with_basis_id(6),
            Err(CuttingError::MapIdOutOfRange { map_id: 6, num_maps: 6 })
        ));

        let [left, right] = gate.split("cut_cx_0");
        assert_eq!(left.definition().map(names), Some(vec!["measure".to_string(), "rz".to_string()]));
        assert_eq!(right.qubit_id(), 1);
        assert_eq!(right.label(), Some("cut_cx_0"));
    }

    #[test]
    fn test_single_qubit_gate_validates_qubit_id() {
        assert!(SingleQubitQpdGate::new(x_basis(), 1).is_ok());
        assert!(SingleQubitQpdGate::new(x_basis(), 2).is_err());
    }

    #[test]
    fn test_qpd_basis_lookup() {
        let two = Operation::gate(TwoQubitQpdGate::new(x_basis()).unwrap());
        let one = Operation::gate(SingleQubitQpdGate::new(x_basis(), 0).unwrap());
        assert_eq!(qpd_basis(&two), Some(&x_basis()));
        assert_eq!(qpd_basis(&one), Some(&x_basis()));
        assert_eq!(qpd_basis(&Operation::gate(PauliX)), None);
        assert_eq!(qpd_basis(&Operation::Measure), None);
    }
}
