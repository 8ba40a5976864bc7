//! Gate trait, circuit operations and instructions

use crate::{ClbitId, QuantumError, QubitId, Result};
use num_complex::Complex64;
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Trait for quantum gate operations
///
/// All quantum gates must implement this trait. Gates are stateless
/// and reusable across multiple circuits.
///
/// # Example
/// ```
/// use qknit_core::Gate;
/// use std::any::Any;
///
/// #[derive(Debug)]
/// struct HadamardGate;
///
/// impl Gate for HadamardGate {
///     fn name(&self) -> &str { "h" }
///     fn num_qubits(&self) -> usize { 1 }
///     fn as_any(&self) -> &dyn Any { self }
/// }
/// ```
pub trait Gate: Send + Sync + fmt::Debug {
    /// The name of the gate (e.g., "h", "cx", "rzz")
    fn name(&self) -> &str;

    /// Number of qubits this gate acts on
    fn num_qubits(&self) -> usize;

    /// Real parameters of the gate (rotation angles)
    fn params(&self) -> Vec<f64> {
        Vec::new()
    }

    /// Whether this gate is a unitary operation
    ///
    /// Most gates are unitary. Quasiprobability placeholders are not.
    fn is_unitary(&self) -> bool {
        true
    }

    /// Whether this gate is hermitian (self-adjoint)
    fn is_hermitian(&self) -> bool {
        false
    }

    /// Get a description of this gate
    fn description(&self) -> String {
        format!("{}-qubit gate '{}'", self.num_qubits(), self.name())
    }

    /// Get the unitary matrix for this gate as a flattened vector
    ///
    /// The matrix is stored in row-major order. For a gate applied to
    /// qubits `[a, b]`, the local basis index is `2·a + b`, i.e. the first
    /// qubit argument is the most significant bit.
    ///
    /// Returns `None` for gates that don't have a matrix representation.
    fn matrix(&self) -> Option<Vec<Complex64>> {
        None
    }

    /// Access the concrete gate type for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// An operation that can be placed in a circuit
#[derive(Clone)]
pub enum Operation {
    /// A gate acting on qubits
    Gate(Arc<dyn Gate>),
    /// Computational-basis measurement of one qubit into one classical bit
    Measure,
    /// Reset of one qubit to |0⟩
    Reset,
    /// Scheduling barrier over the given number of qubits
    Barrier(usize),
}

impl Operation {
    /// Wrap a gate
    pub fn gate<G: Gate + 'static>(gate: G) -> Self {
        Operation::Gate(Arc::new(gate))
    }

    /// Name of the operation
    pub fn name(&self) -> &str {
        match self {
            Operation::Gate(gate) => gate.name(),
            Operation::Measure => "measure",
            Operation::Reset => "reset",
            Operation::Barrier(_) => "barrier",
        }
    }

    /// Number of qubits the operation acts on
    pub fn num_qubits(&self) -> usize {
        match self {
            Operation::Gate(gate) => gate.num_qubits(),
            Operation::Measure | Operation::Reset => 1,
            Operation::Barrier(n) => *n,
        }
    }

    /// Number of classical bits the operation writes
    pub fn num_clbits(&self) -> usize {
        match self {
            Operation::Measure => 1,
            _ => 0,
        }
    }

    /// Gate parameters, empty for non-gate operations
    pub fn params(&self) -> Vec<f64> {
        match self {
            Operation::Gate(gate) => gate.params(),
            _ => Vec::new(),
        }
    }

    /// The gate, if this operation is one
    pub fn as_gate(&self) -> Option<&Arc<dyn Gate>> {
        match self {
            Operation::Gate(gate) => Some(gate),
            _ => None,
        }
    }

    /// Downcast the wrapped gate to a concrete type
    pub fn downcast_gate<T: Gate + 'static>(&self) -> Option<&T> {
        let gate: &dyn Gate = self.as_gate()?.as_ref();
        gate.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        let params = self.params();
        if !params.is_empty() {
            write!(f, "(")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:.4}", p)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Operation::Gate(a), Operation::Gate(b)) => {
                a.name() == b.name() && a.num_qubits() == b.num_qubits() && a.params() == b.params()
            }
            (Operation::Measure, Operation::Measure) | (Operation::Reset, Operation::Reset) => true,
            (Operation::Barrier(a), Operation::Barrier(b)) => a == b,
            _ => false,
        }
    }
}

/// An operation applied to specific qubits and classical bits
///
/// # Example
/// ```
/// use qknit_core::{ClbitId, Instruction, Operation, QubitId};
///
/// let inst = Instruction::new(Operation::Measure, &[QubitId::new(0)], &[ClbitId::new(0)]).unwrap();
/// assert_eq!(inst.name(), "measure");
/// ```
#[derive(Clone, PartialEq)]
pub struct Instruction {
    operation: Operation,
    qubits: SmallVec<[QubitId; 2]>, // Most operations are 1-2 qubits
    clbits: SmallVec<[ClbitId; 1]>,
}

impl Instruction {
    /// Create a new instruction
    ///
    /// # Errors
    /// Returns error if:
    /// - Qubit count doesn't match the operation's arity
    /// - Classical bit count doesn't match
    /// - Duplicate qubits specified
    pub fn new(operation: Operation, qubits: &[QubitId], clbits: &[ClbitId]) -> Result<Self> {
        if qubits.len() != operation.num_qubits() {
            return Err(QuantumError::invalid_qubit_count(
                operation.name(),
                operation.num_qubits(),
                qubits.len(),
            ));
        }

        if clbits.len() != operation.num_clbits() {
            return Err(QuantumError::InvalidClbitCount {
                operation: operation.name().to_string(),
                expected: operation.num_clbits(),
                actual: clbits.len(),
            });
        }

        for i in 0..qubits.len() {
            for j in (i + 1)..qubits.len() {
                if qubits[i] == qubits[j] {
                    return Err(QuantumError::DuplicateQubit(qubits[i]));
                }
            }
        }

        Ok(Self {
            operation,
            qubits: SmallVec::from_slice(qubits),
            clbits: SmallVec::from_slice(clbits),
        })
    }

    /// Create a gate instruction
    pub fn from_gate(gate: Arc<dyn Gate>, qubits: &[QubitId]) -> Result<Self> {
        Self::new(Operation::Gate(gate), qubits, &[])
    }

    /// Get the operation
    #[inline]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Get the gate, if this instruction applies one
    #[inline]
    pub fn gate(&self) -> Option<&Arc<dyn Gate>> {
        self.operation.as_gate()
    }

    /// Name of the underlying operation
    #[inline]
    pub fn name(&self) -> &str {
        self.operation.name()
    }

    /// Get the qubits this instruction acts on
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Get the classical bits this instruction writes
    #[inline]
    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Downcast the instruction's gate to a concrete type
    pub fn downcast_gate<T: Gate + 'static>(&self) -> Option<&T> {
        self.operation.downcast_gate::<T>()
    }

    /// Whether the instruction is a measurement
    #[inline]
    pub fn is_measure(&self) -> bool {
        matches!(self.operation, Operation::Measure)
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(", self.operation)?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        if !self.clbits.is_empty() {
            write!(f, " -> ")?;
            for (i, c) in self.clbits.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", c)?;
            }
        }
        write!(f, ")")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
