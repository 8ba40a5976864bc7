//! Quantum circuit representation

use crate::gate::{Gate, Instruction, Operation};
use crate::{ClbitId, QuantumError, QubitId, Result};
use std::sync::Arc;

/// A block of classical bits within a circuit
///
/// Bits of all registers form one contiguous index space in the order the
/// registers were added. Loose bits added with [`Circuit::add_clbits`] form
/// an unnamed register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassicalRegister {
    name: Option<String>,
    start: usize,
    size: usize,
}

impl ClassicalRegister {
    /// Register name, `None` for loose bits
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Index of the register's first bit in the circuit
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of bits in the register
    pub fn size(&self) -> usize {
        self.size
    }

    /// Identifier of the register's `i`-th bit
    pub fn bit(&self, i: usize) -> Option<ClbitId> {
        (i < self.size).then(|| ClbitId::new(self.start + i))
    }
}

/// A quantum circuit
///
/// Contains a sequence of instructions applied to qubits and classical bits.
///
/// # Example
/// ```
/// use qknit_core::Circuit;
///
/// let circuit = Circuit::new(3);
/// assert_eq!(circuit.num_qubits(), 3);
/// assert_eq!(circuit.len(), 0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    registers: Vec<ClassicalRegister>,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new quantum circuit with the specified number of qubits
    ///
    /// # Panics
    /// Panics if `num_qubits` is 0
    pub fn new(num_qubits: usize) -> Self {
        assert!(num_qubits > 0, "Circuit must have at least one qubit");
        Self {
            num_qubits,
            registers: Vec::new(),
            instructions: Vec::new(),
        }
    }

    /// Create a circuit with pre-allocated capacity
    pub fn with_capacity(num_qubits: usize, capacity: usize) -> Self {
        assert!(num_qubits > 0, "Circuit must have at least one qubit");
        Self {
            num_qubits,
            registers: Vec::new(),
            instructions: Vec::with_capacity(capacity),
        }
    }

    /// Create an empty circuit with the same qubits and classical registers
    pub fn copy_empty_like(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            registers: self.registers.clone(),
            instructions: Vec::new(),
        }
    }

    /// Get the number of qubits in the circuit
    #[inline]
    pub const fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the total number of classical bits across all registers
    pub fn num_clbits(&self) -> usize {
        self.registers.iter().map(|r| r.size).sum()
    }

    /// Whether the circuit declares any classical register or bit
    pub fn has_classical_bits(&self) -> bool {
        !self.registers.is_empty()
    }

    /// Classical registers in declaration order
    pub fn registers(&self) -> &[ClassicalRegister] {
        &self.registers
    }

    /// Look up a register by name
    pub fn register(&self, name: &str) -> Option<&ClassicalRegister> {
        self.registers.iter().find(|r| r.name() == Some(name))
    }

    /// Add a named classical register and return it
    ///
    /// # Errors
    /// Returns error if a register with the same name exists
    pub fn add_register(&mut self, name: impl Into<String>, size: usize) -> Result<ClassicalRegister> {
        let name = name.into();
        if self.register(&name).is_some() {
            return Err(QuantumError::DuplicateRegister(name));
        }
        let register = ClassicalRegister {
            name: Some(name),
            start: self.num_clbits(),
            size,
        };
        self.registers.push(register.clone());
        Ok(register)
    }

    /// Add loose classical bits that belong to no named register
    pub fn add_clbits(&mut self, count: usize) -> ClassicalRegister {
        let register = ClassicalRegister {
            name: None,
            start: self.num_clbits(),
            size: count,
        };
        self.registers.push(register.clone());
        register
    }

    /// Get the number of instructions in the circuit
    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the circuit is empty (no instructions)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    fn check_bounds(&self, inst: &Instruction) -> Result<()> {
        for &qubit in inst.qubits() {
            if qubit.index() >= self.num_qubits {
                return Err(QuantumError::invalid_qubit(qubit.index(), self.num_qubits));
            }
        }
        let num_clbits = self.num_clbits();
        for &clbit in inst.clbits() {
            if clbit.index() >= num_clbits {
                return Err(QuantumError::InvalidClbit(clbit.index(), num_clbits));
            }
        }
        Ok(())
    }

    /// Append an instruction
    ///
    /// # Errors
    /// Returns error if any qubit or clbit index is out of bounds
    pub fn append(&mut self, instruction: Instruction) -> Result<()> {
        self.check_bounds(&instruction)?;
        self.instructions.push(instruction);
        Ok(())
    }

    /// Append an operation on the given qubits and classical bits
    pub fn append_operation(
        &mut self,
        operation: Operation,
        qubits: &[QubitId],
        clbits: &[ClbitId],
    ) -> Result<()> {
        self.append(Instruction::new(operation, qubits, clbits)?)
    }

    /// Add a gate operation to the circuit
    ///
    /// # Errors
    /// Returns error if any qubit index is out of bounds
    pub fn add_gate(&mut self, gate: Arc<dyn Gate>, qubits: &[QubitId]) -> Result<()> {
        self.append(Instruction::from_gate(gate, qubits)?)
    }

    /// Measure `qubit` into `clbit`
    pub fn measure(&mut self, qubit: usize, clbit: usize) -> Result<()> {
        self.append_operation(
            Operation::Measure,
            &[QubitId::new(qubit)],
            &[ClbitId::new(clbit)],
        )
    }

    /// Reset `qubit` to |0⟩
    pub fn reset(&mut self, qubit: usize) -> Result<()> {
        self.append_operation(Operation::Reset, &[QubitId::new(qubit)], &[])
    }

    /// Insert a barrier across `qubits`
    pub fn barrier(&mut self, qubits: &[usize]) -> Result<()> {
        let qubits: Vec<QubitId> = qubits.iter().copied().map(QubitId::new).collect();
        self.append_operation(Operation::Barrier(qubits.len()), &qubits, &[])
    }

    /// Get an iterator over the instructions
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Get a specific instruction by index
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Overwrite the instruction at `index`
    pub fn set_instruction(&mut self, index: usize, instruction: Instruction) -> Result<()> {
        if index >= self.instructions.len() {
            return Err(QuantumError::InvalidInstruction(index, self.instructions.len()));
        }
        self.check_bounds(&instruction)?;
        self.instructions[index] = instruction;
        Ok(())
    }

    /// Replace the instruction at `index` with a sequence of instructions
    ///
    /// Indices of later instructions shift by `replacement.len() - 1`.
    pub fn replace_instruction(&mut self, index: usize, replacement: Vec<Instruction>) -> Result<()> {
        if index >= self.instructions.len() {
            return Err(QuantumError::InvalidInstruction(index, self.instructions.len()));
        }
        for inst in &replacement {
            self.check_bounds(inst)?;
        }
        self.instructions.splice(index..=index, replacement);
        Ok(())
    }

    /// Insert instructions before position `index` (`index == len()` appends)
    pub fn insert_instructions(&mut self, index: usize, instructions: Vec<Instruction>) -> Result<()> {
        if index > self.instructions.len() {
            return Err(QuantumError::InvalidInstruction(index, self.instructions.len()));
        }
        for inst in &instructions {
            self.check_bounds(inst)?;
        }
        self.instructions.splice(index..index, instructions);
        Ok(())
    }

    /// Clear all instructions from the circuit
    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    /// Get the depth of the circuit (longest path through instructions)
    ///
    /// Barriers synchronise their qubits but do not add a layer.
    pub fn depth(&self) -> usize {
        let mut qubit_depth = vec![0usize; self.num_qubits];
        let mut clbit_depth = vec![0usize; self.num_clbits()];

        for inst in &self.instructions {
            let start = inst
                .qubits()
                .iter()
                .map(|q| qubit_depth[q.index()])
                .chain(inst.clbits().iter().map(|c| clbit_depth[c.index()]))
                .max()
                .unwrap_or(0);
            let end = if matches!(inst.operation(), Operation::Barrier(_)) {
                start
            } else {
                start + 1
            };
            for q in inst.qubits() {
                qubit_depth[q.index()] = end;
            }
            for c in inst.clbits() {
                clbit_depth[c.index()] = end;
            }
        }

        qubit_depth.into_iter().chain(clbit_depth).max().unwrap_or(0)
    }

    /// Validate the circuit
    ///
    /// Checks that all instructions are valid for this circuit.
    pub fn validate(&self) -> Result<()> {
        for (i, inst) in self.instructions.iter().enumerate() {
            self.check_bounds(inst).map_err(|e| {
                QuantumError::ValidationError(format!("Instruction {} is invalid: {}", i, e))
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} clbits, {} operations)",
            self.num_qubits,
            self.num_clbits(),
            self.len()
        )?;
        for (i, inst) in self.instructions.iter().enumerate() {
            writeln!(f, "  {}: {}", i, inst)?;
        }
        Ok(())
    }
}
