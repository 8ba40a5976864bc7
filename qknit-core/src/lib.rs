//! Core types and traits for the qknit circuit knitting toolbox
//!
//! This crate provides the fundamental types for building quantum circuits:
//! - [`QubitId`] / [`ClbitId`]: Type-safe bit addressing
//! - [`Gate`]: Trait for quantum gates
//! - [`Instruction`]: An operation bound to qubits and classical bits
//! - [`Circuit`]: Quantum circuit container with classical registers
//!
//! # Example
//! ```
//! use qknit_core::Circuit;
//!
//! let mut circuit = Circuit::new(2);
//! circuit.add_register("c", 2).unwrap();
//! circuit.measure(0, 0).unwrap();
//! assert_eq!(circuit.num_clbits(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod qubit;

// Re-exports for convenience
pub use circuit::{Circuit, ClassicalRegister};
pub use error::QuantumError;
pub use gate::{Gate, Instruction, Operation};
pub use num_complex::Complex64;
pub use qubit::{ClbitId, QubitId};

/// Type alias for results in qknit
pub type Result<T> = std::result::Result<T, QuantumError>;
