//! Quantum gate library for qknit
//!
//! This crate provides standard quantum gate implementations with
//! pre-computed matrices, and a [`CircuitExt`] trait with named methods
//! (`h`, `cx`, `rzz`, ...) for building circuits.
//!
//! # Example
//!
//! ```
//! use qknit_core::Circuit;
//! use qknit_gates::standard::{CNot, Hadamard, RotationX};
//! use qknit_gates::CircuitExt;
//! use std::f64::consts::PI;
//!
//! // Access pre-computed gate matrices
//! let h_matrix = Hadamard::matrix();
//! let cnot_matrix = CNot::matrix();
//! let rx_matrix = RotationX::new(PI / 2.0).matrix();
//!
//! let mut circuit = Circuit::new(2);
//! circuit.h(0).unwrap().cx(0, 1).unwrap();
//! ```

pub mod builder;
pub mod matrices;
pub mod standard;

// Re-export commonly used items
pub use builder::CircuitExt;
pub use standard::*;
