//! Quantum states and Pauli algebra for qknit
//!
//! This crate provides a dense statevector with the projective operations
//! needed for exact branching simulation, and Pauli strings for observables.
//!
//! # Example
//!
//! ```
//! use qknit_state::{DenseState, PauliString};
//! use num_complex::Complex64;
//!
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let zero = Complex64::new(0.0, 0.0);
//! let bell = DenseState::from_amplitudes(2, &[Complex64::new(h, 0.0), zero, zero, Complex64::new(h, 0.0)]).unwrap();
//!
//! let zz: PauliString = "ZZ".parse().unwrap();
//! assert!((zz.expectation_value(&bell).unwrap() - 1.0).abs() < 1e-12);
//! ```

pub mod dense_state;
pub mod error;
pub mod observable;

pub use dense_state::DenseState;
pub use error::{Result, StateError};
pub use observable::{Pauli, PauliList, PauliString};
