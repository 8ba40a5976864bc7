//! Quasiprobability decomposition of two-qubit gates
//!
//! - [`QpdBasis`]: a gate written as a signed mixture of local operations
//! - [`TwoQubitQpdGate`] / [`SingleQubitQpdGate`]: circuit placeholders for
//!   a cut gate and for each of its halves
//! - [`generate_qpd_weights`]: which map combinations to run
//! - [`decompose_qpd_instructions`]: substitute one map combination

pub mod basis;
pub mod decompose;
pub mod gates;
pub mod weights;

pub use basis::{QpdBasis, QpdMap};
pub use decompose::{decompose_qpd_instructions, QPD_MEASUREMENTS};
pub use gates::{qpd_basis, SingleQubitQpdGate, TwoQubitQpdGate};
pub use weights::{generate_qpd_samples, generate_qpd_weights, QpdWeight, WeightType};
