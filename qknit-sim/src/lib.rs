//! Circuit samplers for qknit
//!
//! This crate runs circuits on a dense statevector and returns outcome
//! distributions. Mid-circuit measurements and resets are simulated by
//! exact branching, which is what subexperiments produced by gate cutting
//! need.
//!
//! # Samplers
//!
//! - [`ExactSampler`]: exact probabilities, any measurement placement
//! - [`ShotSampler`]: finite-shot estimates from a seeded generator
//! - [`StatevectorSampler`]: exact probabilities, terminal measurements only
//!
//! # Example
//!
//! ```
//! use qknit_core::Circuit;
//! use qknit_gates::CircuitExt;
//! use qknit_sim::{ExactSampler, Sampler};
//!
//! let mut bell = Circuit::new(2);
//! bell.add_register("c", 2).unwrap();
//! bell.h(0).unwrap().cx(0, 1).unwrap();
//! bell.measure(0, 0).unwrap();
//! bell.measure(1, 1).unwrap();
//!
//! let dists = ExactSampler::new().run(&[bell]).unwrap();
//! assert!((dists[0].get(0b11) - 0.5).abs() < 1e-12);
//! ```

pub mod config;
pub mod error;
pub mod result;
pub mod sampler;
pub mod simulation;

pub use config::{ExactSamplerConfig, ShotSamplerConfig};
pub use error::{Result, SimulatorError};
pub use result::QuasiDistribution;
pub use sampler::{ExactSampler, Sampler, ShotSampler, StatevectorSampler};
pub use simulation::{exact_distribution, measurements_are_terminal, simulate_statevector};
