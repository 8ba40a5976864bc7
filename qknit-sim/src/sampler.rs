//! Samplers: run batches of circuits and return outcome distributions

use crate::config::{ExactSamplerConfig, ShotSamplerConfig};
use crate::error::{Result, SimulatorError};
use crate::result::QuasiDistribution;
use crate::simulation::{exact_distribution, measurements_are_terminal};
use parking_lot::Mutex;
use qknit_core::Circuit;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, instrument};

/// Executes circuits and returns one distribution per circuit
///
/// Outcome bit `k` of every distribution is classical bit `k` of the
/// corresponding circuit.
pub trait Sampler: Send + Sync + fmt::Debug {
    /// Human-readable sampler name
    fn name(&self) -> &str;

    /// Run `circuits` and return their distributions in the same order
    fn run(&self, circuits: &[Circuit]) -> Result<Vec<QuasiDistribution>>;

    /// Whether measurements may be followed by further operations
    fn supports_mid_circuit_measurement(&self) -> bool {
        true
    }
}

/// Exact sampler: returns the exact outcome probabilities
///
/// Mid-circuit measurements and resets are handled by exact branching.
///
/// # Example
/// ```
/// use qknit_core::Circuit;
/// use qknit_gates::CircuitExt;
/// use qknit_sim::{ExactSampler, Sampler};
///
/// let mut circuit = Circuit::new(1);
/// circuit.add_register("c", 1).unwrap();
/// circuit.h(0).unwrap();
/// circuit.measure(0, 0).unwrap();
///
/// let dists = ExactSampler::new().run(&[circuit]).unwrap();
/// assert!((dists[0].get(1) - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExactSampler {
    config: ExactSamplerConfig,
}

impl ExactSampler {
    /// Create an exact sampler with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exact sampler with the given configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn with_config(config: ExactSamplerConfig) -> Result<Self> {
        config.validate().map_err(SimulatorError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// Get the sampler configuration
    pub fn config(&self) -> &ExactSamplerConfig {
        &self.config
    }
}

impl Sampler for ExactSampler {
    fn name(&self) -> &str {
        "ExactSampler"
    }

    #[instrument(level = "debug", skip_all, fields(num_circuits = circuits.len()))]
    fn run(&self, circuits: &[Circuit]) -> Result<Vec<QuasiDistribution>> {
        if self.config.parallel {
            circuits
                .par_iter()
                .map(|circuit| exact_distribution(circuit, &self.config))
                .collect()
        } else {
            circuits
                .iter()
                .map(|circuit| exact_distribution(circuit, &self.config))
                .collect()
        }
    }
}

/// Shot-based sampler: draws a finite number of outcomes per circuit
///
/// Outcomes are drawn from the exact distribution with a seeded generator,
/// so a fixed seed reproduces the same counts across runs.
pub struct ShotSampler {
    config: ShotSamplerConfig,
    rng: Mutex<StdRng>,
}

impl ShotSampler {
    /// Create a shot sampler
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn new(config: ShotSamplerConfig) -> Result<Self> {
        config.validate().map_err(SimulatorError::InvalidConfig)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng: Mutex::new(rng),
        })
    }

    /// Get the sampler configuration
    pub fn config(&self) -> &ShotSamplerConfig {
        &self.config
    }

    fn draw(&self, exact: &QuasiDistribution) -> Result<QuasiDistribution> {
        let outcomes: Vec<(u64, f64)> = exact.iter().collect();
        let index = WeightedIndex::new(outcomes.iter().map(|(_, p)| p.max(0.0)))
            .map_err(|e| SimulatorError::Other(format!("cannot sample distribution: {}", e)))?;

        let mut counts = vec![0usize; outcomes.len()];
        let mut rng = self.rng.lock();
        for _ in 0..self.config.shots {
            counts[index.sample(&mut *rng)] += 1;
        }

        let shots = self.config.shots as f64;
        Ok(outcomes
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(&(outcome, _), count)| (outcome, count as f64 / shots))
            .collect::<QuasiDistribution>()
            .with_shots(self.config.shots))
    }
}

impl fmt::Debug for ShotSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShotSampler")
            .field("shots", &self.config.shots)
            .field("seed", &self.config.seed)
            .finish()
    }
}

impl Sampler for ShotSampler {
    fn name(&self) -> &str {
        "ShotSampler"
    }

    #[instrument(level = "debug", skip_all, fields(num_circuits = circuits.len(), shots = self.config.shots))]
    fn run(&self, circuits: &[Circuit]) -> Result<Vec<QuasiDistribution>> {
        let exact: Vec<QuasiDistribution> = circuits
            .par_iter()
            .map(|circuit| exact_distribution(circuit, &self.config.exact))
            .collect::<Result<_>>()?;
        // draws stay sequential so a seed fixes the result
        exact.iter().map(|dist| self.draw(dist)).collect()
    }
}

/// Sampler restricted to circuits that measure only at the end
///
/// The outcome distribution is read from the final statevector. Circuits
/// with a measurement followed by another operation, or with a reset, are
/// rejected.
#[derive(Debug, Clone, Default)]
pub struct StatevectorSampler {
    config: ExactSamplerConfig,
}

impl StatevectorSampler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sampler for StatevectorSampler {
    fn name(&self) -> &str {
        "StatevectorSampler"
    }

    fn run(&self, circuits: &[Circuit]) -> Result<Vec<QuasiDistribution>> {
        if let Some(index) = circuits.iter().position(|c| !measurements_are_terminal(c)) {
            debug!(index, "rejecting circuit with mid-circuit measurement");
            return Err(SimulatorError::MidCircuitMeasurement {
                sampler: self.name().to_string(),
            });
        }
        circuits
            .par_iter()
            .map(|circuit| exact_distribution(circuit, &self.config))
            .collect()
    }

    fn supports_mid_circuit_measurement(&self) -> bool {
        false
    }
}
