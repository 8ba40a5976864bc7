//! Sampler configuration

/// Configuration for [`ExactSampler`](crate::ExactSampler)
#[derive(Debug, Clone, PartialEq)]
pub struct ExactSamplerConfig {
    /// Branches whose probability falls below this value are dropped
    ///
    /// Default: 1e-12
    pub probability_cutoff: f64,

    /// Largest circuit width the sampler accepts
    ///
    /// Default: 24
    pub max_qubits: usize,

    /// Run circuits of one batch in parallel with rayon
    ///
    /// Default: true
    pub parallel: bool,
}

impl Default for ExactSamplerConfig {
    fn default() -> Self {
        Self {
            probability_cutoff: 1e-12,
            max_qubits: 24,
            parallel: true,
        }
    }
}

impl ExactSamplerConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pruning cutoff
    pub fn with_probability_cutoff(mut self, cutoff: f64) -> Self {
        self.probability_cutoff = cutoff;
        self
    }

    /// Set the qubit limit
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Enable or disable parallel execution across circuits
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.probability_cutoff) {
            return Err(format!(
                "probability_cutoff must be in [0,1), got {}",
                self.probability_cutoff
            ));
        }
        if self.max_qubits == 0 || self.max_qubits > 40 {
            return Err(format!("max_qubits must be 1-40, got {}", self.max_qubits));
        }
        Ok(())
    }
}

/// Configuration for [`ShotSampler`](crate::ShotSampler)
#[derive(Debug, Clone, PartialEq)]
pub struct ShotSamplerConfig {
    /// Number of measurement shots per circuit
    ///
    /// Default: 1024
    pub shots: usize,

    /// Random number generator seed for reproducibility
    ///
    /// If None, the generator is seeded from entropy.
    ///
    /// Default: None (random)
    pub seed: Option<u64>,

    /// Settings of the exact distribution the shots are drawn from
    pub exact: ExactSamplerConfig,
}

impl Default for ShotSamplerConfig {
    fn default() -> Self {
        Self {
            shots: 1024,
            seed: None,
            exact: ExactSamplerConfig::default(),
        }
    }
}

impl ShotSamplerConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of measurement shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set the random seed for deterministic sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the configuration of the underlying exact simulation
    pub fn with_exact(mut self, exact: ExactSamplerConfig) -> Self {
        self.exact = exact;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.shots == 0 {
            return Err("shots must be > 0".to_string());
        }
        self.exact.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExactSamplerConfig::default();
        assert_eq!(config.probability_cutoff, 1e-12);
        assert_eq!(config.max_qubits, 24);
        assert!(config.parallel);

        let shots = ShotSamplerConfig::default();
        assert_eq!(shots.shots, 1024);
        assert_eq!(shots.seed, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ShotSamplerConfig::new()
            .with_shots(2048)
            .with_seed(42)
            .with_exact(ExactSamplerConfig::new().with_max_qubits(10));

        assert_eq!(config.shots, 2048);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.exact.max_qubits, 10);
    }

    #[test]
    fn test_validate() {
        assert!(ExactSamplerConfig::default().validate().is_ok());

        let invalid = ExactSamplerConfig {
            probability_cutoff: 1.5,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        let invalid = ShotSamplerConfig {
            shots: 0,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }
}
