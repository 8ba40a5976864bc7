//! Execution options

/// Options for [`execute_experiments_with_options`](crate::execute_experiments_with_options)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Seed of the generator choosing sampled map combinations
    ///
    /// If None, the generator is seeded from entropy.
    ///
    /// Default: None (random)
    pub seed: Option<u64>,

    /// Run the partitions of a separated circuit in parallel with rayon
    ///
    /// Default: true
    pub parallel: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            seed: None,
            parallel: true,
        }
    }
}

impl ExecutionOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the random seed for reproducible weights
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable parallel execution across partitions
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = ExecutionOptions::new().with_seed(42).with_parallel(false);
        assert_eq!(options.seed, Some(42));
        assert!(!options.parallel);
        assert_eq!(ExecutionOptions::default().seed, None);
    }
}
