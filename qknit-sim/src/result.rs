//! Sampler result types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Quasi-probability distribution over classical outcomes
///
/// Keys are outcome integers in which bit `k` holds classical bit `k` of the
/// circuit. Values may be negative when the distribution comes from an
/// error-mitigated or reconstructed source; exact and shot-based samplers
/// only produce non-negative values.
///
/// # Example
/// ```
/// use qknit_sim::QuasiDistribution;
///
/// let dist = QuasiDistribution::from_pairs([(0, 0.5), (3, 0.5)]);
/// assert_eq!(dist.get(3), 0.5);
/// assert_eq!(dist.get(1), 0.0);
/// assert_eq!(dist.binary_probabilities(2)["11"], 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuasiDistribution {
    /// Map from outcome to quasi-probability
    dist: BTreeMap<u64, f64>,
    /// Number of shots the distribution was estimated from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shots: Option<usize>,
}

impl QuasiDistribution {
    /// Create a distribution from an outcome map
    pub fn new(dist: BTreeMap<u64, f64>) -> Self {
        Self { dist, shots: None }
    }

    /// Create a distribution from `(outcome, value)` pairs
    ///
    /// Values of repeated outcomes are summed.
    pub fn from_pairs<I: IntoIterator<Item = (u64, f64)>>(pairs: I) -> Self {
        let mut dist = Self::default();
        for (outcome, value) in pairs {
            dist.add(outcome, value);
        }
        dist
    }

    /// Attach the number of shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Number of shots, `None` for exact distributions
    pub fn shots(&self) -> Option<usize> {
        self.shots
    }

    /// Add `value` to the weight of `outcome`
    pub fn add(&mut self, outcome: u64, value: f64) {
        *self.dist.entry(outcome).or_insert(0.0) += value;
    }

    /// Weight of `outcome` (0 if absent)
    pub fn get(&self, outcome: u64) -> f64 {
        self.dist.get(&outcome).copied().unwrap_or(0.0)
    }

    /// Number of outcomes with a stored weight
    pub fn len(&self) -> usize {
        self.dist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    /// Iterate over `(outcome, weight)` in increasing outcome order
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.dist.iter().map(|(&k, &v)| (k, v))
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.dist.values().sum()
    }

    /// Outcomes as bitstrings of width `num_bits`, clbit 0 rightmost
    pub fn binary_probabilities(&self, num_bits: usize) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(k, v)| (format!("{:0width$b}", k, width = num_bits), v))
            .collect()
    }

    /// Closest probability distribution in L2 norm
    ///
    /// Negative weights are removed and their mass is spread over the
    /// remaining outcomes. Returns the distribution and its L2 distance
    /// from `self`.
    pub fn nearest_probability_distribution(&self) -> (QuasiDistribution, f64) {
        let mut sorted: Vec<(u64, f64)> = self.iter().collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut remaining = sorted.len() as f64;
        let mut beta = 0.0;
        let mut diff = 0.0;
        let mut kept = Vec::with_capacity(sorted.len());
        for (outcome, value) in sorted {
            let shifted = value + beta / remaining;
            if shifted < 0.0 {
                beta += value;
                remaining -= 1.0;
                diff += value * value;
            } else {
                kept.push((outcome, value));
            }
        }

        let mut nearest = QuasiDistribution::default();
        for (outcome, value) in kept {
            let shifted = value + beta / remaining;
            diff += (beta / remaining).powi(2);
            nearest.add(outcome, shifted);
        }
        nearest.shots = self.shots;
        (nearest, diff.sqrt())
    }

    /// Whether every outcome's weight is within `tolerance` of `other`'s
    pub fn approx_eq(&self, other: &QuasiDistribution, tolerance: f64) -> bool {
        self.dist
            .keys()
            .chain(other.dist.keys())
            .all(|&k| (self.get(k) - other.get(k)).abs() <= tolerance)
    }
}

impl FromIterator<(u64, f64)> for QuasiDistribution {
    fn from_iter<I: IntoIterator<Item = (u64, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl fmt::Display for QuasiDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (outcome, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", outcome, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accumulates_repeated_outcomes() {
        let dist: QuasiDistribution = [(1, 0.25), (1, 0.25), (2, 0.5)].into_iter().collect();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.get(1), 0.5);
        assert_relative_eq!(dist.total(), 1.0);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let dist = QuasiDistribution::from_pairs([(5, 0.1), (0, 0.2), (3, 0.7)]);
        let keys: Vec<u64> = dist.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![0, 3, 5]);
    }

    #[test]
    fn test_nearest_probability_distribution() {
        let dist = QuasiDistribution::from_pairs([(0, -0.1), (1, 0.5), (2, 0.6)]);
        let (nearest, distance) = dist.nearest_probability_distribution();

        assert_eq!(nearest.get(0), 0.0);
        assert_relative_eq!(nearest.get(1), 0.45, epsilon = 1e-12);
        assert_relative_eq!(nearest.get(2), 0.55, epsilon = 1e-12);
        assert_relative_eq!(nearest.total(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(distance, 0.015_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_nearest_distance_counts_full_dropped_weight() {
        // the second negative weight is dropped after the first has shifted it
        let dist = QuasiDistribution::from_pairs([(0, -0.3), (1, -0.05), (2, 0.675), (3, 0.675)]);
        let (nearest, distance) = dist.nearest_probability_distribution();

        assert!(nearest.approx_eq(&QuasiDistribution::from_pairs([(2, 0.5), (3, 0.5)]), 1e-12));
        assert_eq!(nearest.get(1), 0.0);
        let expected = (0.3_f64.powi(2) + 0.05_f64.powi(2) + 2.0 * 0.175_f64.powi(2)).sqrt();
        assert_relative_eq!(distance, expected, epsilon = 1e-12);
        assert_relative_eq!(distance, 0.392_110, epsilon = 1e-6);
    }

    #[test]
    fn test_nearest_of_probability_distribution_is_identity() {
        let dist = QuasiDistribution::from_pairs([(0, 0.3), (1, 0.7)]);
        let (nearest, distance) = dist.nearest_probability_distribution();
        assert!(nearest.approx_eq(&dist, 1e-12));
        assert_relative_eq!(distance, 0.0);
    }

    #[test]
    fn test_approx_eq_covers_missing_keys() {
        let a = QuasiDistribution::from_pairs([(0, 1.0)]);
        let b = QuasiDistribution::from_pairs([(0, 1.0), (1, 1e-14)]);
        let c = QuasiDistribution::from_pairs([(0, 0.5), (1, 0.5)]);
        assert!(a.approx_eq(&b, 1e-12));
        assert!(!a.approx_eq(&c, 1e-12));
        assert_ne!(a, b);
    }

    #[test]
    fn test_serialization() {
        let dist = QuasiDistribution::from_pairs([(3, 1.0)]).with_shots(100);
        let json = serde_json::to_string(&dist).unwrap();
        let back: QuasiDistribution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dist);

        let exact = serde_json::to_string(&QuasiDistribution::from_pairs([(3, 1.0)])).unwrap();
        assert!(!exact.contains("shots"));
    }
}
