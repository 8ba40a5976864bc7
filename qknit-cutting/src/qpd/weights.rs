//! Choosing which map-id tuples to run, and with what weight

use super::basis::QpdBasis;
use crate::error::{CuttingError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Probabilities below this are treated as zero
const MIN_PROBABILITY: f64 = 1e-20;

/// How a weight was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightType {
    /// The tuple's probability, computed exactly
    Exact,
    /// A Monte Carlo estimate of the tuple's probability
    Sampled,
}

/// A map id per basis, the tuple's weight, and how the weight was found
pub type QpdWeight = (Vec<usize>, f64, WeightType);

/// Terms of one basis sorted by decreasing probability
struct SortedBasis {
    map_ids: Vec<usize>,
    probabilities: Vec<f64>,
}

impl SortedBasis {
    fn new(basis: &QpdBasis) -> Self {
        let mut entries: Vec<(usize, f64)> = basis
            .probabilities()
            .into_iter()
            .enumerate()
            .filter(|&(_, p)| p > MIN_PROBABILITY)
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (map_ids, probabilities) = entries.into_iter().unzip();
        Self { map_ids, probabilities }
    }

    fn max_probability(&self) -> f64 {
        self.probabilities.first().copied().unwrap_or(0.0)
    }
}

/// Prefix whose completions are left to sampling, with its probability mass
struct Remainder {
    prefix: Vec<usize>,
    mass: f64,
}

struct Enumeration<'a> {
    bases: &'a [SortedBasis],
    /// `bound[d]`: largest probability any completion from depth `d` can have
    bound: Vec<f64>,
    threshold: f64,
    exact: Vec<(Vec<usize>, f64)>,
    remainders: Vec<Remainder>,
}

impl Enumeration<'_> {
    fn visit(&mut self, depth: usize, prefix: &mut Vec<usize>, probability: f64) {
        if depth == self.bases.len() {
            self.exact.push((prefix.clone(), probability));
            return;
        }
        let bases = self.bases;
        let basis = &bases[depth];
        for (&map_id, &p) in basis.map_ids.iter().zip(&basis.probabilities) {
            let q = probability * p;
            prefix.push(map_id);
            if q * self.bound[depth + 1] >= self.threshold {
                self.visit(depth + 1, prefix, q);
            } else {
                self.remainders.push(Remainder {
                    prefix: prefix.clone(),
                    mass: q,
                });
            }
            prefix.pop();
        }
    }
}

/// Weights for the map-id tuples of `bases`
///
/// Tuples are explored depth-first, most probable maps first. Every tuple
/// whose joint probability is at least `1 / num_samples` gets its exact
/// probability as weight. The probability mass that remains is estimated
/// from `num_samples` draws, each completing a pruned prefix at random.
///
/// Exact weights come first, then sampled ones, each by decreasing weight.
///
/// # Errors
/// Returns error if `num_samples` is zero
///
/// # Example
/// ```
/// use qknit_cutting::{generate_qpd_weights, QpdBasis, WeightType};
/// use qknit_gates::CNot;
/// use rand::SeedableRng;
///
/// let basis = QpdBasis::from_gate(&CNot).unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let weights = generate_qpd_weights(&[basis], 100, &mut rng).unwrap();
/// assert_eq!(weights.len(), 6);
/// assert!(weights.iter().all(|(_, _, kind)| *kind == WeightType::Exact));
/// ```
pub fn generate_qpd_weights<R: Rng + ?Sized>(
    bases: &[QpdBasis],
    num_samples: usize,
    rng: &mut R,
) -> Result<Vec<QpdWeight>> {
    if num_samples == 0 {
        return Err(CuttingError::InvalidSampleCount);
    }
    let sorted: Vec<SortedBasis> = bases.iter().map(SortedBasis::new).collect();

    let mut bound = vec![1.0; sorted.len() + 1];
    for depth in (0..sorted.len()).rev() {
        bound[depth] = bound[depth + 1] * sorted[depth].max_probability();
    }

    let mut enumeration = Enumeration {
        bases: &sorted,
        bound,
        threshold: 1.0 / num_samples as f64,
        exact: Vec::new(),
        remainders: Vec::new(),
    };
    enumeration.visit(0, &mut Vec::with_capacity(sorted.len()), 1.0);
    let Enumeration { exact, remainders, .. } = enumeration;

    let sampled = sample_remainders(&sorted, &remainders, num_samples, rng)?;
    debug!(
        num_exact = exact.len(),
        num_sampled = sampled.len(),
        num_remainders = remainders.len(),
        "generated qpd weights"
    );

    let mut weights: Vec<QpdWeight> = Vec::with_capacity(exact.len() + sampled.len());
    let by_weight = |a: &QpdWeight, b: &QpdWeight| b.1.total_cmp(&a.1);
    let mut exact: Vec<QpdWeight> = exact
        .into_iter()
        .map(|(ids, w)| (ids, w, WeightType::Exact))
        .collect();
    exact.sort_by(by_weight);
    let mut sampled: Vec<QpdWeight> = sampled
        .into_iter()
        .map(|(ids, w)| (ids, w, WeightType::Sampled))
        .collect();
    sampled.sort_by(by_weight);
    weights.extend(exact);
    weights.extend(sampled);
    Ok(weights)
}

/// Same as [`generate_qpd_weights`]
pub fn generate_qpd_samples<R: Rng + ?Sized>(
    bases: &[QpdBasis],
    num_samples: usize,
    rng: &mut R,
) -> Result<Vec<QpdWeight>> {
    generate_qpd_weights(bases, num_samples, rng)
}

fn sample_remainders<R: Rng + ?Sized>(
    bases: &[SortedBasis],
    remainders: &[Remainder],
    num_samples: usize,
    rng: &mut R,
) -> Result<Vec<(Vec<usize>, f64)>> {
    let remaining_mass: f64 = remainders.iter().map(|r| r.mass).sum();
    if remainders.is_empty() || remaining_mass <= 0.0 {
        return Ok(Vec::new());
    }
    let invalid = |e: rand::distributions::WeightedError| {
        CuttingError::InvalidBasis(format!("cannot sample basis probabilities: {}", e))
    };
    let pick_remainder = WeightedIndex::new(remainders.iter().map(|r| r.mass)).map_err(invalid)?;
    let pick_map = bases
        .iter()
        .map(|basis| WeightedIndex::<f64>::new(basis.probabilities.iter().copied()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(invalid)?;

    let mut counts: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
    for _ in 0..num_samples {
        let remainder = &remainders[pick_remainder.sample(rng)];
        let mut ids = remainder.prefix.clone();
        for depth in ids.len()..bases.len() {
            ids.push(bases[depth].map_ids[pick_map[depth].sample(rng)]);
        }
        *counts.entry(ids).or_insert(0) += 1;
    }

    let scale = remaining_mass / num_samples as f64;
    Ok(counts
        .into_iter()
        .map(|(ids, count)| (ids, count as f64 * scale))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qknit_core::Operation;
    use qknit_gates::{CNot, PauliX, RZZ};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn biased_basis() -> QpdBasis {
        let x = || vec![Operation::gate(PauliX)];
        QpdBasis::new(vec![vec![x(), x()], vec![x(), vec![]]], vec![0.75, -0.25]).unwrap()
    }

    #[test]
    fn test_zero_samples_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_qpd_weights(&[biased_basis()], 0, &mut rng).unwrap_err(),
            CuttingError::InvalidSampleCount
        );
    }

    #[test]
    fn test_all_exact_when_samples_suffice() {
        let mut rng = StdRng::seed_from_u64(1);
        let weights = generate_qpd_weights(&[biased_basis()], 4, &mut rng).unwrap();
        assert_eq!(
            weights,
            vec![
                (vec![0], 0.75, WeightType::Exact),
                (vec![1], 0.25, WeightType::Exact),
            ]
        );
    }

    #[test]
    fn test_unlikely_tuples_are_sampled() {
        let mut rng = StdRng::seed_from_u64(1);
        let weights = generate_qpd_weights(&[biased_basis()], 2, &mut rng).unwrap();
        assert_eq!(
            weights,
            vec![
                (vec![0], 0.75, WeightType::Exact),
                (vec![1], 0.25, WeightType::Sampled),
            ]
        );
    }

    #[test]
    fn test_two_cuts_enumerated_exactly() {
        let basis = QpdBasis::from_gate(&CNot).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let weights = generate_qpd_weights(&[basis.clone(), basis], 100, &mut rng).unwrap();
        assert_eq!(weights.len(), 36);
        for (ids, weight, kind) in &weights {
            assert_eq!(ids.len(), 2);
            assert_eq!(*kind, WeightType::Exact);
            assert_relative_eq!(*weight, 1.0 / 36.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let bases = vec![
            QpdBasis::from_gate(&RZZ::new(0.4)).unwrap(),
            QpdBasis::from_gate(&CNot).unwrap(),
            QpdBasis::from_gate(&RZZ::new(1.1)).unwrap(),
        ];
        let mut rng = StdRng::seed_from_u64(11);
        let weights = generate_qpd_weights(&bases, 50, &mut rng).unwrap();
        let total: f64 = weights.iter().map(|(_, w, _)| w).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);

        // exact entries precede sampled ones
        let first_sampled = weights
            .iter()
            .position(|(_, _, kind)| *kind == WeightType::Sampled)
            .unwrap_or(weights.len());
        assert!(weights[first_sampled..]
            .iter()
            .all(|(_, _, kind)| *kind == WeightType::Sampled));
        assert!(weights[..first_sampled]
            .windows(2)
            .all(|pair| pair[0].1 >= pair[1].1));
    }

    #[test]
    fn test_zero_probability_maps_skipped() {
        // RZZ(0) is the identity: only the first map has weight
        let mut rng = StdRng::seed_from_u64(5);
        let weights = generate_qpd_weights(&[QpdBasis::from_gate(&RZZ::new(0.0)).unwrap()], 10, &mut rng).unwrap();
        assert_eq!(weights, vec![(vec![0], 1.0, WeightType::Exact)]);
    }

    #[test]
    fn test_no_bases_gives_single_tuple() {
        let mut rng = StdRng::seed_from_u64(5);
        let weights = generate_qpd_samples(&[], 10, &mut rng).unwrap();
        assert_eq!(weights, vec![(vec![], 1.0, WeightType::Exact)]);
    }
}
