//! Dense quantum state representation
//!
//! Amplitude `i` belongs to the computational basis state whose bit `q` is
//! the value of qubit `q`.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::fmt;

/// States at or above this dimension use rayon for reductions
pub(crate) const PARALLEL_THRESHOLD: usize = 1 << 14;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Dense quantum state representation
///
/// `DenseState` stores all 2^n amplitudes and supports the operations a
/// branching simulator needs: gate application, projective measurement of
/// one qubit, and reset.
///
/// # Example
///
/// ```
/// use qknit_state::DenseState;
/// use num_complex::Complex64;
///
/// // Create a 2-qubit state
/// let mut state = DenseState::new(2).unwrap();
///
/// // Apply gates
/// let hadamard = [
///     [Complex64::new(0.7071067811865476, 0.0), Complex64::new(0.7071067811865476, 0.0)],
///     [Complex64::new(0.7071067811865476, 0.0), Complex64::new(-0.7071067811865476, 0.0)],
/// ];
/// state.apply_single_qubit_gate(&hadamard, 0).unwrap();
///
/// assert_eq!(state.num_qubits(), 2);
/// assert!(state.is_normalized(1e-10));
/// ```
#[derive(Clone, PartialEq)]
pub struct DenseState {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl DenseState {
    /// Create a new dense state initialized to |0...0⟩
    ///
    /// # Errors
    /// Returns error if `num_qubits` is too large to address
    ///
    /// # Example
    /// ```
    /// use qknit_state::DenseState;
    ///
    /// let state = DenseState::new(3).unwrap();
    /// assert_eq!(state.num_qubits(), 3);
    /// assert_eq!(state.dimension(), 8);
    /// ```
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits >= usize::BITS as usize {
            return Err(StateError::InvalidDimension {
                dimension: num_qubits,
            });
        }
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Create a dense state from amplitude data
    ///
    /// The amplitudes are copied as given; call [`normalize`](Self::normalize)
    /// if they are not already normalized.
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != 2^num_qubits`
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        let expected = 1usize
            .checked_shl(num_qubits as u32)
            .ok_or(StateError::InvalidDimension {
                dimension: amplitudes.len(),
            })?;
        if amplitudes.len() != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }
        Ok(Self {
            num_qubits,
            amplitudes: amplitudes.to_vec(),
        })
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the state dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get a reference to the state amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Get a mutable reference to the state amplitudes
    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Consume the state and return its amplitudes
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Squared norm ⟨ψ|ψ⟩
    pub fn norm_sqr(&self) -> f64 {
        if self.dimension() >= PARALLEL_THRESHOLD {
            self.amplitudes.par_iter().map(|a| a.norm_sqr()).sum()
        } else {
            self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
        }
    }

    /// Compute the norm of the state
    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Check if the state is normalized (|norm - 1| < epsilon)
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm() - 1.0).abs() < epsilon
    }

    /// Normalize the state to have unit norm
    ///
    /// # Errors
    /// Returns error if the state has (numerically) zero norm
    pub fn normalize(&mut self) -> Result<()> {
        let norm = self.norm();
        if norm < 1e-300 {
            return Err(StateError::NotNormalized { norm });
        }
        let inv = 1.0 / norm;
        self.amplitudes.iter_mut().for_each(|a| *a *= inv);
        Ok(())
    }

    /// Probability of each computational basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Apply a unitary given as a flat row-major matrix to `qubits`
    ///
    /// The first entry of `qubits` is the most significant bit of the
    /// matrix's local index, so a controlled gate lists its control first.
    ///
    /// # Errors
    /// Returns error if a qubit is out of range or repeated, or if the
    /// matrix is not `2^k × 2^k` for `k = qubits.len()`
    pub fn apply_matrix(&mut self, matrix: &[Complex64], qubits: &[usize]) -> Result<()> {
        for (i, &q) in qubits.iter().enumerate() {
            self.check_qubit(q)?;
            if qubits[..i].contains(&q) {
                return Err(StateError::DuplicateQubit(q));
            }
        }
        let k = qubits.len();
        let local_dim = 1usize << k;
        if matrix.len() != local_dim * local_dim {
            return Err(StateError::DimensionMismatch {
                expected: local_dim * local_dim,
                actual: matrix.len(),
            });
        }

        // global offset of every local basis index
        let offsets: SmallVec<[usize; 8]> = (0..local_dim)
            .map(|local| {
                qubits
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (local >> (k - 1 - j)) & 1 == 1)
                    .fold(0, |acc, (_, &q)| acc | (1 << q))
            })
            .collect();
        let touched = offsets[local_dim - 1];

        let mut buffer: SmallVec<[Complex64; 8]> = SmallVec::from_elem(ZERO, local_dim);
        for base in 0..self.dimension() {
            if base & touched != 0 {
                continue;
            }
            for (slot, &offset) in buffer.iter_mut().zip(offsets.iter()) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, &offset) in offsets.iter().enumerate() {
                let row_entries = &matrix[row * local_dim..(row + 1) * local_dim];
                self.amplitudes[base | offset] = row_entries
                    .iter()
                    .zip(buffer.iter())
                    .map(|(m, a)| m * a)
                    .sum();
            }
        }
        Ok(())
    }

    /// Apply a single-qubit gate given as a 2×2 matrix
    pub fn apply_single_qubit_gate(&mut self, matrix: &[[Complex64; 2]; 2], qubit: usize) -> Result<()> {
        let flat = [matrix[0][0], matrix[0][1], matrix[1][0], matrix[1][1]];
        self.apply_matrix(&flat, &[qubit])
    }

    /// Probability that measuring `qubit` yields 1
    pub fn probability_of_one(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        let mask = 1 << qubit;
        let prob = if self.dimension() >= PARALLEL_THRESHOLD {
            self.amplitudes
                .par_iter()
                .enumerate()
                .filter(|(idx, _)| idx & mask != 0)
                .map(|(_, amp)| amp.norm_sqr())
                .sum()
        } else {
            self.amplitudes
                .iter()
                .enumerate()
                .filter(|(idx, _)| idx & mask != 0)
                .map(|(_, amp)| amp.norm_sqr())
                .sum()
        };
        Ok(prob)
    }

    /// Project `qubit` onto `outcome` and renormalize
    ///
    /// Returns the probability of the outcome before projection. When that
    /// probability is zero the state is left as the zero vector.
    ///
    /// # Example
    /// ```
    /// use qknit_state::DenseState;
    /// use num_complex::Complex64;
    ///
    /// let h = std::f64::consts::FRAC_1_SQRT_2;
    /// let amps = [Complex64::new(h, 0.0), Complex64::new(h, 0.0)];
    /// let mut state = DenseState::from_amplitudes(1, &amps).unwrap();
    /// let p = state.project(0, true).unwrap();
    /// assert!((p - 0.5).abs() < 1e-12);
    /// assert!((state.amplitudes()[1].re - 1.0).abs() < 1e-12);
    /// ```
    pub fn project(&mut self, qubit: usize, outcome: bool) -> Result<f64> {
        let prob_one = self.probability_of_one(qubit)?;
        let prob = if outcome { prob_one } else { self.norm_sqr() - prob_one };

        let mask = 1 << qubit;
        let scale = if prob > 0.0 { 1.0 / prob.sqrt() } else { 0.0 };
        for (idx, amp) in self.amplitudes.iter_mut().enumerate() {
            if (idx & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }
        Ok(prob.max(0.0))
    }

    /// Flip `qubit` (Pauli X)
    pub fn flip(&mut self, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let mask = 1 << qubit;
        for idx in 0..self.dimension() {
            if idx & mask == 0 {
                self.amplitudes.swap(idx, idx | mask);
            }
        }
        Ok(())
    }

    /// Move the |1⟩ component of `qubit` onto |0⟩
    ///
    /// This is a reset on a branch where `qubit` has already been projected;
    /// resetting a superposed qubit needs one branch per outcome.
    pub fn reset_qubit(&mut self, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let mask = 1 << qubit;
        for idx in 0..self.dimension() {
            if idx & mask != 0 {
                let amp = std::mem::replace(&mut self.amplitudes[idx], ZERO);
                self.amplitudes[idx ^ mask] += amp;
            }
        }
        Ok(())
    }

    /// Inner product ⟨self|other⟩
    pub fn inner_product(&self, other: &DenseState) -> Result<Complex64> {
        if self.dimension() != other.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Fidelity |⟨self|other⟩|²
    pub fn fidelity(&self, other: &DenseState) -> Result<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }
}

impl fmt::Debug for DenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseState")
            .field("num_qubits", &self.num_qubits)
            .field("norm", &self.norm())
            .finish()
    }
}

impl fmt::Display for DenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DenseState({} qubits)", self.num_qubits)?;
        for (idx, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() > 1e-12 {
                writeln!(
                    f,
                    "  |{:0width$b}⟩: {:.4} + {:.4}i",
                    idx,
                    amp.re,
                    amp.im,
                    width = self.num_qubits.max(1)
                )?;
            }
        }
        Ok(())
    }
}
