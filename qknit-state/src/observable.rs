//! Pauli observables
//!
//! A Pauli string is a tensor product of single-qubit Paulis with a phase.
//! In the label `"XZI"` the rightmost character acts on qubit 0, so `I`
//! is on qubit 0 and `X` on qubit 2. An optional
//! prefix gives the phase: `"-i"`, `"-"`, `"i"` (or `"+"` for none).
//!
//! # Pauli Operators
//!
//! The four single-qubit Pauli operators:
//! - I: Identity [[1,0],[0,1]]
//! - X: Bit flip [[0,1],[1,0]]
//! - Y: [[0,-i],[i,0]]
//! - Z: Phase flip [[1,0],[0,-1]]

use crate::dense_state::{DenseState, PARALLEL_THRESHOLD};
use crate::error::{Result, StateError};
use num_complex::Complex64;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pauli {
    /// Identity operator
    I,
    /// Pauli X (bit flip)
    X,
    /// Pauli Y
    Y,
    /// Pauli Z (phase flip)
    Z,
}

impl Pauli {
    /// Parse a Pauli operator from an uppercase character
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            other => Err(StateError::InvalidPauli(other)),
        }
    }

    /// Convert to character representation
    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// Check if this Pauli is diagonal (I or Z)
    pub fn is_diagonal(self) -> bool {
        matches!(self, Pauli::I | Pauli::Z)
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A tensor product of Pauli operators with a phase `(-i)^phase`
///
/// # Example
/// ```
/// use qknit_state::{Pauli, PauliString};
///
/// let pauli: PauliString = "-XZ".parse().unwrap();
/// assert_eq!(pauli.num_qubits(), 2);
/// assert_eq!(pauli.get(0), Some(Pauli::Z));
/// assert_eq!(pauli.get(1), Some(Pauli::X));
/// assert_eq!(pauli.phase(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PauliString {
    /// Pauli operator on each qubit
    paulis: Vec<Pauli>,
    /// Phase exponent in units of -i (0, 1, 2, 3 for 1, -i, -1, i)
    phase: u8,
}

impl PauliString {
    /// Create a Pauli string from per-qubit operators with unit phase
    pub fn from_paulis(paulis: Vec<Pauli>) -> Self {
        Self { paulis, phase: 0 }
    }

    /// Create an all-I (identity) Pauli string
    pub fn identity(num_qubits: usize) -> Self {
        Self::from_paulis(vec![Pauli::I; num_qubits])
    }

    /// Create an all-Z Pauli string
    pub fn all_z(num_qubits: usize) -> Self {
        Self::from_paulis(vec![Pauli::Z; num_qubits])
    }

    /// Return the string with the given phase exponent (taken modulo 4)
    pub fn with_phase(mut self, phase: u8) -> Self {
        self.phase = phase % 4;
        self
    }

    /// Get the number of qubits
    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// Get the Pauli operator at a specific qubit
    pub fn get(&self, qubit: usize) -> Option<Pauli> {
        self.paulis.get(qubit).copied()
    }

    /// Per-qubit operators, index = qubit
    pub fn paulis(&self) -> &[Pauli] {
        &self.paulis
    }

    /// Phase exponent in units of -i
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Whether the phase is +1
    pub fn has_unit_phase(&self) -> bool {
        self.phase == 0
    }

    /// The same operators with the phase removed
    pub fn without_phase(&self) -> Self {
        Self::from_paulis(self.paulis.clone())
    }

    /// Check if every operator is I
    pub fn is_identity(&self) -> bool {
        self.paulis.iter().all(|&p| p == Pauli::I)
    }

    /// Check if this Pauli string is diagonal (all I or Z)
    pub fn is_diagonal(&self) -> bool {
        self.paulis.iter().all(|p| p.is_diagonal())
    }

    /// Qubits with a non-identity operator, ascending
    pub fn support(&self) -> Vec<usize> {
        self.paulis
            .iter()
            .enumerate()
            .filter(|(_, p)| **p != Pauli::I)
            .map(|(q, _)| q)
            .collect()
    }

    /// Whether the two strings commute qubit by qubit
    ///
    /// On every qubit at least one of the operators is I, or both are
    /// equal. Strings of different length never commute qubit-wise.
    pub fn qubit_wise_commutes(&self, other: &PauliString) -> bool {
        self.num_qubits() == other.num_qubits()
            && self
                .paulis
                .iter()
                .zip(other.paulis.iter())
                .all(|(&a, &b)| a == Pauli::I || b == Pauli::I || a == b)
    }

    /// Restrict to `qubits`, in the given order, dropping the phase
    ///
    /// # Errors
    /// Returns error if a qubit is out of range
    pub fn restrict(&self, qubits: &[usize]) -> Result<Self> {
        let paulis = qubits
            .iter()
            .map(|&q| {
                self.get(q).ok_or(StateError::InvalidQubitIndex {
                    index: q,
                    num_qubits: self.num_qubits(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_paulis(paulis))
    }

    /// Compute the expectation value ⟨ψ|P|ψ⟩
    ///
    /// The real part is returned; it is exact for Hermitian strings
    /// (phase ±1).
    pub fn expectation_value(&self, state: &DenseState) -> Result<f64> {
        if self.num_qubits() != state.num_qubits() {
            return Err(StateError::DimensionMismatch {
                expected: self.num_qubits(),
                actual: state.num_qubits(),
            });
        }

        let (x_mask, z_mask, num_y) = self.masks();
        let amplitudes = state.amplitudes();
        // P|b⟩ = i^{#Y} (-1)^{popcount(b & z)} |b ^ x⟩ with the Y = iXZ convention
        let term = |basis: usize| -> Complex64 {
            let sign = if (basis & z_mask).count_ones() % 2 == 0 { 1.0 } else { -1.0 };
            amplitudes[basis ^ x_mask].conj() * amplitudes[basis] * sign
        };
        let sum: Complex64 = if amplitudes.len() >= PARALLEL_THRESHOLD {
            (0..amplitudes.len()).into_par_iter().map(term).sum()
        } else {
            (0..amplitudes.len()).map(term).sum()
        };

        let phase = Complex64::new(0.0, 1.0).powu(num_y) * Complex64::new(0.0, -1.0).powu(self.phase as u32);
        Ok((sum * phase).re)
    }

    /// Bitmasks of X-type and Z-type qubits, plus the number of Y operators
    fn masks(&self) -> (usize, usize, u32) {
        let mut x_mask = 0;
        let mut z_mask = 0;
        let mut num_y = 0;
        for (q, &p) in self.paulis.iter().enumerate() {
            match p {
                Pauli::I => {},
                Pauli::X => x_mask |= 1 << q,
                Pauli::Z => z_mask |= 1 << q,
                Pauli::Y => {
                    x_mask |= 1 << q;
                    z_mask |= 1 << q;
                    num_y += 1;
                },
            }
        }
        (x_mask, z_mask, num_y)
    }
}

impl FromStr for PauliString {
    type Err = StateError;

    fn from_str(label: &str) -> Result<Self> {
        let (sign, rest) = match label.strip_prefix('-') {
            Some(rest) => (2, rest),
            None => (0, label.strip_prefix('+').unwrap_or(label)),
        };
        let (imag, rest) = match rest.strip_prefix('i').or_else(|| rest.strip_prefix('j')) {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        // i = (-i)^3, -i = (-i)^1
        let phase = match (sign, imag) {
            (s, false) => s,
            (0, true) => 3,
            (_, true) => 1,
        };
        // rightmost character is qubit 0
        let paulis = rest
            .chars()
            .rev()
            .map(Pauli::from_char)
            .collect::<Result<Vec<_>>>()
            .map_err(|_| StateError::InvalidPauliLabel(label.to_string()))?;
        Ok(Self { paulis, phase })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.phase {
            1 => "-i",
            2 => "-",
            3 => "i",
            _ => "",
        };
        write!(f, "{}", prefix)?;
        for pauli in self.paulis.iter().rev() {
            write!(f, "{}", pauli)?;
        }
        Ok(())
    }
}

/// An ordered list of Pauli strings on the same number of qubits
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PauliList {
    num_qubits: usize,
    paulis: Vec<PauliString>,
}

impl PauliList {
    /// Create a list, checking that all strings have the same length
    pub fn new(paulis: Vec<PauliString>) -> Result<Self> {
        let num_qubits = paulis.first().map_or(0, PauliString::num_qubits);
        if let Some(bad) = paulis.iter().find(|p| p.num_qubits() != num_qubits) {
            return Err(StateError::DimensionMismatch {
                expected: num_qubits,
                actual: bad.num_qubits(),
            });
        }
        Ok(Self { num_qubits, paulis })
    }

    /// Parse a list of labels
    ///
    /// # Example
    /// ```
    /// use qknit_state::PauliList;
    ///
    /// let list = PauliList::from_labels(&["ZZ", "XX"]).unwrap();
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(list.num_qubits(), 2);
    /// ```
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let paulis = labels
            .iter()
            .map(|l| l.as_ref().parse())
            .collect::<Result<Vec<_>>>()?;
        Self::new(paulis)
    }

    /// Number of qubits of every string, 0 for an empty list
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn len(&self) -> usize {
        self.paulis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paulis.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PauliString> {
        self.paulis.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PauliString> {
        self.paulis.iter()
    }

    pub fn as_slice(&self) -> &[PauliString] {
        &self.paulis
    }

    /// Append a string
    ///
    /// # Errors
    /// Returns error if its length differs from the list's
    pub fn push(&mut self, pauli: PauliString) -> Result<()> {
        if !self.paulis.is_empty() && pauli.num_qubits() != self.num_qubits {
            return Err(StateError::DimensionMismatch {
                expected: self.num_qubits,
                actual: pauli.num_qubits(),
            });
        }
        self.num_qubits = pauli.num_qubits();
        self.paulis.push(pauli);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PauliList {
    type Item = &'a PauliString;
    type IntoIter = std::slice::Iter<'a, PauliString>;

    fn into_iter(self) -> Self::IntoIter {
        self.paulis.iter()
    }
}

impl fmt::Display for PauliList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, pauli) in self.paulis.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pauli)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn bell() -> DenseState {
        let h = FRAC_1_SQRT_2;
        DenseState::from_amplitudes(2, &[c(h), c(0.0), c(0.0), c(h)]).unwrap()
    }

    #[test]
    fn test_pauli_from_char() {
        assert_eq!(Pauli::from_char('I').unwrap(), Pauli::I);
        assert_eq!(Pauli::from_char('X').unwrap(), Pauli::X);
        assert_eq!(Pauli::from_char('Y').unwrap(), Pauli::Y);
        assert_eq!(Pauli::from_char('Z').unwrap(), Pauli::Z);
        assert_eq!(Pauli::from_char('q'), Err(StateError::InvalidPauli('q')));
    }

    #[test]
    fn test_parse_phases() {
        let cases = [("XY", 0), ("-i XY", 1), ("-XY", 2), ("iXY", 3), ("+XY", 0), ("-jXY", 1)];
        for (label, phase) in cases {
            let label = label.replace(' ', "");
            let pauli: PauliString = label.parse().unwrap();
            assert_eq!(pauli.phase(), phase, "label {}", label);
            assert_eq!(pauli.paulis(), &[Pauli::Y, Pauli::X]);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("XQ".parse::<PauliString>(), Err(StateError::InvalidPauliLabel(_))));
    }

    #[test]
    fn test_display_round_trips_phase() {
        for label in ["IXZ", "-iXX", "-Y", "iZ"] {
            let pauli: PauliString = label.parse().unwrap();
            assert_eq!(pauli.to_string(), label);
        }
    }

    #[test]
    fn test_rightmost_character_is_qubit_zero() {
        let pauli: PauliString = "XIZ".parse().unwrap();
        assert_eq!(pauli.paulis(), &[Pauli::Z, Pauli::I, Pauli::X]);
        assert_eq!(PauliString::from_paulis(vec![Pauli::Y, Pauli::I]).to_string(), "IY");
    }

    #[test]
    fn test_qubit_wise_commutes() {
        let zz: PauliString = "ZZ".parse().unwrap();
        let zi: PauliString = "ZI".parse().unwrap();
        let xx: PauliString = "XX".parse().unwrap();
        let ix: PauliString = "IX".parse().unwrap();
        assert!(zz.qubit_wise_commutes(&zi));
        assert!(zi.qubit_wise_commutes(&ix));
        // ZZ and XX commute, but not qubit-wise
        assert!(!zz.qubit_wise_commutes(&xx));
        assert!(!zz.qubit_wise_commutes(&"Z".parse().unwrap()));
    }

    #[test]
    fn test_restrict() {
        let pauli: PauliString = "-XYZ".parse().unwrap();
        // qubit 0 = Z, qubit 1 = Y, qubit 2 = X
        let sub = pauli.restrict(&[2, 0]).unwrap();
        assert_eq!(sub.paulis(), &[Pauli::X, Pauli::Z]);
        assert_eq!(sub.to_string(), "ZX");
        assert_eq!(pauli.restrict(&[1]).unwrap().to_string(), "Y");
        assert!(sub.has_unit_phase());
        assert!(pauli.restrict(&[3]).is_err());
    }

    #[test]
    fn test_support_and_identity() {
        let pauli: PauliString = "IXIZ".parse().unwrap();
        assert_eq!(pauli.support(), vec![0, 2]);
        assert!(!pauli.is_identity());
        assert!(PauliString::identity(3).is_identity());
    }

    #[test]
    fn test_bell_expectation_values() {
        let state = bell();
        for (label, expected) in [("ZZ", 1.0), ("XX", 1.0), ("YY", -1.0), ("ZI", 0.0), ("-ZZ", -1.0), ("XY", 0.0)] {
            let pauli: PauliString = label.parse().unwrap();
            assert_relative_eq!(pauli.expectation_value(&state).unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_expectation_respects_qubit_order() {
        // |q0 = 1, q1 = 0⟩
        let state = DenseState::from_amplitudes(2, &[c(0.0), c(1.0), c(0.0), c(0.0)]).unwrap();
        let z0: PauliString = "IZ".parse().unwrap();
        let z1: PauliString = "ZI".parse().unwrap();
        assert_relative_eq!(z0.expectation_value(&state).unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(z1.expectation_value(&state).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_y_expectation_on_plus_i_state() {
        // (|0⟩ + i|1⟩)/√2 is the +1 eigenstate of Y
        let state = DenseState::from_amplitudes(1, &[c(FRAC_1_SQRT_2), Complex64::new(0.0, FRAC_1_SQRT_2)]).unwrap();
        let y: PauliString = "Y".parse().unwrap();
        assert_relative_eq!(y.expectation_value(&state).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pauli_list() {
        let mut list = PauliList::from_labels(&["ZZ", "XI"]).unwrap();
        assert_eq!(list.num_qubits(), 2);
        assert!(list.push("Z".parse().unwrap()).is_err());
        list.push("YY".parse().unwrap()).unwrap();
        assert_eq!(list.to_string(), "[ZZ, XI, YY]");
        assert!(PauliList::from_labels(&["ZZ", "Z"]).is_err());
        assert_eq!(PauliList::default().num_qubits(), 0);
    }
}
