//! Quasiprobability bases
//!
//! A basis writes a two-qubit channel as `Σ_i c_i · (A_i ⊗ B_i)` where each
//! `A_i`, `B_i` is a sequence of local operations. A `Measure` in a
//! sequence is a signed measurement: its outcome multiplies the term by
//! `(-1)^outcome` during reconstruction.

use crate::error::{CuttingError, Result};
use qknit_core::{Gate, Instruction, Operation};
use qknit_gates::{Hadamard, PauliZ, RotationY, RotationZ, SGate, SGateDagger};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// One term of a basis: an operation sequence per qubit
pub type QpdMap = Vec<Vec<Operation>>;

/// Quasiprobability decomposition of a channel
#[derive(Clone, Debug, PartialEq)]
pub struct QpdBasis {
    maps: Vec<QpdMap>,
    coeffs: Vec<f64>,
}

impl QpdBasis {
    /// Create a basis from its terms
    ///
    /// # Errors
    /// Returns error if `maps` is empty, its length differs from `coeffs`,
    /// maps act on different numbers of qubits, a map contains a
    /// multi-qubit operation, or the coefficients are not finite or all zero
    pub fn new(maps: Vec<QpdMap>, coeffs: Vec<f64>) -> Result<Self> {
        if maps.is_empty() {
            return Err(CuttingError::InvalidBasis("at least one map is required".into()));
        }
        if maps.len() != coeffs.len() {
            return Err(CuttingError::InvalidBasis(format!(
                "{} maps but {} coefficients",
                maps.len(),
                coeffs.len()
            )));
        }
        let num_qubits = maps[0].len();
        if num_qubits == 0 || maps.iter().any(|m| m.len() != num_qubits) {
            return Err(CuttingError::InvalidBasis(
                "every map must hold one operation sequence per qubit".into(),
            ));
        }
        if let Some(op) = maps.iter().flatten().flatten().find(|op| op.num_qubits() != 1) {
            return Err(CuttingError::InvalidBasis(format!(
                "map operations must act on one qubit, found {}",
                op.name()
            )));
        }
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(CuttingError::InvalidBasis("coefficients must be finite".into()));
        }
        if coeffs.iter().all(|&c| c == 0.0) {
            return Err(CuttingError::InvalidBasis("at least one coefficient must be nonzero".into()));
        }
        Ok(Self { maps, coeffs })
    }

    pub fn maps(&self) -> &[QpdMap] {
        &self.maps
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Number of qubits each map acts on
    pub fn num_qubits(&self) -> usize {
        self.maps[0].len()
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Sum of absolute coefficients
    pub fn kappa(&self) -> f64 {
        self.coeffs.iter().map(|c| c.abs()).sum()
    }

    /// Sampling overhead, κ²
    pub fn overhead(&self) -> f64 {
        self.kappa().powi(2)
    }

    /// Probability of sampling each term, `|c_i| / κ`
    pub fn probabilities(&self) -> Vec<f64> {
        let kappa = self.kappa();
        self.coeffs.iter().map(|c| c.abs() / kappa).collect()
    }

    /// Number of signed measurements in map `map_id`
    pub fn num_measurements(&self, map_id: usize) -> usize {
        self.maps.get(map_id).map_or(0, |map| {
            map.iter()
                .flatten()
                .filter(|op| matches!(op, Operation::Measure))
                .count()
        })
    }

    /// Decomposition of a supported two-qubit gate
    ///
    /// All supported gates reduce to `RZZ` by local basis changes:
    /// `rxx`, `ryy`, `rzz`, `crx`, `cry`, `crz`, `cp`, `cs`, `csdg`, `cz`,
    /// `cx`, `cy`, `ch`, `csx`.
    ///
    /// # Example
    /// ```
    /// use qknit_cutting::QpdBasis;
    /// use qknit_gates::CZ;
    ///
    /// let basis = QpdBasis::from_gate(&CZ).unwrap();
    /// assert!((basis.kappa() - 3.0).abs() < 1e-12);
    /// ```
    pub fn from_gate(gate: &dyn Gate) -> Result<Self> {
        let unsupported = || CuttingError::UnsupportedGate {
            name: gate.name().to_string(),
        };
        if gate.num_qubits() != 2 {
            return Err(unsupported());
        }
        let angle = || gate.params().first().copied().ok_or_else(unsupported);
        let on_target = |ops: Vec<Operation>| [Vec::new(), ops];
        let on_both = |ops: Vec<Operation>| [ops.clone(), ops];

        let basis = match gate.name() {
            "rzz" => rzz(angle()?),
            "rxx" => rzz(angle()?).with_local_ops(on_both(vec![op(Hadamard)]), on_both(vec![op(Hadamard)])),
            "ryy" => rzz(angle()?).with_local_ops(on_both(to_z_from_y()), on_both(from_z_to_y())),
            "crz" => crz(angle()?),
            "crx" => crz(angle()?).with_local_ops(on_target(vec![op(Hadamard)]), on_target(vec![op(Hadamard)])),
            "cry" => crz(angle()?).with_local_ops(on_target(to_z_from_y()), on_target(from_z_to_y())),
            "cp" => cphase(angle()?),
            "cz" => cphase(PI),
            "cs" => cphase(FRAC_PI_2),
            "csdg" => cphase(-FRAC_PI_2),
            "cx" => cphase(PI).with_local_ops(on_target(vec![op(Hadamard)]), on_target(vec![op(Hadamard)])),
            "cy" => cphase(PI).with_local_ops(
                on_target(vec![op(SGateDagger), op(Hadamard)]),
                on_target(vec![op(Hadamard), op(SGate)]),
            ),
            "ch" => cphase(PI).with_local_ops(
                on_target(vec![op(RotationY::new(-FRAC_PI_4))]),
                on_target(vec![op(RotationY::new(FRAC_PI_4))]),
            ),
            "csx" => cphase(FRAC_PI_2)
                .with_local_ops(on_target(vec![op(Hadamard)]), on_target(vec![op(Hadamard)])),
            _ => return Err(unsupported()),
        };
        Ok(basis)
    }

    /// Decomposition of the gate in `instruction`
    pub fn from_instruction(instruction: &Instruction) -> Result<Self> {
        match instruction.gate() {
            Some(gate) => Self::from_gate(gate.as_ref()),
            None => Err(CuttingError::UnsupportedGate {
                name: instruction.name().to_string(),
            }),
        }
    }

    /// Surround every map with fixed local operations, `before` applied
    /// first
    fn with_local_ops(mut self, before: [Vec<Operation>; 2], after: [Vec<Operation>; 2]) -> Self {
        for map in &mut self.maps {
            for (qubit, sequence) in map.iter_mut().enumerate() {
                let mut ops = before[qubit].clone();
                ops.append(sequence);
                ops.extend(after[qubit].iter().cloned());
                *sequence = ops;
            }
        }
        self
    }
}

fn op<G: Gate + 'static>(gate: G) -> Operation {
    Operation::gate(gate)
}

/// Rotates the Y eigenbasis onto Z (S†, then H)
fn to_z_from_y() -> Vec<Operation> {
    vec![op(SGateDagger), op(Hadamard)]
}

/// Inverse of [`to_z_from_y`] (H, then S)
fn from_z_to_y() -> Vec<Operation> {
    vec![op(Hadamard), op(SGate)]
}

/// RZZ(θ) = cos²(θ/2)·[I⊗I] + sin²(θ/2)·[Z⊗Z]
///        + sin(θ)/2·([M⊗S] − [M⊗S†] + [S⊗M] − [S†⊗M])
fn rzz(theta: f64) -> QpdBasis {
    let (sin, cos) = (theta / 2.0).sin_cos();
    let cross = theta.sin() / 2.0;
    let m = || Operation::Measure;
    let maps = vec![
        vec![vec![], vec![]],
        vec![vec![op(PauliZ)], vec![op(PauliZ)]],
        vec![vec![m()], vec![op(SGate)]],
        vec![vec![m()], vec![op(SGateDagger)]],
        vec![vec![op(SGate)], vec![m()]],
        vec![vec![op(SGateDagger)], vec![m()]],
    ];
    let coeffs = vec![cos * cos, sin * sin, cross, -cross, cross, -cross];
    QpdBasis { maps, coeffs }
}

/// CRZ(θ) = RZZ(−θ/2) followed by RZ(θ/2) on the target
fn crz(theta: f64) -> QpdBasis {
    rzz(-theta / 2.0).with_local_ops(
        [Vec::new(), Vec::new()],
        [Vec::new(), vec![op(RotationZ::new(theta / 2.0))]],
    )
}

/// CP(λ) = RZZ(−λ/2) followed by RZ(λ/2) on both qubits, up to global phase
fn cphase(lambda: f64) -> QpdBasis {
    let rz = || vec![op(RotationZ::new(lambda / 2.0))];
    rzz(-lambda / 2.0).with_local_ops([Vec::new(), Vec::new()], [rz(), rz()])
}
