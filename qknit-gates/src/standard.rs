//! Standard quantum gate implementations with pre-computed matrices

use crate::matrices;
use num_complex::Complex64;
use qknit_core::Gate;
use std::any::Any;

/// Defines a parameter-free gate backed by a constant matrix
macro_rules! fixed_gate {
    ($(#[$meta:meta])* $gate_type:ident, $name:literal, $num_qubits:literal, $dim:literal, hermitian = $hermitian:literal, $matrix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $gate_type;

        impl $gate_type {
            /// Returns the gate matrix
            #[inline]
            pub fn matrix() -> [[Complex64; $dim]; $dim] {
                $matrix
            }

            /// Returns the matrix as a flattened vector (for Gate trait)
            #[inline]
            fn matrix_vec() -> Vec<Complex64> {
                Self::matrix().iter().flatten().copied().collect()
            }
        }

        impl Gate for $gate_type {
            fn name(&self) -> &str {
                $name
            }

            fn num_qubits(&self) -> usize {
                $num_qubits
            }

            fn is_hermitian(&self) -> bool {
                $hermitian
            }

            fn matrix(&self) -> Option<Vec<Complex64>> {
                Some(Self::matrix_vec())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

/// Defines a gate with a single rotation angle
macro_rules! rotation_gate {
    ($(#[$meta:meta])* $gate_type:ident, $name:literal, $num_qubits:literal, $dim:literal, $matrix_fn:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $gate_type {
            theta: f64,
        }

        impl $gate_type {
            /// Creates the gate with the given angle
            pub const fn new(theta: f64) -> Self {
                Self { theta }
            }

            /// Returns the rotation angle
            pub const fn angle(&self) -> f64 {
                self.theta
            }

            /// Computes the matrix for this angle
            #[inline]
            pub fn matrix(&self) -> [[Complex64; $dim]; $dim] {
                ($matrix_fn)(self.theta)
            }
        }

        impl Gate for $gate_type {
            fn name(&self) -> &str {
                $name
            }

            fn num_qubits(&self) -> usize {
                $num_qubits
            }

            fn params(&self) -> Vec<f64> {
                vec![self.theta]
            }

            fn description(&self) -> String {
                format!("{}({:.4})", $name, self.theta)
            }

            fn matrix(&self) -> Option<Vec<Complex64>> {
                Some($gate_type::matrix(self).iter().flatten().copied().collect())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

// ============================================================================
// Single-Qubit Gates
// ============================================================================

fixed_gate!(
    /// Identity gate
    Identity, "id", 1, 2, hermitian = true, matrices::IDENTITY
);

fixed_gate!(
    /// Hadamard gate
    ///
    /// Creates superposition: H|0⟩ = (|0⟩ + |1⟩)/√2
    Hadamard, "h", 1, 2, hermitian = true, matrices::HADAMARD
);

fixed_gate!(
    /// Pauli-X gate (NOT gate)
    PauliX, "x", 1, 2, hermitian = true, matrices::PAULI_X
);

fixed_gate!(
    /// Pauli-Y gate
    PauliY, "y", 1, 2, hermitian = true, matrices::PAULI_Y
);

fixed_gate!(
    /// Pauli-Z gate
    ///
    /// Phase flip: Z|0⟩ = |0⟩, Z|1⟩ = -|1⟩
    PauliZ, "z", 1, 2, hermitian = true, matrices::PAULI_Z
);

fixed_gate!(
    /// S gate (√Z)
    SGate, "s", 1, 2, hermitian = false, matrices::S_GATE
);

fixed_gate!(
    /// S† gate
    SGateDagger, "sdg", 1, 2, hermitian = false, matrices::S_GATE_DAGGER
);

fixed_gate!(
    /// T gate (√S)
    TGate, "t", 1, 2, hermitian = false, matrices::T_GATE
);

fixed_gate!(
    /// T† gate
    TGateDagger, "tdg", 1, 2, hermitian = false, matrices::T_GATE_DAGGER
);

fixed_gate!(
    /// √X gate
    SXGate, "sx", 1, 2, hermitian = false, matrices::SX_GATE
);

fixed_gate!(
    /// √X† gate
    SXGateDagger, "sxdg", 1, 2, hermitian = false, matrices::SX_GATE_DAGGER
);

rotation_gate!(
    /// Rotation around the X axis
    RotationX, "rx", 1, 2, matrices::rotation_x
);

rotation_gate!(
    /// Rotation around the Y axis
    RotationY, "ry", 1, 2, matrices::rotation_y
);

rotation_gate!(
    /// Rotation around the Z axis
    RotationZ, "rz", 1, 2, matrices::rotation_z
);

rotation_gate!(
    /// Phase gate P(λ) = diag(1, e^(iλ))
    Phase, "p", 1, 2, matrices::phase
);

// ============================================================================
// Two-Qubit Gates (control is the first qubit)
// ============================================================================

fixed_gate!(
    /// Controlled-NOT gate
    CNot, "cx", 2, 4, hermitian = true, matrices::CNOT
);

fixed_gate!(
    /// Controlled-Y gate
    CY, "cy", 2, 4, hermitian = true, matrices::CY
);

fixed_gate!(
    /// Controlled-Z gate
    CZ, "cz", 2, 4, hermitian = true, matrices::CZ
);

fixed_gate!(
    /// Controlled-Hadamard gate
    CH, "ch", 2, 4, hermitian = true, matrices::controlled(&matrices::HADAMARD)
);

fixed_gate!(
    /// Controlled-S gate
    CS, "cs", 2, 4, hermitian = false, matrices::controlled(&matrices::S_GATE)
);

fixed_gate!(
    /// Controlled-S† gate
    CSdg, "csdg", 2, 4, hermitian = false, matrices::controlled(&matrices::S_GATE_DAGGER)
);

fixed_gate!(
    /// Controlled-√X gate
    CSX, "csx", 2, 4, hermitian = false, matrices::controlled(&matrices::SX_GATE)
);

fixed_gate!(
    /// SWAP gate
    Swap, "swap", 2, 4, hermitian = true, matrices::SWAP
);

rotation_gate!(
    /// Controlled-phase gate
    CPhase, "cp", 2, 4, matrices::controlled_phase
);

rotation_gate!(
    /// Controlled RX rotation
    CRX, "crx", 2, 4, |theta: f64| matrices::controlled(&matrices::rotation_x(theta))
);

rotation_gate!(
    /// Controlled RY rotation
    CRY, "cry", 2, 4, |theta: f64| matrices::controlled(&matrices::rotation_y(theta))
);

rotation_gate!(
    /// Controlled RZ rotation
    CRZ, "crz", 2, 4, |theta: f64| matrices::controlled(&matrices::rotation_z(theta))
);

rotation_gate!(
    /// XX rotation, exp(-iθ/2 X⊗X)
    RXX, "rxx", 2, 4, matrices::rxx
);

rotation_gate!(
    /// YY rotation, exp(-iθ/2 Y⊗Y)
    RYY, "ryy", 2, 4, matrices::ryy
);

rotation_gate!(
    /// ZZ rotation, exp(-iθ/2 Z⊗Z)
    RZZ, "rzz", 2, 4, matrices::rzz
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_properties() {
        assert_eq!(Hadamard.name(), "h");
        assert_eq!(Hadamard.num_qubits(), 1);
        assert!(Hadamard.is_hermitian());
        assert!(!SGate.is_hermitian());

        assert_eq!(CNot.name(), "cx");
        assert_eq!(CNot.num_qubits(), 2);
    }

    #[test]
    fn test_matrix_access() {
        let h_matrix = Hadamard::matrix();
        assert_eq!(h_matrix.len(), 2);

        let cnot = Gate::matrix(&CNot).unwrap();
        assert_eq!(cnot.len(), 16);
    }

    #[test]
    fn test_parameterized_gates() {
        let rx = RotationX::new(PI / 2.0);
        assert_eq!(rx.name(), "rx");
        assert_eq!(rx.angle(), PI / 2.0);
        assert_eq!(rx.params(), vec![PI / 2.0]);
        assert!(rx.description().contains("rx"));

        let rzz = RZZ::new(0.3);
        assert_eq!(rzz.num_qubits(), 2);
        assert_eq!(Gate::matrix(&rzz).unwrap().len(), 16);
    }

    #[test]
    fn test_controlled_rotation_matrix() {
        let crz = CRZ::new(PI);
        let m = crz.matrix();
        // control |0⟩ block is identity
        assert_eq!(m[0][0], Complex64::new(1.0, 0.0));
        assert_eq!(m[1][1], Complex64::new(1.0, 0.0));
        // control |1⟩ block is RZ(π)
        assert!((m[2][2] - Complex64::new(0.0, -1.0)).norm() < 1e-12);
        assert!((m[3][3] - Complex64::new(0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_downcast() {
        let gate: &dyn Gate = &RZZ::new(0.5);
        let rzz = gate.as_any().downcast_ref::<RZZ>().unwrap();
        assert_eq!(rzz.angle(), 0.5);
        assert!(gate.as_any().downcast_ref::<CNot>().is_none());
    }
}
