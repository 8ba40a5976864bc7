//! Gate matrices
//!
//! Fixed gates are compile-time constants; parameterized gates are built by
//! the functions at the bottom of this module. Two-qubit matrices use the
//! first qubit argument as the most significant bit of the basis index, so
//! for controlled gates the control is the first qubit.

use num_complex::Complex64;

// Compile-time constant helpers
const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

// Single-qubit gate matrices (2x2)

/// Hadamard gate matrix
/// H = 1/√2 * [[1,  1],
///             [1, -1]]
pub const HADAMARD: [[Complex64; 2]; 2] = [
    [
        Complex64::new(INV_SQRT2, 0.0),
        Complex64::new(INV_SQRT2, 0.0),
    ],
    [
        Complex64::new(INV_SQRT2, 0.0),
        Complex64::new(-INV_SQRT2, 0.0),
    ],
];

/// Pauli-X gate matrix (NOT gate)
pub const PAULI_X: [[Complex64; 2]; 2] = [[ZERO, ONE], [ONE, ZERO]];

/// Pauli-Y gate matrix
/// Y = [[0, -i],
///      [i,  0]]
pub const PAULI_Y: [[Complex64; 2]; 2] = [[ZERO, NEG_I], [I, ZERO]];

/// Pauli-Z gate matrix
pub const PAULI_Z: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// Identity gate matrix
pub const IDENTITY: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, ONE]];

/// S gate matrix (√Z)
/// S = [[1, 0],
///      [0, i]]
pub const S_GATE: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, I]];

/// S† gate matrix
pub const S_GATE_DAGGER: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_I]];

/// T gate matrix (√S)
/// T = [[1, 0],
///      [0, e^(iπ/4)]]
pub const T_GATE: [[Complex64; 2]; 2] = [
    [ONE, ZERO],
    [ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)],
];

/// T† gate matrix
pub const T_GATE_DAGGER: [[Complex64; 2]; 2] = [
    [ONE, ZERO],
    [ZERO, Complex64::new(INV_SQRT2, -INV_SQRT2)],
];

/// SX gate matrix (√X gate)
/// SX = 1/2 * [[1+i, 1-i],
///             [1-i, 1+i]]
pub const SX_GATE: [[Complex64; 2]; 2] = [
    [Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5)],
    [Complex64::new(0.5, -0.5), Complex64::new(0.5, 0.5)],
];

/// SX† gate matrix
pub const SX_GATE_DAGGER: [[Complex64; 2]; 2] = [
    [Complex64::new(0.5, -0.5), Complex64::new(0.5, 0.5)],
    [Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5)],
];

// Two-qubit gate matrices (4x4)

/// CNOT gate matrix (Controlled-NOT)
/// CNOT = [[1, 0, 0, 0],
///         [0, 1, 0, 0],
///         [0, 0, 0, 1],
///         [0, 0, 1, 0]]
pub const CNOT: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
    [ZERO, ZERO, ONE, ZERO],
];

/// CZ gate matrix (Controlled-Z)
pub const CZ: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ZERO, ZERO, NEG_ONE],
];

/// CY gate matrix (Controlled-Y)
pub const CY: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, NEG_I],
    [ZERO, ZERO, I, ZERO],
];

/// SWAP gate matrix
pub const SWAP: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// Controlled version of a single-qubit gate, control on the first qubit
#[inline]
pub fn controlled(u: &[[Complex64; 2]; 2]) -> [[Complex64; 4]; 4] {
    [
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, u[0][0], u[0][1]],
        [ZERO, ZERO, u[1][0], u[1][1]],
    ]
}

/// Generate rotation-X gate matrix for a given angle
/// RX(θ) = [[cos(θ/2),    -i·sin(θ/2)],
///          [-i·sin(θ/2),  cos(θ/2)]]
#[inline]
pub fn rotation_x(theta: f64) -> [[Complex64; 2]; 2] {
    let half_theta = theta / 2.0;
    let cos_val = half_theta.cos();
    let sin_val = half_theta.sin();

    [
        [Complex64::new(cos_val, 0.0), Complex64::new(0.0, -sin_val)],
        [Complex64::new(0.0, -sin_val), Complex64::new(cos_val, 0.0)],
    ]
}

/// Generate rotation-Y gate matrix for a given angle
/// RY(θ) = [[cos(θ/2),  -sin(θ/2)],
///          [sin(θ/2),   cos(θ/2)]]
#[inline]
pub fn rotation_y(theta: f64) -> [[Complex64; 2]; 2] {
    let half_theta = theta / 2.0;
    let cos_val = half_theta.cos();
    let sin_val = half_theta.sin();

    [
        [Complex64::new(cos_val, 0.0), Complex64::new(-sin_val, 0.0)],
        [Complex64::new(sin_val, 0.0), Complex64::new(cos_val, 0.0)],
    ]
}

/// Generate rotation-Z gate matrix for a given angle
/// RZ(θ) = [[e^(-iθ/2),  0       ],
///          [0,          e^(iθ/2)]]
#[inline]
pub fn rotation_z(theta: f64) -> [[Complex64; 2]; 2] {
    let half_theta = theta / 2.0;

    [
        [Complex64::new(half_theta.cos(), -half_theta.sin()), ZERO],
        [ZERO, Complex64::new(half_theta.cos(), half_theta.sin())],
    ]
}

/// Generate phase gate matrix for a given angle
/// P(θ) = [[1, 0     ],
///         [0, e^(iθ)]]
#[inline]
pub fn phase(theta: f64) -> [[Complex64; 2]; 2] {
    [[ONE, ZERO], [ZERO, Complex64::new(theta.cos(), theta.sin())]]
}

/// Generate controlled-phase gate matrix
#[inline]
pub fn controlled_phase(theta: f64) -> [[Complex64; 4]; 4] {
    controlled(&phase(theta))
}

/// Generate RXX gate matrix (two-qubit XX rotation)
/// RXX(θ) = exp(-i θ/2 X⊗X)
#[inline]
pub fn rxx(theta: f64) -> [[Complex64; 4]; 4] {
    let half_theta = theta / 2.0;
    let cos_val = Complex64::new(half_theta.cos(), 0.0);
    let sin_val = Complex64::new(0.0, -half_theta.sin());

    [
        [cos_val, ZERO, ZERO, sin_val],
        [ZERO, cos_val, sin_val, ZERO],
        [ZERO, sin_val, cos_val, ZERO],
        [sin_val, ZERO, ZERO, cos_val],
    ]
}

/// Generate RYY gate matrix (two-qubit YY rotation)
/// RYY(θ) = exp(-i θ/2 Y⊗Y)
#[inline]
pub fn ryy(theta: f64) -> [[Complex64; 4]; 4] {
    let half_theta = theta / 2.0;
    let cos_val = Complex64::new(half_theta.cos(), 0.0);
    let sin_val = Complex64::new(0.0, half_theta.sin());

    [
        [cos_val, ZERO, ZERO, sin_val],
        [ZERO, cos_val, -sin_val, ZERO],
        [ZERO, -sin_val, cos_val, ZERO],
        [sin_val, ZERO, ZERO, cos_val],
    ]
}

/// Generate RZZ gate matrix (two-qubit ZZ rotation)
/// RZZ(θ) = exp(-i θ/2 Z⊗Z)
#[inline]
pub fn rzz(theta: f64) -> [[Complex64; 4]; 4] {
    let half_theta = theta / 2.0;
    let e_neg = Complex64::new(half_theta.cos(), -half_theta.sin());
    let e_pos = Complex64::new(half_theta.cos(), half_theta.sin());

    [
        [e_neg, ZERO, ZERO, ZERO],
        [ZERO, e_pos, ZERO, ZERO],
        [ZERO, ZERO, e_pos, ZERO],
        [ZERO, ZERO, ZERO, e_neg],
    ]
}
