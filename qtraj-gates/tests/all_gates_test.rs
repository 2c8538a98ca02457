//! Algebraic tests for the standard gate catalogue

use approx::assert_relative_eq;
use num_complex::Complex64;
use qtraj_gates::{ComplexExt, GateMatrix};
use std::f64::consts::PI;

const EPSILON: f64 = 1e-10;

type M = GateMatrix<f64>;

fn catalogue() -> Vec<(&'static str, M)> {
    vec![
        ("I", M::identity()),
        ("X", M::pauli_x()),
        ("Y", M::pauli_y()),
        ("Z", M::pauli_z()),
        ("H", M::hadamard()),
        ("S", M::s()),
        ("Sdg", M::s_dagger()),
        ("T", M::t()),
        ("Tdg", M::t_dagger()),
    ]
}

fn angles() -> [f64; 5] {
    [0.0, PI / 4.0, PI / 2.0, PI, 2.0 * PI]
}

// ============================================================================
// Unitarity
// ============================================================================

#[test]
fn test_catalogue_is_unitary() {
    for (name, gate) in catalogue() {
        assert!(gate.is_unitary(EPSILON), "{} is not unitary", name);
    }
}

#[test]
fn test_catalogue_dagger_product_matches_identity_per_entry() {
    let identity = M::identity();
    for (name, gate) in catalogue() {
        let product = gate.dagger() * gate;
        for i in 0..2 {
            for j in 0..2 {
                let got = product.entry(i, j);
                let want = identity.entry(i, j);
                assert!(
                    (got.re - want.re).abs() <= EPSILON && (got.im - want.im).abs() <= EPSILON,
                    "{}: (U†U)[{}][{}] = {}",
                    name,
                    i,
                    j,
                    got
                );
            }
        }
    }
}

#[test]
fn test_rotations_are_unitary() {
    for theta in angles() {
        assert!(M::rx(theta).is_unitary(EPSILON), "RX({})", theta);
        assert!(M::ry(theta).is_unitary(EPSILON), "RY({})", theta);
        assert!(M::rz(theta).is_unitary(EPSILON), "RZ({})", theta);
        assert!(M::phase(theta).is_unitary(EPSILON), "P({})", theta);
    }
}

// ============================================================================
// Algebraic identities
// ============================================================================

#[test]
fn test_self_inverse_gates() {
    let identity = M::identity();
    for gate in [M::hadamard(), M::pauli_x(), M::pauli_y(), M::pauli_z()] {
        assert!((gate * gate).approx_eq(&identity, EPSILON));
    }
}

#[test]
fn test_square_roots() {
    assert!((M::s() * M::s()).approx_eq(&M::pauli_z(), EPSILON));
    assert!((M::t() * M::t()).approx_eq(&M::s(), EPSILON));
}

#[test]
fn test_adjoint_pairs() {
    let identity = M::identity();
    assert!((M::s() * M::s_dagger()).approx_eq(&identity, EPSILON));
    assert!((M::t() * M::t_dagger()).approx_eq(&identity, EPSILON));
    assert!(M::s().dagger().approx_eq(&M::s_dagger(), EPSILON));
    assert!(M::t().dagger().approx_eq(&M::t_dagger(), EPSILON));
}

#[test]
fn test_xyz_is_i_times_identity() {
    let xyz = M::pauli_x() * M::pauli_y() * M::pauli_z();
    let i_identity = M::identity().scale(Complex64::new(0.0, 1.0));
    assert!(xyz.approx_eq(&i_identity, EPSILON));
    assert!(xyz.approx_eq_up_to_global_phase(&M::identity(), EPSILON));
}

#[test]
fn test_hadamard_conjugates_x_to_z() {
    let h = M::hadamard();
    assert!((h * M::pauli_x() * h).approx_eq(&M::pauli_z(), EPSILON));
    assert!((h * M::pauli_z() * h).approx_eq(&M::pauli_x(), EPSILON));
}

// ============================================================================
// Parametrized gates
// ============================================================================

#[test]
fn test_zero_angle_rotations_are_identity() {
    let identity = M::identity();
    assert!(M::rx(0.0).approx_eq(&identity, EPSILON));
    assert!(M::ry(0.0).approx_eq(&identity, EPSILON));
    assert!(M::rz(0.0).approx_eq(&identity, EPSILON));
    assert!(M::phase(0.0).approx_eq(&identity, EPSILON));
}

#[test]
fn test_rotation_periodicity_up_to_global_phase() {
    for theta in [0.1, 0.7, PI / 3.0, 2.5] {
        let rx = M::rx(theta);
        let wrapped = M::rx(theta + 2.0 * PI);
        assert!(wrapped.approx_eq_up_to_global_phase(&rx, EPSILON));
        // The 2π shift is a sign flip, not the identity
        assert!(wrapped.approx_eq(&rx.scale(Complex64::new(-1.0, 0.0)), EPSILON));

        assert!(M::ry(theta + 2.0 * PI).approx_eq_up_to_global_phase(&M::ry(theta), EPSILON));
        assert!(M::rz(theta + 2.0 * PI).approx_eq_up_to_global_phase(&M::rz(theta), EPSILON));
    }
}

#[test]
fn test_phase_matches_named_gates() {
    assert!(M::phase(PI).approx_eq(&M::pauli_z(), EPSILON));
    assert!(M::phase(PI / 2.0).approx_eq(&M::s(), EPSILON));
    assert!(M::phase(PI / 4.0).approx_eq(&M::t(), EPSILON));
}

#[test]
fn test_rz_equals_phase_up_to_global_phase() {
    for theta in angles() {
        assert!(M::rz(theta).approx_eq_up_to_global_phase(&M::phase(theta), EPSILON));
    }
}

#[test]
fn test_rotation_composition_adds_angles() {
    let a = 0.3;
    let b = 1.1;
    assert!((M::rx(a) * M::rx(b)).approx_eq(&M::rx(a + b), EPSILON));
    assert!((M::ry(a) * M::ry(b)).approx_eq(&M::ry(a + b), EPSILON));
    assert!((M::rz(a) * M::rz(b)).approx_eq(&M::rz(a + b), EPSILON));
}

#[test]
fn test_ry_half_pi_maps_zero_to_plus() {
    let (a0, a1) = M::ry(PI / 2.0).apply_to(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
    assert_relative_eq!(a0.re, 1.0 / 2.0_f64.sqrt(), epsilon = EPSILON);
    assert_relative_eq!(a1.re, 1.0 / 2.0_f64.sqrt(), epsilon = EPSILON);
    assert!(a0.approx_eq(&a1, EPSILON));
}
