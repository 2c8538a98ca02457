//! 2×2 gate matrices
//!
//! [`GateMatrix`] is an immutable 2×2 complex matrix, independent of the
//! register size. The standard catalogue is built from closed forms:
//!
//! | Gate | Matrix |
//! |------|--------|
//! | I | `[[1, 0], [0, 1]]` |
//! | X | `[[0, 1], [1, 0]]` |
//! | Y | `[[0, -i], [i, 0]]` |
//! | Z | `[[1, 0], [0, -1]]` |
//! | H | `1/√2 · [[1, 1], [1, -1]]` |
//! | S | `[[1, 0], [0, i]]` |
//! | T | `[[1, 0], [0, e^(iπ/4)]]` |
//! | RX(θ) | `[[cos(θ/2), -i·sin(θ/2)], [-i·sin(θ/2), cos(θ/2)]]` |
//! | RY(θ) | `[[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]` |
//! | RZ(θ) | `[[e^(-iθ/2), 0], [0, e^(iθ/2)]]` |
//! | P(φ) | `[[1, 0], [0, e^(iφ)]]` |
//!
//! # Composition order
//!
//! `a * b` is the ordinary matrix product. Applied to a state by
//! left-multiplication, it acts as `b` first and then `a`:
//!
//! ```
//! use qtraj_gates::GateMatrix;
//!
//! let s = GateMatrix::<f64>::s();
//! let h = GateMatrix::<f64>::hadamard();
//! // "H, then S"
//! let hs = s * h;
//! assert!(hs.approx_eq(&s.compose(&h), 0.0));
//! assert!(hs.is_unitary(1e-10));
//! ```

use crate::complex::{ComplexExt, Real};
use num_complex::Complex;
use std::ops::Mul;

/// Immutable 2×2 complex matrix, stored row-major
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateMatrix<T: Real = f64> {
    entries: [[Complex<T>; 2]; 2],
}

#[inline]
fn cx<T: Real>(re: T, im: T) -> Complex<T> {
    Complex::new(re, im)
}

#[inline]
fn zero<T: Real>() -> Complex<T> {
    Complex::new(T::zero(), T::zero())
}

#[inline]
fn one<T: Real>() -> Complex<T> {
    Complex::new(T::one(), T::zero())
}

impl<T: Real> GateMatrix<T> {
    /// Build a matrix from its rows
    #[inline]
    pub fn from_rows(entries: [[Complex<T>; 2]; 2]) -> Self {
        Self { entries }
    }

    /// Build a diagonal matrix `[[d0, 0], [0, d1]]`
    #[inline]
    pub fn diagonal(d0: Complex<T>, d1: Complex<T>) -> Self {
        Self::from_rows([[d0, zero()], [zero(), d1]])
    }

    /// Row-major entries
    #[inline]
    pub fn entries(&self) -> &[[Complex<T>; 2]; 2] {
        &self.entries
    }

    /// Entry at `(row, col)`
    ///
    /// # Panics
    /// Panics if `row` or `col` is greater than 1.
    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> Complex<T> {
        self.entries[row][col]
    }

    pub fn identity() -> Self {
        Self::diagonal(one(), one())
    }

    pub fn pauli_x() -> Self {
        Self::from_rows([[zero(), one()], [one(), zero()]])
    }

    pub fn pauli_y() -> Self {
        Self::from_rows([
            [zero(), cx(T::zero(), -T::one())],
            [cx(T::zero(), T::one()), zero()],
        ])
    }

    pub fn pauli_z() -> Self {
        Self::diagonal(one(), cx(-T::one(), T::zero()))
    }

    pub fn hadamard() -> Self {
        let h = T::FRAC_1_SQRT_2();
        Self::from_rows([
            [cx(h, T::zero()), cx(h, T::zero())],
            [cx(h, T::zero()), cx(-h, T::zero())],
        ])
    }

    /// S = √Z
    pub fn s() -> Self {
        Self::diagonal(one(), cx(T::zero(), T::one()))
    }

    /// S†
    pub fn s_dagger() -> Self {
        Self::diagonal(one(), cx(T::zero(), -T::one()))
    }

    /// T = √S, with e^(iπ/4) = (1 + i)/√2
    pub fn t() -> Self {
        let h = T::FRAC_1_SQRT_2();
        Self::diagonal(one(), cx(h, h))
    }

    /// T†
    pub fn t_dagger() -> Self {
        let h = T::FRAC_1_SQRT_2();
        Self::diagonal(one(), cx(h, -h))
    }

    /// Rotation about the X axis by `theta` radians
    pub fn rx(theta: T) -> Self {
        let half = theta * T::of(0.5);
        let (sin, cos) = half.sin_cos();
        Self::from_rows([
            [cx(cos, T::zero()), cx(T::zero(), -sin)],
            [cx(T::zero(), -sin), cx(cos, T::zero())],
        ])
    }

    /// Rotation about the Y axis by `theta` radians
    pub fn ry(theta: T) -> Self {
        let half = theta * T::of(0.5);
        let (sin, cos) = half.sin_cos();
        Self::from_rows([
            [cx(cos, T::zero()), cx(-sin, T::zero())],
            [cx(sin, T::zero()), cx(cos, T::zero())],
        ])
    }

    /// Rotation about the Z axis by `theta` radians
    pub fn rz(theta: T) -> Self {
        let half = theta * T::of(0.5);
        let (sin, cos) = half.sin_cos();
        Self::diagonal(cx(cos, -sin), cx(cos, sin))
    }

    /// Phase gate P(φ) = diag(1, e^(iφ))
    pub fn phase(phi: T) -> Self {
        let (sin, cos) = phi.sin_cos();
        Self::diagonal(one(), cx(cos, sin))
    }

    /// Matrix product `self · other`: applies `other` first, then `self`
    pub fn compose(&self, other: &Self) -> Self {
        let a = &self.entries;
        let b = &other.entries;
        let mut out = [[zero(); 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
            }
        }
        Self { entries: out }
    }

    /// Conjugate transpose
    pub fn dagger(&self) -> Self {
        let m = &self.entries;
        Self::from_rows([
            [m[0][0].conj(), m[1][0].conj()],
            [m[0][1].conj(), m[1][1].conj()],
        ])
    }

    /// Multiply every entry by `factor`
    pub fn scale(&self, factor: Complex<T>) -> Self {
        let m = &self.entries;
        Self::from_rows([
            [m[0][0] * factor, m[0][1] * factor],
            [m[1][0] * factor, m[1][1] * factor],
        ])
    }

    /// Check U†U ≈ I
    ///
    /// Each of the four entries of U†U is compared with the identity on its
    /// own, using [`ComplexExt::approx_eq`]; there is no aggregated norm.
    pub fn is_unitary(&self, epsilon: T) -> bool {
        let product = self.dagger().compose(self);
        let identity = Self::identity();
        (0..2).all(|i| {
            (0..2).all(|j| product.entries[i][j].approx_eq(&identity.entries[i][j], epsilon))
        })
    }

    /// Entry-wise approximate equality
    pub fn approx_eq(&self, other: &Self, epsilon: T) -> bool {
        (0..2).all(|i| (0..2).all(|j| self.entries[i][j].approx_eq(&other.entries[i][j], epsilon)))
    }

    /// Approximate equality up to a unit-magnitude global factor
    ///
    /// The phase is read off the largest entry of `other`; matrices whose
    /// entries are all within `epsilon` of zero fall back to plain
    /// [`approx_eq`](Self::approx_eq).
    pub fn approx_eq_up_to_global_phase(&self, other: &Self, epsilon: T) -> bool {
        let mut pivot = (0, 0);
        let mut largest = T::zero();
        for i in 0..2 {
            for j in 0..2 {
                let magnitude = other.entries[i][j].norm();
                if magnitude > largest {
                    largest = magnitude;
                    pivot = (i, j);
                }
            }
        }
        if largest <= epsilon {
            return self.approx_eq(other, epsilon);
        }

        let ratio = self.entries[pivot.0][pivot.1] / other.entries[pivot.0][pivot.1];
        let magnitude = ratio.norm();
        if (magnitude - T::one()).abs() > epsilon {
            return false;
        }
        self.approx_eq(&other.scale(ratio.unscale(magnitude)), epsilon)
    }

    /// True if both off-diagonal entries are within `epsilon` of zero
    pub fn is_diagonal(&self, epsilon: T) -> bool {
        self.entries[0][1].approx_eq(&zero(), epsilon) && self.entries[1][0].approx_eq(&zero(), epsilon)
    }

    /// Apply the matrix to the column vector `(a0, a1)`
    #[inline]
    pub fn apply_to(&self, a0: Complex<T>, a1: Complex<T>) -> (Complex<T>, Complex<T>) {
        let m = &self.entries;
        (m[0][0] * a0 + m[0][1] * a1, m[1][0] * a0 + m[1][1] * a1)
    }
}

impl<T: Real> Default for GateMatrix<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Real> Mul for GateMatrix<T> {
    type Output = GateMatrix<T>;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs)
    }
}

impl<'a, T: Real> Mul<&'a GateMatrix<T>> for &'a GateMatrix<T> {
    type Output = GateMatrix<T>;

    #[inline]
    fn mul(self, rhs: &'a GateMatrix<T>) -> Self::Output {
        self.compose(rhs)
    }
}
