//! Complex scalars over a selectable real precision
//!
//! Scalar arithmetic (add, subtract, multiply, divide, scale, negate,
//! conjugate, squared magnitude, magnitude, phase angle, exponential and
//! construction from polar form) is provided by [`num_complex::Complex`].
//! This module adds the [`Real`] bound that pins the precision to `f32` or
//! `f64`, and the two comparisons the simulator relies on:
//!
//! - [`ComplexExt::approx_eq`]: per-component absolute tolerance
//! - [`ComplexExt::bitwise_eq`]: exact bit-for-bit equality
//!
//! # Division by zero
//!
//! Complex division is not guarded. Dividing by a value of zero magnitude
//! follows IEEE-754 and yields non-finite components (`NaN` or `inf`);
//! callers that can produce such a divisor must check it themselves.
//!
//! # Example
//!
//! ```
//! use qtraj_gates::{Complex, ComplexExt};
//!
//! let i = Complex::new(0.0_f64, 1.0);
//! let minus_one = Complex::new(-1.0, 0.0);
//! assert!((i * i).approx_eq(&minus_one, 1e-12));
//! assert!(!(i * i).bitwise_eq(&Complex::new(-1.0, -0.0)));
//! ```

use num_complex::Complex;
use num_traits::{Float, FloatConst, NumAssign};
use rand::Rng;
use std::fmt::{Debug, Display};

/// Real precision used for amplitudes and gate entries
///
/// Implemented for `f32` and `f64` only.
pub trait Real:
    Float + FloatConst + NumAssign + Default + Debug + Display + Send + Sync + 'static
{
    /// Convert an `f64` literal into this precision (rounding for `f32`)
    fn of(value: f64) -> Self;

    /// Raw IEEE-754 bit pattern, widened to 64 bits
    fn to_bits_u64(self) -> u64;

    /// Draw one uniform variate in `[0, 1)`
    fn sample_unit<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl Real for f64 {
    #[inline]
    fn of(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn sample_unit<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen::<f64>()
    }
}

impl Real for f32 {
    #[inline]
    fn of(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_bits_u64(self) -> u64 {
        u64::from(self.to_bits())
    }

    #[inline]
    fn sample_unit<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen::<f32>()
    }
}

/// Comparisons on complex scalars
pub trait ComplexExt<T: Real> {
    /// True if both components differ by at most `epsilon`
    ///
    /// Any `NaN` component makes the comparison false.
    fn approx_eq(&self, other: &Self, epsilon: T) -> bool;

    /// Exact equality of the underlying bit patterns
    ///
    /// Unlike `==`, this distinguishes `+0.0` from `-0.0` and treats a `NaN`
    /// as equal to an identical `NaN`.
    fn bitwise_eq(&self, other: &Self) -> bool;
}

impl<T: Real> ComplexExt<T> for Complex<T> {
    #[inline]
    fn approx_eq(&self, other: &Self, epsilon: T) -> bool {
        (self.re - other.re).abs() <= epsilon && (self.im - other.im).abs() <= epsilon
    }

    #[inline]
    fn bitwise_eq(&self, other: &Self) -> bool {
        self.re.to_bits_u64() == other.re.to_bits_u64()
            && self.im.to_bits_u64() == other.im.to_bits_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    fn samples() -> Vec<Complex64> {
        vec![
            Complex64::new(1.5, -2.0),
            Complex64::new(-0.25, 0.75),
            Complex64::new(3.0, 0.5),
            Complex64::new(0.0, -1.0),
        ]
    }

    #[test]
    fn test_i_squared_is_minus_one() {
        let i = Complex64::new(0.0, 1.0);
        assert!((i * i).approx_eq(&Complex64::new(-1.0, 0.0), EPS));
    }

    #[test]
    fn test_additive_and_multiplicative_identities() {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        for a in samples() {
            assert!((a + zero).bitwise_eq(&a));
            assert!((a * one).approx_eq(&a, EPS));
            assert!((a - a).approx_eq(&zero, EPS));
            assert!((a + (-a)).approx_eq(&zero, EPS));
        }
    }

    #[test]
    fn test_associativity_and_distributivity() {
        let s = samples();
        for a in &s {
            for b in &s {
                for c in &s {
                    assert!(((a + b) + c).approx_eq(&(a + (b + c)), EPS));
                    assert!(((a * b) * c).approx_eq(&(a * (b * c)), 1e-10));
                    assert!((a * (b + c)).approx_eq(&(a * b + a * c), 1e-10));
                }
            }
        }
    }

    #[test]
    fn test_division_inverts_multiplication() {
        let s = samples();
        for a in &s {
            for b in &s {
                assert!(((a * b) / b).approx_eq(a, 1e-10));
            }
        }
    }

    #[test]
    fn test_division_by_zero_is_not_finite() {
        let q = Complex64::new(1.0, 1.0) / Complex64::new(0.0, 0.0);
        assert!(!q.re.is_finite() || !q.im.is_finite());
    }

    #[test]
    fn test_magnitude_phase_and_polar() {
        let z = Complex64::new(3.0, 4.0);
        assert_relative_eq!(z.norm_sqr(), 25.0, epsilon = EPS);
        assert_relative_eq!(z.norm(), 5.0, epsilon = EPS);

        let w = Complex64::from_polar(2.0, PI / 3.0);
        assert_relative_eq!(w.norm(), 2.0, epsilon = EPS);
        assert_relative_eq!(w.arg(), PI / 3.0, epsilon = EPS);
    }

    #[test]
    fn test_exponential_euler_identity() {
        let e = Complex64::new(0.0, PI).exp();
        assert!(e.approx_eq(&Complex64::new(-1.0, 0.0), EPS));
    }

    #[test]
    fn test_conjugate_and_scale() {
        let z = Complex64::new(2.0, -3.0);
        assert!(z.conj().bitwise_eq(&Complex64::new(2.0, 3.0)));
        assert!(z.scale(0.5).approx_eq(&Complex64::new(1.0, -1.5), EPS));
        assert_relative_eq!((z * z.conj()).re, z.norm_sqr(), epsilon = EPS);
    }

    #[test]
    fn test_bitwise_eq_distinguishes_signed_zero() {
        let pos = Complex64::new(0.0, 0.0);
        let neg = Complex64::new(-0.0, 0.0);
        assert_eq!(pos, neg);
        assert!(!pos.bitwise_eq(&neg));
        assert!(pos.approx_eq(&neg, 0.0));
    }

    #[test]
    fn test_approx_eq_rejects_nan() {
        let nan = Complex64::new(f64::NAN, 0.0);
        assert!(!nan.approx_eq(&nan, 1.0));
        assert!(nan.bitwise_eq(&nan));
    }

    #[test]
    fn test_single_precision() {
        let i = Complex::new(0.0_f32, 1.0);
        assert!((i * i).approx_eq(&Complex::new(-1.0_f32, 0.0), 1e-6));
        assert_eq!(<f32 as Real>::of(0.5), 0.5_f32);
        assert_eq!(1.0_f32.to_bits_u64(), u64::from(1.0_f32.to_bits()));
    }

    #[test]
    fn test_sample_unit_range() {
        use rand::rngs::mock::StepRng;

        let mut low = StepRng::new(0, 0);
        assert_eq!(f64::sample_unit(&mut low), 0.0);

        let mut high = StepRng::new(u64::MAX, 0);
        let u = f64::sample_unit(&mut high);
        assert!(u < 1.0 && u > 0.999_999);
    }
}
