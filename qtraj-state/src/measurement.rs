//! Projective measurement in the computational basis
//!
//! A single-qubit measurement draws one uniform variate `u` in [0, 1):
//!
//! 1. P0 = Σ|a_i|² over indices with the qubit bit clear
//! 2. the outcome is 0 iff `u < P0`, otherwise 1
//! 3. amplitudes inconsistent with the outcome are zeroed and the survivors
//!    are divided by √(Σ|a|² of the survivors)
//!
//! The RNG-free core is [`StateVector::measure_with_variate`], which makes
//! collapse reproducible in tests.

use crate::error::{Result, StateError};
use crate::kernels;
use crate::state_vector::StateVector;
use qtraj_gates::Real;
use rand::Rng;
use tracing::trace;

/// Reject variates outside [0, 1), NaN included
pub(crate) fn check_variate<T: Real>(u: T) -> Result<()> {
    if u >= T::zero() && u < T::one() {
        Ok(())
    } else {
        Err(StateError::InvalidVariate {
            value: u.to_f64().unwrap_or(f64::NAN),
        })
    }
}

impl<T: Real> StateVector<T> {
    /// Measure `qubit` and collapse the state
    ///
    /// Consumes exactly one variate from `rng`.
    ///
    /// # Returns
    /// The outcome, 0 or 1
    ///
    /// # Errors
    /// Returns error if `qubit` is out of range, or [`StateError::ZeroNorm`]
    /// if the selected branch carries no weight. The RNG is not advanced
    /// when the qubit index is invalid.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> Result<u8> {
        self.check_qubit(qubit)?;
        let u = T::sample_unit(rng);
        self.measure_with_variate(qubit, u)
    }

    /// Measure `qubit` using a caller-provided variate `u` in [0, 1)
    ///
    /// # Errors
    /// Returns [`StateError::InvalidVariate`] if `u` is outside [0, 1) or
    /// NaN; the state is left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use qtraj_state::StateVector;
    ///
    /// let mut state = StateVector::<f64>::new(1).unwrap();
    /// state.h(0).unwrap();
    ///
    /// // u = 0.7 is not below P0 = 0.5
    /// assert_eq!(state.measure_with_variate(0, 0.7).unwrap(), 1);
    /// assert!((state.probability_of_basis_state(1).unwrap() - 1.0).abs() < 1e-10);
    /// ```
    pub fn measure_with_variate(&mut self, qubit: usize, u: T) -> Result<u8> {
        self.check_qubit(qubit)?;
        check_variate(u)?;

        let amplitudes = self.amplitudes();
        let p0 = kernels::norm_sqr_for_bit(amplitudes, qubit, 0);
        let outcome: u8 = if u < p0 { 0 } else { 1 };

        let surviving = if outcome == 0 {
            p0
        } else {
            kernels::norm_sqr_for_bit(amplitudes, qubit, 1)
        };
        if surviving <= T::zero() {
            return Err(StateError::ZeroNorm);
        }

        trace!(qubit, outcome, p0 = %p0, "collapsing qubit");

        kernels::project_bit(
            self.amplitudes_mut(),
            qubit,
            usize::from(outcome),
            T::one() / surviving.sqrt(),
        );

        Ok(outcome)
    }

    /// Measure every qubit in ascending order
    ///
    /// # Returns
    /// One outcome per qubit; entry `k` is the value read from qubit `k`.
    pub fn measure_all<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<u8>> {
        let mut outcomes = Vec::with_capacity(self.num_qubits());
        for qubit in 0..self.num_qubits() {
            outcomes.push(self.measure(qubit, rng)?);
        }
        Ok(outcomes)
    }
}
