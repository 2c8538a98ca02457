//! Monte Carlo wavefunction noise
//!
//! Instead of evolving a density matrix, each channel application draws one
//! uniform variate and applies a single Kraus branch to the pure state:
//!
//! | Channel | Branch selection |
//! |---------|------------------|
//! | Bit flip(p) | X iff u < p |
//! | Phase flip(p) | Z iff u < p |
//! | Depolarizing(p) | u < p/3 → X, u < 2p/3 → Y, u < p → Z |
//! | Amplitude damping(γ) | decay iff u < γ·P(1) |
//! | Phase damping(γ) | same as phase flip(γ) |
//!
//! Averaged over many trajectories the branch frequencies reproduce the
//! channel's action on the density matrix. Amplitude-damping branches are
//! state-dependent and renormalize the result; the Pauli branches are
//! unitary.

use crate::error::{Result, StateError};
use crate::kernels;
use crate::measurement::check_variate;
use crate::state_vector::StateVector;
use num_complex::Complex;
use qtraj_gates::{GateMatrix, Real};
use rand::Rng;
use std::fmt;
use tracing::trace;

/// A single-qubit noise channel with a validated parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseChannel<T: Real = f64> {
    /// X with probability `probability`
    BitFlip { probability: T },
    /// Z with probability `probability`
    PhaseFlip { probability: T },
    /// X, Y or Z each with probability `probability / 3`
    Depolarizing { probability: T },
    /// Energy relaxation |1⟩ → |0⟩ with rate `gamma`
    AmplitudeDamping { gamma: T },
    /// Dephasing, sampled as a phase flip with probability `gamma`
    PhaseDamping { gamma: T },
}

/// Kraus branch chosen for one channel application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KrausBranch {
    Identity,
    X,
    Y,
    Z,
    /// Amplitude damping jump: |1⟩ decayed to |0⟩
    Decay,
    /// Amplitude damping without a jump
    NoDecay,
}

fn validate_probability<T: Real>(name: &'static str, value: T) -> Result<T> {
    if !(T::zero()..=T::one()).contains(&value) {
        return Err(StateError::InvalidProbability {
            name,
            value: value.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(value)
}

impl<T: Real> NoiseChannel<T> {
    pub fn bit_flip(probability: T) -> Result<Self> {
        let probability = validate_probability("probability", probability)?;
        Ok(Self::BitFlip { probability })
    }

    pub fn phase_flip(probability: T) -> Result<Self> {
        let probability = validate_probability("probability", probability)?;
        Ok(Self::PhaseFlip { probability })
    }

    pub fn depolarizing(probability: T) -> Result<Self> {
        let probability = validate_probability("probability", probability)?;
        Ok(Self::Depolarizing { probability })
    }

    pub fn amplitude_damping(gamma: T) -> Result<Self> {
        let gamma = validate_probability("gamma", gamma)?;
        Ok(Self::AmplitudeDamping { gamma })
    }

    pub fn phase_damping(gamma: T) -> Result<Self> {
        let gamma = validate_probability("gamma", gamma)?;
        Ok(Self::PhaseDamping { gamma })
    }

    /// Channel name as used in logs and the text format
    pub fn name(&self) -> &'static str {
        match self {
            Self::BitFlip { .. } => "bit_flip",
            Self::PhaseFlip { .. } => "phase_flip",
            Self::Depolarizing { .. } => "depolarizing",
            Self::AmplitudeDamping { .. } => "amplitude_damping",
            Self::PhaseDamping { .. } => "phase_damping",
        }
    }

    /// The channel's parameter (p or γ)
    pub fn parameter(&self) -> T {
        match *self {
            Self::BitFlip { probability }
            | Self::PhaseFlip { probability }
            | Self::Depolarizing { probability } => probability,
            Self::AmplitudeDamping { gamma } | Self::PhaseDamping { gamma } => gamma,
        }
    }

    /// Pick the Kraus branch for variate `u`
    ///
    /// # Arguments
    /// * `u` - Uniform variate in [0, 1)
    /// * `p_one` - Probability that the target qubit is |1⟩; only amplitude
    ///   damping reads it
    pub fn select_branch(&self, u: T, p_one: T) -> KrausBranch {
        match *self {
            Self::BitFlip { probability } => {
                if u < probability {
                    KrausBranch::X
                } else {
                    KrausBranch::Identity
                }
            },
            Self::PhaseFlip { probability } | Self::PhaseDamping { gamma: probability } => {
                if u < probability {
                    KrausBranch::Z
                } else {
                    KrausBranch::Identity
                }
            },
            Self::Depolarizing { probability } => {
                let third = probability / T::of(3.0);
                if u < third {
                    KrausBranch::X
                } else if u < third + third {
                    KrausBranch::Y
                } else if u < probability {
                    KrausBranch::Z
                } else {
                    KrausBranch::Identity
                }
            },
            Self::AmplitudeDamping { gamma } => {
                if u < gamma * p_one {
                    KrausBranch::Decay
                } else {
                    KrausBranch::NoDecay
                }
            },
        }
    }

    /// Apply the channel to `qubit`, consuming one variate from `rng`
    ///
    /// # Returns
    /// The branch that was applied
    ///
    /// # Errors
    /// Returns error if `qubit` is out of range (the RNG is not advanced),
    /// or [`StateError::ZeroNorm`] if the chosen branch annihilates the
    /// state.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        state: &mut StateVector<T>,
        qubit: usize,
        rng: &mut R,
    ) -> Result<KrausBranch> {
        state.check_qubit(qubit)?;
        let u = T::sample_unit(rng);
        self.apply_with_variate(state, qubit, u)
    }

    /// Apply the channel to `qubit` with a caller-provided variate
    ///
    /// # Errors
    /// Returns [`StateError::InvalidVariate`] unless `u` is in [0, 1)
    pub fn apply_with_variate(
        &self,
        state: &mut StateVector<T>,
        qubit: usize,
        u: T,
    ) -> Result<KrausBranch> {
        state.check_qubit(qubit)?;
        check_variate(u)?;

        let p_one = match self {
            Self::AmplitudeDamping { .. } => kernels::norm_sqr_for_bit(state.amplitudes(), qubit, 1),
            _ => T::zero(),
        };
        let branch = self.select_branch(u, p_one);

        match branch {
            KrausBranch::Identity => {},
            KrausBranch::X => state.apply_single_qubit_gate(qubit, &GateMatrix::pauli_x())?,
            KrausBranch::Y => state.apply_single_qubit_gate(qubit, &GateMatrix::pauli_y())?,
            KrausBranch::Z => state.apply_single_qubit_gate(qubit, &GateMatrix::pauli_z())?,
            KrausBranch::Decay => {
                // After the jump only the former |1⟩ weight remains
                if p_one <= T::zero() {
                    return Err(StateError::ZeroNorm);
                }
                let amplitudes = state.amplitudes_mut();
                kernels::lower_bit(amplitudes, qubit);
                kernels::scale_all(amplitudes, T::one() / p_one.sqrt());
            },
            KrausBranch::NoDecay => {
                let keep = T::one() - self.parameter();
                let p_zero = kernels::norm_sqr_for_bit(state.amplitudes(), qubit, 0);
                let remaining = p_zero + keep * p_one;
                if remaining <= T::zero() {
                    return Err(StateError::ZeroNorm);
                }
                let amplitudes = state.amplitudes_mut();
                kernels::scale_set_bit(amplitudes, qubit, keep.sqrt());
                kernels::scale_all(amplitudes, T::one() / remaining.sqrt());
            },
        }

        trace!(channel = self.name(), qubit, ?branch, "noise branch applied");
        Ok(branch)
    }

    /// Kraus operators {E_k} of the channel as 2×2 matrices
    pub fn kraus_operators(&self) -> Vec<GateMatrix<T>> {
        let real = |x: T| Complex::new(x, T::zero());
        let zero = real(T::zero());
        let p = self.parameter();
        let stay = real((T::one() - p).sqrt());

        match self {
            Self::BitFlip { .. } => vec![
                GateMatrix::identity().scale(stay),
                GateMatrix::pauli_x().scale(real(p.sqrt())),
            ],
            Self::PhaseFlip { .. } | Self::PhaseDamping { .. } => vec![
                GateMatrix::identity().scale(stay),
                GateMatrix::pauli_z().scale(real(p.sqrt())),
            ],
            Self::Depolarizing { .. } => {
                let each = real((p / T::of(3.0)).sqrt());
                vec![
                    GateMatrix::identity().scale(stay),
                    GateMatrix::pauli_x().scale(each),
                    GateMatrix::pauli_y().scale(each),
                    GateMatrix::pauli_z().scale(each),
                ]
            },
            Self::AmplitudeDamping { .. } => vec![
                GateMatrix::diagonal(real(T::one()), stay),
                GateMatrix::from_rows([[zero, real(p.sqrt())], [zero, zero]]),
            ],
        }
    }

    /// Check Σ E_k†E_k = I entry by entry
    pub fn is_trace_preserving(&self, epsilon: T) -> bool {
        let zero = Complex::new(T::zero(), T::zero());
        let mut sum = [[zero; 2]; 2];
        for op in self.kraus_operators() {
            let product = op.dagger() * op;
            for (row, sum_row) in sum.iter_mut().enumerate() {
                for (col, entry) in sum_row.iter_mut().enumerate() {
                    *entry += product.entry(row, col);
                }
            }
        }
        GateMatrix::from_rows(sum).approx_eq(&GateMatrix::identity(), epsilon)
    }
}

impl<T: Real> fmt::Display for NoiseChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.parameter())
    }
}

impl<T: Real> StateVector<T> {
    /// Bit-flip noise on `qubit` with probability `p`
    pub fn bit_flip_noise<R: Rng + ?Sized>(&mut self, qubit: usize, p: T, rng: &mut R) -> Result<KrausBranch> {
        NoiseChannel::bit_flip(p)?.apply(self, qubit, rng)
    }

    /// Phase-flip noise on `qubit` with probability `p`
    pub fn phase_flip_noise<R: Rng + ?Sized>(&mut self, qubit: usize, p: T, rng: &mut R) -> Result<KrausBranch> {
        NoiseChannel::phase_flip(p)?.apply(self, qubit, rng)
    }

    /// Depolarizing noise on `qubit` with total error probability `p`
    pub fn depolarizing_noise<R: Rng + ?Sized>(&mut self, qubit: usize, p: T, rng: &mut R) -> Result<KrausBranch> {
        NoiseChannel::depolarizing(p)?.apply(self, qubit, rng)
    }

    /// Amplitude damping on `qubit` with rate `gamma`
    pub fn amplitude_damping_noise<R: Rng + ?Sized>(
        &mut self,
        qubit: usize,
        gamma: T,
        rng: &mut R,
    ) -> Result<KrausBranch> {
        NoiseChannel::amplitude_damping(gamma)?.apply(self, qubit, rng)
    }

    /// Phase damping on `qubit` with rate `gamma`
    pub fn phase_damping_noise<R: Rng + ?Sized>(
        &mut self,
        qubit: usize,
        gamma: T,
        rng: &mut R,
    ) -> Result<KrausBranch> {
        NoiseChannel::phase_damping(gamma)?.apply(self, qubit, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use rand::rngs::mock::StepRng;

    type Channel = NoiseChannel<f64>;

    fn excited() -> StateVector<f64> {
        StateVector::from_basis_index(1, 1).unwrap()
    }

    fn plus() -> StateVector<f64> {
        let mut state = StateVector::new(1).unwrap();
        state.h(0).unwrap();
        state
    }

    #[test]
    fn test_parameter_validation() {
        assert!(Channel::bit_flip(0.0).is_ok());
        assert!(Channel::bit_flip(1.0).is_ok());
        assert!(matches!(
            Channel::bit_flip(1.5),
            Err(StateError::InvalidProbability { name: "probability", .. })
        ));
        assert!(Channel::depolarizing(-0.1).is_err());
        assert!(Channel::amplitude_damping(f64::NAN).is_err());
        assert!(matches!(
            Channel::phase_damping(2.0),
            Err(StateError::InvalidProbability { name: "gamma", .. })
        ));
    }

    #[test]
    fn test_depolarizing_branch_thresholds() {
        let channel = Channel::depolarizing(0.3).unwrap();
        assert_eq!(channel.select_branch(0.05, 0.0), KrausBranch::X);
        assert_eq!(channel.select_branch(0.15, 0.0), KrausBranch::Y);
        assert_eq!(channel.select_branch(0.25, 0.0), KrausBranch::Z);
        assert_eq!(channel.select_branch(0.35, 0.0), KrausBranch::Identity);
    }

    #[test]
    fn test_flip_branches() {
        let bit = Channel::bit_flip(0.2).unwrap();
        assert_eq!(bit.select_branch(0.1, 0.0), KrausBranch::X);
        assert_eq!(bit.select_branch(0.2, 0.0), KrausBranch::Identity);

        let damping = Channel::phase_damping(0.2).unwrap();
        let flip = Channel::phase_flip(0.2).unwrap();
        for u in [0.0, 0.1, 0.19, 0.2, 0.9] {
            assert_eq!(damping.select_branch(u, 0.5), flip.select_branch(u, 0.5));
        }
    }

    #[test]
    fn test_certain_bit_flip() {
        let mut state = StateVector::<f64>::new(1).unwrap();
        let mut rng = StepRng::new(0, 0);
        let branch = state.bit_flip_noise(0, 1.0, &mut rng).unwrap();
        assert_eq!(branch, KrausBranch::X);
        assert_relative_eq!(state.probability_of_basis_state(1).unwrap(), 1.0);
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let mut state = plus();
        let before = state.clone();
        let mut rng = StepRng::new(0, 0);
        assert_eq!(state.depolarizing_noise(0, 0.0, &mut rng).unwrap(), KrausBranch::Identity);
        assert_eq!(state, before);
    }

    #[test]
    fn test_phase_flip_on_plus() {
        let mut state = plus();
        Channel::phase_flip(0.5).unwrap().apply_with_variate(&mut state, 0, 0.1).unwrap();
        let h = 1.0 / 2.0_f64.sqrt();
        assert_relative_eq!(state.amplitudes()[1].re, -h, epsilon = 1e-12);
    }

    #[test]
    fn test_variate_out_of_range_rejected() {
        let mut state = excited();
        let before = state.clone();
        let channel = Channel::amplitude_damping(1.0).unwrap();
        for u in [1.0, f64::NAN] {
            assert!(matches!(
                channel.apply_with_variate(&mut state, 0, u),
                Err(StateError::InvalidVariate { .. })
            ));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_full_amplitude_damping_on_excited() {
        let mut state = excited();
        let branch = Channel::amplitude_damping(1.0)
            .unwrap()
            .apply_with_variate(&mut state, 0, 0.999)
            .unwrap();
        assert_eq!(branch, KrausBranch::Decay);
        assert_relative_eq!(state.probability_of_basis_state(0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_amplitude_damping_on_ground_is_no_decay() {
        let mut state = StateVector::<f64>::new(1).unwrap();
        let branch = Channel::amplitude_damping(1.0)
            .unwrap()
            .apply_with_variate(&mut state, 0, 0.0)
            .unwrap();
        assert_eq!(branch, KrausBranch::NoDecay);
        assert_eq!(state, StateVector::new(1).unwrap());
    }

    #[test]
    fn test_amplitude_damping_no_jump_reweights() {
        // |+⟩ with γ = 0.5: P(decay) = 0.25; no-jump leaves (1, √0.5)/√1.5
        let mut state = plus();
        let branch = Channel::amplitude_damping(0.5)
            .unwrap()
            .apply_with_variate(&mut state, 0, 0.9)
            .unwrap();
        assert_eq!(branch, KrausBranch::NoDecay);
        assert_relative_eq!(state.probability_of_basis_state(0).unwrap(), 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(state.probability_of_basis_state(1).unwrap(), 1.0 / 3.0, epsilon = 1e-12);
        assert!(state.is_normalized(1e-12));
    }

    #[test]
    fn test_amplitude_damping_jump_moves_amplitude() {
        // a|0⟩ + b|1⟩ jumps to b/|b| |0⟩
        let amps = [Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)];
        let mut state = StateVector::from_amplitudes(1, &amps).unwrap();
        let branch = Channel::amplitude_damping(0.5)
            .unwrap()
            .apply_with_variate(&mut state, 0, 0.1)
            .unwrap();
        assert_eq!(branch, KrausBranch::Decay);
        assert_relative_eq!(state.amplitudes()[0].im, 1.0, epsilon = 1e-12);
        assert_eq!(state.amplitudes()[1], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_invalid_qubit_leaves_state() {
        let mut state = plus();
        let before = state.clone();
        let mut rng = StepRng::new(0, 0);
        assert!(state.amplitude_damping_noise(4, 0.5, &mut rng).is_err());
        assert!(state.bit_flip_noise(0, 1.2, &mut rng).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_kraus_completeness() {
        for p in [0.0, 0.1, 0.5, 1.0] {
            for channel in [
                Channel::bit_flip(p).unwrap(),
                Channel::phase_flip(p).unwrap(),
                Channel::depolarizing(p).unwrap(),
                Channel::amplitude_damping(p).unwrap(),
                Channel::phase_damping(p).unwrap(),
            ] {
                assert!(channel.is_trace_preserving(1e-12), "{}", channel);
            }
        }
    }

    #[test]
    fn test_kraus_counts() {
        assert_eq!(Channel::depolarizing(0.1).unwrap().kraus_operators().len(), 4);
        assert_eq!(Channel::amplitude_damping(0.1).unwrap().kraus_operators().len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Channel::bit_flip(0.25).unwrap().to_string(), "bit_flip(0.25)");
    }
}
