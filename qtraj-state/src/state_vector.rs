//! Dense state vector
//!
//! [`StateVector`] owns the 2^n complex amplitudes of an n-qubit register.
//! Qubit `k` is bit `k` of the basis index (little-endian), so on two qubits
//! index 1 is |q1=0, q0=1⟩ and index 2 is |q1=1, q0=0⟩.
//!
//! Every mutating method validates its arguments first and returns an
//! error without touching the amplitudes, so a failed call is a no-op.

use crate::error::{Result, StateError};
use crate::kernels;
use num_complex::Complex;
use qtraj_gates::{GateMatrix, Real};
use std::fmt;
use tracing::warn;

/// Largest register the simulator will allocate
pub const MAX_QUBITS: usize = 30;

/// Quantum state vector over `T` precision
///
/// # Example
///
/// ```
/// use qtraj_state::StateVector;
///
/// // Bell state
/// let mut state = StateVector::<f64>::new(2).unwrap();
/// state.h(0).unwrap();
/// state.cnot(0, 1).unwrap();
///
/// assert!((state.probability_of_basis_state(0).unwrap() - 0.5).abs() < 1e-10);
/// assert!((state.probability_of_basis_state(3).unwrap() - 0.5).abs() < 1e-10);
/// assert!(state.is_normalized(1e-10));
/// ```
#[derive(Clone, PartialEq)]
pub struct StateVector<T: Real = f64> {
    /// Number of qubits
    num_qubits: usize,

    /// 2^num_qubits amplitudes, index bit k = qubit k
    amplitudes: Vec<Complex<T>>,
}

fn check_register_size(num_qubits: usize) -> Result<usize> {
    if num_qubits > MAX_QUBITS {
        return Err(StateError::TooManyQubits {
            num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(1usize << num_qubits)
}

impl<T: Real> StateVector<T> {
    /// Create an n-qubit register in the ground state |0...0⟩
    ///
    /// # Errors
    /// Returns [`StateError::TooManyQubits`] if `num_qubits` exceeds
    /// [`MAX_QUBITS`].
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::from_basis_index(num_qubits, 0)
    }

    /// Create the computational basis state |index⟩
    ///
    /// # Errors
    /// Returns [`StateError::InvalidBasisIndex`] unless `index < 2^num_qubits`.
    pub fn from_basis_index(num_qubits: usize, index: usize) -> Result<Self> {
        let dimension = check_register_size(num_qubits)?;
        if index >= dimension {
            return Err(StateError::InvalidBasisIndex { index, dimension });
        }

        let mut amplitudes = vec![Complex::new(T::zero(), T::zero()); dimension];
        amplitudes[index] = Complex::new(T::one(), T::zero());

        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Create a state from raw amplitudes
    ///
    /// The amplitudes are copied as given. Normalization is the caller's
    /// responsibility and is not checked.
    ///
    /// # Errors
    /// Returns [`StateError::DimensionMismatch`] if `amplitudes.len()` is not
    /// `2^num_qubits`.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex<T>]) -> Result<Self> {
        let dimension = check_register_size(num_qubits)?;
        if amplitudes.len() != dimension {
            return Err(StateError::DimensionMismatch {
                expected: dimension,
                actual: amplitudes.len(),
            });
        }

        Ok(Self {
            num_qubits,
            amplitudes: amplitudes.to_vec(),
        })
    }

    /// Number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// State dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Read-only view of the amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex<T>] {
        &self.amplitudes
    }

    #[inline]
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<T>] {
        &mut self.amplitudes
    }

    /// Amplitude of basis state `index`
    pub fn amplitude(&self, index: usize) -> Result<Complex<T>> {
        self.check_basis_index(index)?;
        Ok(self.amplitudes[index])
    }

    pub(crate) fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Check that every qubit is in range and no qubit appears twice
    pub(crate) fn check_distinct_qubits(&self, qubits: &[usize]) -> Result<()> {
        for (pos, &qubit) in qubits.iter().enumerate() {
            self.check_qubit(qubit)?;
            if qubits[..pos].contains(&qubit) {
                return Err(StateError::DuplicateQubit { index: qubit });
            }
        }
        Ok(())
    }

    fn check_basis_index(&self, index: usize) -> Result<()> {
        if index >= self.dimension() {
            return Err(StateError::InvalidBasisIndex {
                index,
                dimension: self.dimension(),
            });
        }
        Ok(())
    }

    /// Apply a single-qubit gate
    ///
    /// # Errors
    /// Returns error if `qubit` is out of range.
    pub fn apply_single_qubit_gate(&mut self, qubit: usize, matrix: &GateMatrix<T>) -> Result<()> {
        self.check_qubit(qubit)?;
        kernels::apply_single_qubit(&mut self.amplitudes, matrix, qubit);
        Ok(())
    }

    /// Apply `matrix` to `target` when `control` is |1⟩
    ///
    /// # Errors
    /// Returns error if either index is out of range or `control == target`.
    pub fn apply_controlled_gate(
        &mut self,
        control: usize,
        target: usize,
        matrix: &GateMatrix<T>,
    ) -> Result<()> {
        self.check_distinct_qubits(&[control, target])?;
        kernels::apply_controlled(&mut self.amplitudes, matrix, 1usize << control, target);
        Ok(())
    }

    pub fn h(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::hadamard())
    }

    pub fn x(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::pauli_x())
    }

    pub fn y(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::pauli_y())
    }

    pub fn z(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::pauli_z())
    }

    pub fn s(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::s())
    }

    pub fn sdg(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::s_dagger())
    }

    pub fn t(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::t())
    }

    pub fn tdg(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::t_dagger())
    }

    pub fn rx(&mut self, qubit: usize, theta: T) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::rx(theta))
    }

    pub fn ry(&mut self, qubit: usize, theta: T) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::ry(theta))
    }

    pub fn rz(&mut self, qubit: usize, theta: T) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::rz(theta))
    }

    pub fn phase(&mut self, qubit: usize, phi: T) -> Result<()> {
        self.apply_single_qubit_gate(qubit, &GateMatrix::phase(phi))
    }

    /// Σ|a_i|²
    pub fn total_probability(&self) -> T {
        kernels::norm_sqr(&self.amplitudes)
    }

    /// L2 norm ‖ψ‖
    pub fn norm(&self) -> T {
        self.total_probability().sqrt()
    }

    /// True if |Σ|a_i|² − 1| ≤ epsilon
    pub fn is_normalized(&self, epsilon: T) -> bool {
        (self.total_probability() - T::one()).abs() <= epsilon
    }

    /// Scale all amplitudes by 1/‖ψ‖
    ///
    /// # Errors
    /// Returns [`StateError::ZeroNorm`] and leaves the state unchanged if
    /// every amplitude is zero.
    pub fn normalize(&mut self) -> Result<()> {
        let total = self.total_probability();
        if total == T::zero() {
            warn!(num_qubits = self.num_qubits, "normalize called on a zero-norm state");
            return Err(StateError::ZeroNorm);
        }
        kernels::scale_all(&mut self.amplitudes, T::one() / total.sqrt());
        Ok(())
    }

    /// Born-rule probability |a_index|²
    pub fn probability_of_basis_state(&self, index: usize) -> Result<T> {
        self.check_basis_index(index)?;
        Ok(self.amplitudes[index].norm_sqr())
    }

    /// Probability that `qubit` reads `value` (0 or 1)
    pub fn probability_of_bit(&self, qubit: usize, value: u8) -> Result<T> {
        self.check_qubit(qubit)?;
        if value > 1 {
            return Err(StateError::InvalidBitValue { value });
        }
        Ok(kernels::norm_sqr_for_bit(
            &self.amplitudes,
            qubit,
            usize::from(value),
        ))
    }

    /// Probabilities of all basis states
    pub fn probabilities(&self) -> Vec<T> {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).collect()
    }

    /// ⟨self|other⟩ = Σ conj(a_i)·b_i
    ///
    /// # Errors
    /// Returns error if the dimensions differ.
    pub fn inner_product(&self, other: &StateVector<T>) -> Result<Complex<T>> {
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
            .fold(Complex::new(T::zero(), T::zero()), |acc, (a, b)| {
                acc + a.conj() * b
            }))
    }

    /// |⟨self|other⟩|²
    pub fn fidelity(&self, other: &StateVector<T>) -> Result<T> {
        Ok(self.inner_product(other)?.norm_sqr())
    }

    /// Reset to |0...0⟩
    pub fn reset(&mut self) {
        for amp in self.amplitudes.iter_mut() {
            *amp = Complex::new(T::zero(), T::zero());
        }
        self.amplitudes[0] = Complex::new(T::one(), T::zero());
    }
}

impl<T: Real> fmt::Debug for StateVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateVector")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .field("norm", &self.norm())
            .finish()
    }
}
