//! Controlled and multi-controlled gates
//!
//! The two-qubit gates here are thin wrappers over
//! [`StateVector::apply_controlled_gate`]. SWAP is three CNOTs and Toffoli
//! has its own amplitude-swapping kernel.

use crate::error::Result;
use crate::kernels;
use crate::state_vector::StateVector;
use qtraj_gates::{GateMatrix, Real};

impl<T: Real> StateVector<T> {
    /// Apply a CNOT (Controlled-NOT) gate
    ///
    /// # Arguments
    /// * `control` - Index of the control qubit (0-indexed)
    /// * `target` - Index of the target qubit (0-indexed)
    ///
    /// # Errors
    /// Returns error if qubit indices are invalid or equal
    ///
    /// # Example
    /// ```
    /// use qtraj_state::StateVector;
    ///
    /// let mut state = StateVector::<f64>::from_basis_index(2, 0b01).unwrap();
    /// state.cnot(0, 1).unwrap();
    /// assert!((state.probability_of_basis_state(0b11).unwrap() - 1.0).abs() < 1e-12);
    /// ```
    pub fn cnot(&mut self, control: usize, target: usize) -> Result<()> {
        self.apply_controlled_gate(control, target, &GateMatrix::pauli_x())
    }

    pub fn cy(&mut self, control: usize, target: usize) -> Result<()> {
        self.apply_controlled_gate(control, target, &GateMatrix::pauli_y())
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<()> {
        self.apply_controlled_gate(control, target, &GateMatrix::pauli_z())
    }

    pub fn ch(&mut self, control: usize, target: usize) -> Result<()> {
        self.apply_controlled_gate(control, target, &GateMatrix::hadamard())
    }

    pub fn cs(&mut self, control: usize, target: usize) -> Result<()> {
        self.apply_controlled_gate(control, target, &GateMatrix::s())
    }

    pub fn ct(&mut self, control: usize, target: usize) -> Result<()> {
        self.apply_controlled_gate(control, target, &GateMatrix::t())
    }

    /// Controlled phase: multiplies |11⟩ by e^{iφ}
    pub fn cp(&mut self, control: usize, target: usize, phi: T) -> Result<()> {
        self.apply_controlled_gate(control, target, &GateMatrix::phase(phi))
    }

    /// Exchange two qubits
    ///
    /// Implemented as CNOT(q1→q2), CNOT(q2→q1), CNOT(q1→q2). The indices are
    /// checked before the first CNOT so a bad call never leaves a partial
    /// swap behind.
    pub fn swap(&mut self, q1: usize, q2: usize) -> Result<()> {
        self.check_distinct_qubits(&[q1, q2])?;
        self.cnot(q1, q2)?;
        self.cnot(q2, q1)?;
        self.cnot(q1, q2)
    }

    /// Toffoli (CCX): flip `target` when both controls are |1⟩
    ///
    /// # Errors
    /// Returns error unless all three indices are distinct and in range.
    pub fn toffoli(&mut self, control1: usize, control2: usize, target: usize) -> Result<()> {
        self.check_distinct_qubits(&[control1, control2, target])?;
        let mask = (1usize << control1) | (1usize << control2);
        kernels::swap_controlled(self.amplitudes_mut(), mask, target);
        Ok(())
    }

    /// Apply `matrix` to `target` on the subspace where every control is |1⟩
    ///
    /// With no controls this is a plain single-qubit gate.
    ///
    /// # Errors
    /// Returns error if any index is out of range or appears twice.
    pub fn apply_multi_controlled_gate(
        &mut self,
        controls: &[usize],
        target: usize,
        matrix: &GateMatrix<T>,
    ) -> Result<()> {
        let mut qubits = Vec::with_capacity(controls.len() + 1);
        qubits.extend_from_slice(controls);
        qubits.push(target);
        self.check_distinct_qubits(&qubits)?;

        let mask = controls.iter().fold(0usize, |mask, &c| mask | (1usize << c));
        kernels::apply_controlled(self.amplitudes_mut(), matrix, mask, target);
        Ok(())
    }
}
