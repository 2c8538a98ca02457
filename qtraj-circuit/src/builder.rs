//! Fluent circuit builder
//!
//! [`CircuitBuilder`] applies each call to a live [`StateVector`] and records
//! it in a [`Circuit`] at the same time, so the log can be exported, drawn
//! or replayed later while the state is inspected immediately.

use crate::circuit::Circuit;
use crate::error::Result;
use crate::operation::{GateKind, Operation};
use qtraj_state::StateVector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

/// Builder that executes and records operations
///
/// # Example
/// ```
/// use qtraj_circuit::CircuitBuilder;
///
/// let mut builder = CircuitBuilder::new(2, 42).unwrap();
/// builder.h(0).unwrap().cnot(0, 1).unwrap();
///
/// let probs = builder.state().probabilities();
/// assert!((probs[0] - 0.5).abs() < 1e-10);
/// assert_eq!(builder.circuit().len(), 2);
/// ```
#[derive(Debug)]
pub struct CircuitBuilder {
    state: StateVector<f64>,
    rng: StdRng,
    circuit: Circuit,
    outcomes: Vec<u8>,
}

impl CircuitBuilder {
    /// Create a builder on the ground state with a seeded RNG
    pub fn new(num_qubits: usize, seed: u64) -> Result<Self> {
        Self::with_capacity(num_qubits, seed, 0)
    }

    /// Create a builder with room for `capacity` operations
    pub fn with_capacity(num_qubits: usize, seed: u64, capacity: usize) -> Result<Self> {
        let circuit = Circuit::with_capacity(num_qubits, capacity)?;
        let state = StateVector::new(num_qubits)?;
        Ok(Self {
            state,
            rng: StdRng::seed_from_u64(seed),
            circuit,
            outcomes: Vec::new(),
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    pub fn state(&self) -> &StateVector<f64> {
        &self.state
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Measurement outcomes so far, in call order
    pub fn outcomes(&self) -> &[u8] {
        &self.outcomes
    }

    /// Finish building and keep only the log
    pub fn build(self) -> Circuit {
        self.circuit
    }

    /// Finish building and keep the log and the final state
    pub fn into_parts(self) -> (Circuit, StateVector<f64>) {
        (self.circuit, self.state)
    }

    /// Apply and record an operation
    ///
    /// The operation is validated and log space is reserved before the state
    /// is touched, so an error leaves both the state and the log unchanged.
    pub fn apply(&mut self, op: Operation) -> Result<&mut Self> {
        self.circuit.check_operation(&op)?;
        self.circuit.reserve(1)?;
        if op.kind() == GateKind::Measure {
            self.outcomes.try_reserve(1)?;
        }

        trace!(operation = %op, "builder apply");
        if let Some(outcome) = op.apply(&mut self.state, &mut self.rng)? {
            self.outcomes.push(outcome);
        }
        self.circuit.push(op)?;
        Ok(self)
    }

    fn record(&mut self, kind: GateKind, qubits: &[usize], parameter: Option<f64>) -> Result<&mut Self> {
        let op = Operation::new(kind, qubits, parameter)?;
        self.apply(op)
    }

    pub fn h(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::H, &[qubit], None)
    }

    pub fn x(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::X, &[qubit], None)
    }

    pub fn y(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::Y, &[qubit], None)
    }

    pub fn z(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::Z, &[qubit], None)
    }

    pub fn s(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::S, &[qubit], None)
    }

    pub fn sdg(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::Sdg, &[qubit], None)
    }

    pub fn t(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::T, &[qubit], None)
    }

    pub fn tdg(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::Tdg, &[qubit], None)
    }

    pub fn rx(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.record(GateKind::Rx, &[qubit], Some(theta))
    }

    pub fn ry(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.record(GateKind::Ry, &[qubit], Some(theta))
    }

    pub fn rz(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.record(GateKind::Rz, &[qubit], Some(theta))
    }

    pub fn phase(&mut self, qubit: usize, phi: f64) -> Result<&mut Self> {
        self.record(GateKind::Phase, &[qubit], Some(phi))
    }

    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.record(GateKind::Cnot, &[control, target], None)
    }

    pub fn cy(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.record(GateKind::Cy, &[control, target], None)
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.record(GateKind::Cz, &[control, target], None)
    }

    pub fn ch(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.record(GateKind::Ch, &[control, target], None)
    }

    pub fn cs(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.record(GateKind::Cs, &[control, target], None)
    }

    pub fn ct(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.record(GateKind::Ct, &[control, target], None)
    }

    pub fn cp(&mut self, control: usize, target: usize, phi: f64) -> Result<&mut Self> {
        self.record(GateKind::Cp, &[control, target], Some(phi))
    }

    pub fn swap(&mut self, q1: usize, q2: usize) -> Result<&mut Self> {
        self.record(GateKind::Swap, &[q1, q2], None)
    }

    pub fn toffoli(&mut self, control1: usize, control2: usize, target: usize) -> Result<&mut Self> {
        self.record(GateKind::Toffoli, &[control1, control2, target], None)
    }

    pub fn measure(&mut self, qubit: usize) -> Result<&mut Self> {
        self.record(GateKind::Measure, &[qubit], None)
    }

    pub fn bit_flip(&mut self, qubit: usize, p: f64) -> Result<&mut Self> {
        self.record(GateKind::BitFlip, &[qubit], Some(p))
    }

    pub fn phase_flip(&mut self, qubit: usize, p: f64) -> Result<&mut Self> {
        self.record(GateKind::PhaseFlip, &[qubit], Some(p))
    }

    pub fn depolarizing(&mut self, qubit: usize, p: f64) -> Result<&mut Self> {
        self.record(GateKind::Depolarizing, &[qubit], Some(p))
    }

    pub fn amplitude_damping(&mut self, qubit: usize, gamma: f64) -> Result<&mut Self> {
        self.record(GateKind::AmplitudeDamping, &[qubit], Some(gamma))
    }

    pub fn phase_damping(&mut self, qubit: usize, gamma: f64) -> Result<&mut Self> {
        self.record(GateKind::PhaseDamping, &[qubit], Some(gamma))
    }
}
