//! Flat operation log

use crate::error::{CircuitError, Result};
use crate::operation::{GateKind, Operation};
use qtraj_state::{StateError, StateVector, MAX_QUBITS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::debug;

/// A quantum circuit
///
/// A register size plus the ordered list of operations applied to it.
/// Appending never panics: indices are validated and allocation failure is
/// reported as [`CircuitError::Allocation`].
///
/// # Example
/// ```
/// use qtraj_circuit::{Circuit, GateKind};
///
/// let mut circuit = Circuit::new(2).unwrap();
/// circuit.add(GateKind::H, &[0], None).unwrap();
/// circuit.add(GateKind::Cnot, &[0, 1], None).unwrap();
/// assert_eq!(circuit.len(), 2);
///
/// let (state, outcomes) = circuit.run(7).unwrap();
/// assert!(outcomes.is_empty());
/// assert!((state.probability_of_basis_state(3).unwrap() - 0.5).abs() < 1e-10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    operations: Vec<Operation>,
}

impl Circuit {
    /// Create an empty circuit on `num_qubits` qubits
    ///
    /// # Errors
    /// Returns [`CircuitError::EmptyCircuit`] if `num_qubits` is 0, or
    /// [`StateError::TooManyQubits`] past [`MAX_QUBITS`]
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_capacity(num_qubits, 0)
    }

    /// Create a circuit with room for `capacity` operations
    pub fn with_capacity(num_qubits: usize, capacity: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(CircuitError::EmptyCircuit);
        }
        if num_qubits > MAX_QUBITS {
            return Err(StateError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            }
            .into());
        }
        let mut operations = Vec::new();
        operations.try_reserve_exact(capacity)?;
        Ok(Self {
            num_qubits,
            operations,
        })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of measurement operations
    pub fn num_measurements(&self) -> usize {
        self.count(|kind| kind == GateKind::Measure)
    }

    /// Number of noise operations
    pub fn num_noise_operations(&self) -> usize {
        self.count(GateKind::is_noise)
    }

    fn count(&self, pred: impl Fn(GateKind) -> bool) -> usize {
        self.operations.iter().filter(|op| pred(op.kind())).count()
    }

    /// Check that every qubit of `op` lies in this circuit's register
    pub fn check_operation(&self, op: &Operation) -> Result<()> {
        for &q in op.qubits() {
            if q >= self.num_qubits {
                return Err(CircuitError::InvalidQubit {
                    index: q,
                    num_qubits: self.num_qubits,
                });
            }
        }
        Ok(())
    }

    /// Reserve room for `additional` more operations
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.operations.try_reserve(additional)?;
        Ok(())
    }

    /// Append a validated operation
    pub fn push(&mut self, op: Operation) -> Result<()> {
        self.check_operation(&op)?;
        self.operations.try_reserve(1)?;
        self.operations.push(op);
        Ok(())
    }

    /// Build and append an operation
    pub fn add(&mut self, kind: GateKind, qubits: &[usize], parameter: Option<f64>) -> Result<()> {
        self.push(Operation::new(kind, qubits, parameter)?)
    }

    /// Replay the log on `state`
    ///
    /// # Returns
    /// Measurement outcomes in log order
    ///
    /// # Errors
    /// Returns [`CircuitError::RegisterMismatch`] before touching the state
    /// if the sizes differ. An error from an individual operation stops the
    /// replay; the operations before it remain applied.
    pub fn execute<R: Rng + ?Sized>(&self, state: &mut StateVector<f64>, rng: &mut R) -> Result<Vec<u8>> {
        if state.num_qubits() != self.num_qubits {
            return Err(CircuitError::RegisterMismatch {
                circuit: self.num_qubits,
                state: state.num_qubits(),
            });
        }

        debug!(
            num_qubits = self.num_qubits,
            operations = self.operations.len(),
            "executing circuit"
        );

        let mut outcomes = Vec::with_capacity(self.num_measurements());
        for op in &self.operations {
            if let Some(outcome) = op.apply(state, rng)? {
                outcomes.push(outcome);
            }
        }
        Ok(outcomes)
    }

    /// Execute on a fresh ground state with a seeded RNG
    pub fn run(&self, seed: u64) -> Result<(StateVector<f64>, Vec<u8>)> {
        let mut state = StateVector::new(self.num_qubits)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let outcomes = self.execute(&mut state, &mut rng)?;
        Ok((state, outcomes))
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::ascii::render(self))
    }
}
