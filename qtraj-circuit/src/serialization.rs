//! JSON persistence for circuits
//!
//! Operations are stored as their kind, qubit list and optional parameter.
//! Each operation is rebuilt through [`Operation::new`] while decoding and
//! the register bound is checked on push, so a hand-edited file cannot
//! produce a circuit the builder would have rejected.

use crate::circuit::Circuit;
use crate::error::{CircuitError, Result};
use crate::operation::Operation;
use serde::{Deserialize, Serialize};

/// Current serialization format version
pub const CIRCUIT_FORMAT_VERSION: u32 = 1;

/// Serialized circuit representation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SerializedCircuit {
    /// Format version for compatibility checking
    pub version: u32,
    /// Number of qubits in the circuit
    pub num_qubits: usize,
    /// Operations in log order
    pub operations: Vec<Operation>,
}

impl SerializedCircuit {
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            version: CIRCUIT_FORMAT_VERSION,
            num_qubits: circuit.num_qubits(),
            operations: circuit.operations().to_vec(),
        }
    }

    /// Check version compatibility
    pub fn check_version(&self) -> Result<()> {
        if self.version > CIRCUIT_FORMAT_VERSION {
            return Err(CircuitError::VersionMismatch {
                expected: CIRCUIT_FORMAT_VERSION,
                actual: self.version,
            });
        }
        Ok(())
    }

    /// Rebuild a validated circuit
    pub fn into_circuit(self) -> Result<Circuit> {
        self.check_version()?;
        let mut circuit = Circuit::with_capacity(self.num_qubits, self.operations.len())?;
        for op in self.operations {
            circuit.push(op)?;
        }
        Ok(circuit)
    }
}

/// Serialize a circuit to compact JSON
pub fn to_json(circuit: &Circuit) -> Result<String> {
    Ok(serde_json::to_string(&SerializedCircuit::from_circuit(circuit))?)
}

/// Serialize a circuit to indented JSON
pub fn to_json_pretty(circuit: &Circuit) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SerializedCircuit::from_circuit(circuit))?)
}

/// Deserialize and validate a circuit
pub fn from_json(json: &str) -> Result<Circuit> {
    let serialized: SerializedCircuit = serde_json::from_str(json)?;
    serialized.into_circuit()
}

impl Circuit {
    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json)
    }
}
