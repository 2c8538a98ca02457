//! Operation records
//!
//! An [`Operation`] is one entry of a circuit's flat log: a [`GateKind`] tag,
//! one to three qubit indices and an optional real parameter (a rotation
//! angle or a noise probability). Construction validates arity, parameter
//! presence and distinct qubits; the register bound is checked when the
//! operation is appended to a [`Circuit`](crate::Circuit).

use crate::error::{CircuitError, Result};
use qtraj_state::{NoiseChannel, StateError, StateVector};
use rand::Rng;
use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Every operation the log can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "snake_case"))]
pub enum GateKind {
    H,
    X,
    Y,
    Z,
    S,
    Sdg,
    T,
    Tdg,
    Rx,
    Ry,
    Rz,
    Phase,
    Cnot,
    Cy,
    Cz,
    Ch,
    Cs,
    Ct,
    Cp,
    Swap,
    Toffoli,
    Measure,
    BitFlip,
    PhaseFlip,
    Depolarizing,
    AmplitudeDamping,
    PhaseDamping,
}

impl GateKind {
    /// All kinds, in declaration order
    pub const ALL: [GateKind; 27] = [
        GateKind::H,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::S,
        GateKind::Sdg,
        GateKind::T,
        GateKind::Tdg,
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
        GateKind::Phase,
        GateKind::Cnot,
        GateKind::Cy,
        GateKind::Cz,
        GateKind::Ch,
        GateKind::Cs,
        GateKind::Ct,
        GateKind::Cp,
        GateKind::Swap,
        GateKind::Toffoli,
        GateKind::Measure,
        GateKind::BitFlip,
        GateKind::PhaseFlip,
        GateKind::Depolarizing,
        GateKind::AmplitudeDamping,
        GateKind::PhaseDamping,
    ];

    /// Mnemonic used by the text format
    pub fn name(self) -> &'static str {
        match self {
            GateKind::H => "h",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::S => "s",
            GateKind::Sdg => "sdg",
            GateKind::T => "t",
            GateKind::Tdg => "tdg",
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::Phase => "p",
            GateKind::Cnot => "cx",
            GateKind::Cy => "cy",
            GateKind::Cz => "cz",
            GateKind::Ch => "ch",
            GateKind::Cs => "cs",
            GateKind::Ct => "ct",
            GateKind::Cp => "cp",
            GateKind::Swap => "swap",
            GateKind::Toffoli => "ccx",
            GateKind::Measure => "measure",
            GateKind::BitFlip => "bit_flip",
            GateKind::PhaseFlip => "phase_flip",
            GateKind::Depolarizing => "depolarizing",
            GateKind::AmplitudeDamping => "amplitude_damping",
            GateKind::PhaseDamping => "phase_damping",
        }
    }

    /// Look up a kind by mnemonic, accepting the common aliases
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "cnot" => GateKind::Cnot,
            "toffoli" => GateKind::Toffoli,
            "phase" | "u1" => GateKind::Phase,
            "cphase" | "cu1" => GateKind::Cp,
            other => return Self::ALL.iter().copied().find(|k| k.name() == other),
        };
        Some(kind)
    }

    /// Number of qubits the operation acts on
    pub fn num_qubits(self) -> usize {
        match self {
            GateKind::Cnot
            | GateKind::Cy
            | GateKind::Cz
            | GateKind::Ch
            | GateKind::Cs
            | GateKind::Ct
            | GateKind::Cp
            | GateKind::Swap => 2,
            GateKind::Toffoli => 3,
            _ => 1,
        }
    }

    /// True if the operation carries a real parameter
    pub fn has_parameter(self) -> bool {
        matches!(
            self,
            GateKind::Rx | GateKind::Ry | GateKind::Rz | GateKind::Phase | GateKind::Cp
        ) || self.is_noise()
    }

    /// True for the five noise channels
    pub fn is_noise(self) -> bool {
        matches!(
            self,
            GateKind::BitFlip
                | GateKind::PhaseFlip
                | GateKind::Depolarizing
                | GateKind::AmplitudeDamping
                | GateKind::PhaseDamping
        )
    }

    /// True for gates whose leading qubits are controls
    pub fn is_controlled(self) -> bool {
        matches!(
            self,
            GateKind::Cnot
                | GateKind::Cy
                | GateKind::Cz
                | GateKind::Ch
                | GateKind::Cs
                | GateKind::Ct
                | GateKind::Cp
                | GateKind::Toffoli
        )
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One validated entry of a circuit log
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(try_from = "RawOperation"))]
pub struct Operation {
    kind: GateKind,
    qubits: SmallVec<[usize; 3]>,
    #[cfg_attr(feature = "serialization", serde(skip_serializing_if = "Option::is_none"))]
    parameter: Option<f64>,
}

/// Unvalidated wire form; deserialized operations pass through
/// [`Operation::new`]
#[cfg(feature = "serialization")]
#[derive(Deserialize)]
struct RawOperation {
    kind: GateKind,
    qubits: SmallVec<[usize; 3]>,
    #[serde(default)]
    parameter: Option<f64>,
}

#[cfg(feature = "serialization")]
impl TryFrom<RawOperation> for Operation {
    type Error = CircuitError;

    fn try_from(raw: RawOperation) -> Result<Self> {
        Self::new(raw.kind, &raw.qubits, raw.parameter)
    }
}

impl Operation {
    /// Create an operation
    ///
    /// # Errors
    /// Returns error if the qubit count does not match the kind, a qubit is
    /// repeated, the parameter is missing, unexpected or not finite, or a
    /// noise probability lies outside [0, 1].
    pub fn new(kind: GateKind, qubits: &[usize], parameter: Option<f64>) -> Result<Self> {
        if qubits.len() != kind.num_qubits() {
            return Err(CircuitError::InvalidQubitCount {
                gate: kind.name(),
                expected: kind.num_qubits(),
                actual: qubits.len(),
            });
        }
        for (pos, &q) in qubits.iter().enumerate() {
            if qubits[..pos].contains(&q) {
                return Err(CircuitError::DuplicateQubit(q));
            }
        }
        match (kind.has_parameter(), parameter) {
            (true, None) => return Err(CircuitError::MissingParameter { gate: kind.name() }),
            (false, Some(_)) => {
                return Err(CircuitError::UnexpectedParameter { gate: kind.name() })
            },
            (true, Some(p)) if !p.is_finite() => {
                return Err(CircuitError::NonFiniteParameter { gate: kind.name() })
            },
            _ => {},
        }

        let op = Self {
            kind,
            qubits: SmallVec::from_slice(qubits),
            parameter,
        };
        // Validates the probability range for noise kinds
        op.noise_channel().transpose()?;
        Ok(op)
    }

    /// Single-qubit gate or measurement without a parameter
    pub fn single(kind: GateKind, qubit: usize) -> Result<Self> {
        Self::new(kind, &[qubit], None)
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn qubits(&self) -> &[usize] {
        &self.qubits
    }

    pub fn parameter(&self) -> Option<f64> {
        self.parameter
    }

    /// The noise channel this operation applies, if it is a noise kind
    pub fn noise_channel(&self) -> Option<std::result::Result<NoiseChannel<f64>, StateError>> {
        let p = self.parameter?;
        let channel = match self.kind {
            GateKind::BitFlip => NoiseChannel::bit_flip(p),
            GateKind::PhaseFlip => NoiseChannel::phase_flip(p),
            GateKind::Depolarizing => NoiseChannel::depolarizing(p),
            GateKind::AmplitudeDamping => NoiseChannel::amplitude_damping(p),
            GateKind::PhaseDamping => NoiseChannel::phase_damping(p),
            _ => return None,
        };
        Some(channel)
    }

    /// Apply the operation to `state`
    ///
    /// # Returns
    /// The outcome for a measurement, `None` otherwise
    pub fn apply<R: Rng + ?Sized>(&self, state: &mut StateVector<f64>, rng: &mut R) -> Result<Option<u8>> {
        let q = &self.qubits;
        let theta = self.parameter.unwrap_or_default();

        match self.kind {
            GateKind::H => state.h(q[0])?,
            GateKind::X => state.x(q[0])?,
            GateKind::Y => state.y(q[0])?,
            GateKind::Z => state.z(q[0])?,
            GateKind::S => state.s(q[0])?,
            GateKind::Sdg => state.sdg(q[0])?,
            GateKind::T => state.t(q[0])?,
            GateKind::Tdg => state.tdg(q[0])?,
            GateKind::Rx => state.rx(q[0], theta)?,
            GateKind::Ry => state.ry(q[0], theta)?,
            GateKind::Rz => state.rz(q[0], theta)?,
            GateKind::Phase => state.phase(q[0], theta)?,
            GateKind::Cnot => state.cnot(q[0], q[1])?,
            GateKind::Cy => state.cy(q[0], q[1])?,
            GateKind::Cz => state.cz(q[0], q[1])?,
            GateKind::Ch => state.ch(q[0], q[1])?,
            GateKind::Cs => state.cs(q[0], q[1])?,
            GateKind::Ct => state.ct(q[0], q[1])?,
            GateKind::Cp => state.cp(q[0], q[1], theta)?,
            GateKind::Swap => state.swap(q[0], q[1])?,
            GateKind::Toffoli => state.toffoli(q[0], q[1], q[2])?,
            GateKind::Measure => return Ok(Some(state.measure(q[0], rng)?)),
            GateKind::BitFlip
            | GateKind::PhaseFlip
            | GateKind::Depolarizing
            | GateKind::AmplitudeDamping
            | GateKind::PhaseDamping => {
                if let Some(channel) = self.noise_channel() {
                    channel?.apply(state, q[0], rng)?;
                }
            },
        }
        Ok(None)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(p) = self.parameter {
            write!(f, "({})", p)?;
        }
        for (i, q) in self.qubits.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}q{}", sep, q)?;
        }
        Ok(())
    }
}
