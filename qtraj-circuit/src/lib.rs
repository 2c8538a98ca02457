//! Circuit log, fluent builder and text formats for qtraj
//!
//! A [`Circuit`] is a register size plus a flat list of validated
//! [`Operation`]s. It can be replayed through the state-vector engine,
//! exported to and parsed from an OpenQASM 2.0 style text format, drawn as
//! an ASCII diagram, and (with the `serialization` feature) stored as JSON.
//!
//! [`CircuitBuilder`] applies gates to a live state while recording them.
//!
//! # Example
//!
//! ```
//! use qtraj_circuit::{parse_qasm, CircuitBuilder};
//!
//! let mut builder = CircuitBuilder::new(2, 7).unwrap();
//! builder.h(0).unwrap().cnot(0, 1).unwrap().bit_flip(1, 0.05).unwrap();
//!
//! let text = builder.circuit().to_qasm();
//! let parsed = parse_qasm(&text).unwrap();
//! assert_eq!(&parsed, builder.circuit());
//! println!("{}", parsed);
//! ```

pub mod ascii;
pub mod builder;
pub mod circuit;
pub mod error;
pub mod operation;
pub mod qasm;

#[cfg(feature = "serialization")]
pub mod serialization;

pub use ascii::{render, render_with_config, AsciiConfig, AsciiConfigBuilder, RenderStyle};
pub use builder::CircuitBuilder;
pub use circuit::Circuit;
pub use error::{CircuitError, Result};
pub use operation::{GateKind, Operation};
pub use qasm::{parse_qasm, to_qasm};

#[cfg(feature = "serialization")]
pub use serialization::{from_json, to_json, to_json_pretty, SerializedCircuit, CIRCUIT_FORMAT_VERSION};
