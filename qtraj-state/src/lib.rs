//! State-vector engine with measurement and Monte Carlo wavefunction noise
//!
//! This crate holds the dense 2^n amplitude vector of an n-qubit register
//! and everything that mutates it:
//!
//! - **Gates**: bit-indexed kernels that update amplitude pairs in place
//!   without building the full 2^n × 2^n operator
//! - **Controlled gates**: CNOT and friends, SWAP, Toffoli and arbitrary
//!   multi-controlled single-qubit gates
//! - **Measurement**: Born-rule sampling with collapse and renormalization
//! - **Noise**: quantum-trajectory channels that pick one Kraus branch per
//!   application from a single uniform variate
//! - **Ensembles**: seeded, optionally parallel trajectory averaging
//!
//! Qubit `k` is bit `k` of the basis index (little-endian).
//!
//! # Example
//!
//! ```
//! use qtraj_state::StateVector;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut state = StateVector::<f64>::new(2).unwrap();
//! state.h(0).unwrap();
//! state.cnot(0, 1).unwrap();
//! state.depolarizing_noise(0, 0.01, &mut rng).unwrap();
//!
//! let a = state.measure(0, &mut rng).unwrap();
//! let b = state.measure(1, &mut rng).unwrap();
//! assert!(state.is_normalized(1e-10));
//! # let _ = (a, b);
//! ```

pub mod error;
pub mod kernels;
pub mod measurement;
pub mod multi_controlled;
pub mod noise;
pub mod state_vector;
pub mod trajectory;

pub use error::{Result, StateError};
pub use noise::{KrausBranch, NoiseChannel};
pub use state_vector::{StateVector, MAX_QUBITS};
pub use trajectory::{TrajectoryConfig, TrajectoryEnsemble, TrajectoryRunner};
