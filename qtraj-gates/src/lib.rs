//! Complex scalars and single-qubit gate matrices for qtraj
//!
//! This crate holds the register-size independent building blocks of the
//! simulator:
//!
//! - [`complex`]: the [`Real`] precision bound (`f32` or `f64`) and the
//!   comparisons used on [`Complex`] scalars
//! - [`matrix`]: [`GateMatrix`], the immutable 2×2 unitary value type with
//!   the standard catalogue, parametrized rotations, composition, adjoint
//!   and a per-entry unitarity check
//!
//! # Example
//!
//! ```
//! use qtraj_gates::GateMatrix;
//! use std::f64::consts::PI;
//!
//! let h = GateMatrix::<f64>::hadamard();
//! assert!(h.compose(&h).approx_eq(&GateMatrix::identity(), 1e-10));
//!
//! let rx = GateMatrix::rx(PI / 2.0);
//! assert!(rx.is_unitary(1e-10));
//! ```

pub mod complex;
pub mod matrix;

pub use complex::{ComplexExt, Real};
pub use matrix::GateMatrix;
pub use num_complex::Complex;
