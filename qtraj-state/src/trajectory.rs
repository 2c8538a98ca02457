//! Quantum trajectory ensembles
//!
//! A single noisy run of a circuit is one trajectory. Averaging the
//! basis-state probabilities over many independent trajectories converges
//! to the diagonal of the density matrix at a rate of 1/√N.
//!
//! Each trajectory owns its own [`StateVector`] and its own [`StdRng`]
//! seeded from `seed + index`, so a run is reproducible whether it executes
//! sequentially or on the rayon pool.
//!
//! # Example
//!
//! ```
//! use qtraj_state::{TrajectoryConfig, TrajectoryRunner};
//!
//! let config = TrajectoryConfig::new().with_trajectories(200).with_seed(42);
//! let runner = TrajectoryRunner::new(config);
//!
//! let ensemble = runner
//!     .run::<f64, _>(1, |state, rng| {
//!         state.x(0)?;
//!         state.bit_flip_noise(0, 0.25, rng)?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let excited = ensemble.excited_population(0).unwrap();
//! assert!((excited - 0.75).abs() < 0.15);
//! ```

use crate::error::{Result, StateError};
use crate::state_vector::StateVector;
use qtraj_gates::Real;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::debug;

/// Configuration for a trajectory ensemble
#[derive(Debug, Clone)]
pub struct TrajectoryConfig {
    /// Number of independent trajectories
    pub trajectories: usize,

    /// Base seed; trajectory `i` uses `seed + i`. `None` draws a fresh seed.
    pub seed: Option<u64>,

    /// Run trajectories on the rayon thread pool
    pub parallel: bool,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            trajectories: 1000,
            seed: None,
            parallel: true,
        }
    }
}

impl TrajectoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trajectories(mut self, trajectories: usize) -> Self {
        self.trajectories = trajectories;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Averaged result of a trajectory run
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryEnsemble<T: Real = f64> {
    num_qubits: usize,
    trajectories: usize,
    mean_probabilities: Vec<T>,
}

impl<T: Real> TrajectoryEnsemble<T> {
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn trajectories(&self) -> usize {
        self.trajectories
    }

    /// Mean Born probability of every basis state
    pub fn mean_probabilities(&self) -> &[T] {
        &self.mean_probabilities
    }

    /// Mean probability of finding `qubit` in |1⟩
    ///
    /// Returns `None` if `qubit` is out of range.
    pub fn excited_population(&self, qubit: usize) -> Option<T> {
        if qubit >= self.num_qubits {
            return None;
        }
        let mask = 1usize << qubit;
        Some(
            self.mean_probabilities
                .iter()
                .enumerate()
                .filter(|(idx, _)| idx & mask != 0)
                .fold(T::zero(), |acc, (_, &p)| acc + p),
        )
    }

    /// Mean excited population of every qubit, indexed by qubit
    pub fn excited_populations(&self) -> Vec<T> {
        (0..self.num_qubits)
            .filter_map(|qubit| self.excited_population(qubit))
            .collect()
    }
}

/// Runs a trajectory body many times and averages the outcome
#[derive(Debug, Clone, Default)]
pub struct TrajectoryRunner {
    config: TrajectoryConfig,
}

impl TrajectoryRunner {
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    /// Run `body` once per trajectory on a fresh n-qubit ground state
    ///
    /// # Errors
    /// Returns [`StateError::NoTrajectories`] for an empty ensemble, any
    /// error from creating the register, or the first error returned by
    /// `body`.
    pub fn run<T, F>(&self, num_qubits: usize, body: F) -> Result<TrajectoryEnsemble<T>>
    where
        T: Real,
        F: Fn(&mut StateVector<T>, &mut StdRng) -> Result<()> + Sync + Send,
    {
        let trajectories = self.config.trajectories;
        if trajectories == 0 {
            return Err(StateError::NoTrajectories);
        }

        let template = StateVector::<T>::new(num_qubits)?;
        let dimension = template.dimension();
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        debug!(
            num_qubits,
            trajectories,
            seed = base_seed,
            parallel = self.config.parallel,
            "running trajectory ensemble"
        );

        let run_one = |index: usize| -> Result<Vec<T>> {
            let mut state = template.clone();
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(index as u64));
            body(&mut state, &mut rng)?;
            Ok(state.probabilities())
        };

        let add = |mut acc: Vec<T>, probs: Vec<T>| -> Result<Vec<T>> {
            for (a, p) in acc.iter_mut().zip(probs) {
                *a += p;
            }
            Ok(acc)
        };

        let totals = if self.config.parallel {
            (0..trajectories)
                .into_par_iter()
                .map(run_one)
                .try_reduce(|| vec![T::zero(); dimension], add)?
        } else {
            let mut totals = vec![T::zero(); dimension];
            for index in 0..trajectories {
                totals = add(totals, run_one(index)?)?;
            }
            totals
        };

        let scale = T::one() / T::of(trajectories as f64);
        let mean_probabilities: Vec<T> = totals.into_iter().map(|p| p * scale).collect();

        debug!(trajectories, "trajectory ensemble complete");

        Ok(TrajectoryEnsemble {
            num_qubits,
            trajectories,
            mean_probabilities,
        })
    }
}
