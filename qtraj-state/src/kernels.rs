//! Bit-indexed amplitude kernels
//!
//! These functions apply 2-level operators to a raw amplitude slice without
//! building the full 2^n × 2^n matrix. A gate on qubit `q` couples the
//! amplitude pairs `(i, j)` where `i` has bit `q` clear and `j = i | (1 << q)`.
//! Each kernel visits only the clear-bit half of every pair, so each pair is
//! updated exactly once and the cost is O(2^n).
//!
//! The kernels do not validate their arguments; [`StateVector`] checks qubit
//! indices before calling them.
//!
//! [`StateVector`]: crate::StateVector

use num_complex::Complex;
use qtraj_gates::{GateMatrix, Real};

/// Apply a 2×2 matrix to every amplitude pair of `qubit`
///
/// # Algorithm
/// Amplitudes are walked in blocks of `2 << qubit`. Inside a block the first
/// half has the qubit bit clear and the second half has it set, so the
/// partner of index `i` is always `i + (1 << qubit)`.
pub fn apply_single_qubit<T: Real>(state: &mut [Complex<T>], matrix: &GateMatrix<T>, qubit: usize) {
    let stride = 1usize << qubit;
    let block = stride << 1;

    for base in (0..state.len()).step_by(block) {
        for i in base..base + stride {
            let j = i | stride;
            let (a0, a1) = matrix.apply_to(state[i], state[j]);
            state[i] = a0;
            state[j] = a1;
        }
    }
}

/// Apply a 2×2 matrix to `target` on the subspace where every bit of
/// `control_mask` is set
///
/// With a single control bit this is the controlled-U kernel; with several
/// it is the multi-controlled generalization. `control_mask` must not
/// contain the target bit.
pub fn apply_controlled<T: Real>(
    state: &mut [Complex<T>],
    matrix: &GateMatrix<T>,
    control_mask: usize,
    target: usize,
) {
    let stride = 1usize << target;
    let block = stride << 1;

    for base in (0..state.len()).step_by(block) {
        for i in base..base + stride {
            if i & control_mask != control_mask {
                continue;
            }
            let j = i | stride;
            let (a0, a1) = matrix.apply_to(state[i], state[j]);
            state[i] = a0;
            state[j] = a1;
        }
    }
}

/// Swap the amplitude pairs of `target` where every bit of `control_mask`
/// is set
///
/// This is a multi-controlled X without any complex arithmetic.
pub fn swap_controlled<T: Real>(state: &mut [Complex<T>], control_mask: usize, target: usize) {
    let stride = 1usize << target;

    for i in 0..state.len() {
        if i & control_mask == control_mask && i & stride == 0 {
            state.swap(i, i | stride);
        }
    }
}

/// Sum of |a_i|² over indices whose `qubit` bit equals `bit`
pub fn norm_sqr_for_bit<T: Real>(state: &[Complex<T>], qubit: usize, bit: usize) -> T {
    let mask = 1usize << qubit;
    let want = bit << qubit;
    state
        .iter()
        .enumerate()
        .filter(|(idx, _)| idx & mask == want)
        .fold(T::zero(), |acc, (_, amp)| acc + amp.norm_sqr())
}

/// Sum of |a_i|² over the whole slice
pub fn norm_sqr<T: Real>(state: &[Complex<T>]) -> T {
    state.iter().fold(T::zero(), |acc, amp| acc + amp.norm_sqr())
}

/// Multiply every amplitude by the real factor `factor`
pub fn scale_all<T: Real>(state: &mut [Complex<T>], factor: T) {
    for amp in state.iter_mut() {
        *amp = amp.scale(factor);
    }
}

/// Keep the amplitudes whose `qubit` bit equals `bit`, scaled by `factor`,
/// and zero the rest
pub fn project_bit<T: Real>(state: &mut [Complex<T>], qubit: usize, bit: usize, factor: T) {
    let mask = 1usize << qubit;
    let want = bit << qubit;
    let zero = Complex::new(T::zero(), T::zero());

    for (idx, amp) in state.iter_mut().enumerate() {
        if idx & mask == want {
            *amp = amp.scale(factor);
        } else {
            *amp = zero;
        }
    }
}

/// Multiply the amplitudes whose `qubit` bit is set by `factor`
pub fn scale_set_bit<T: Real>(state: &mut [Complex<T>], qubit: usize, factor: T) {
    let mask = 1usize << qubit;
    for (idx, amp) in state.iter_mut().enumerate() {
        if idx & mask != 0 {
            *amp = amp.scale(factor);
        }
    }
}

/// Move every |1⟩ amplitude of `qubit` into its |0⟩ partner and clear the
/// |1⟩ slot
///
/// The previous |0⟩ amplitudes are overwritten.
pub fn lower_bit<T: Real>(state: &mut [Complex<T>], qubit: usize) {
    let stride = 1usize << qubit;
    let block = stride << 1;
    let zero = Complex::new(T::zero(), T::zero());

    for base in (0..state.len()).step_by(block) {
        for i in base..base + stride {
            let j = i | stride;
            state[i] = state[j];
            state[j] = zero;
        }
    }
}
