//! Geometric memory kernel for the discrete-time Hawkes process.
//!
//! Purpose
//! -------
//! Compute the decayed infection intensity
//!
//! ```text
//! λ(t) = Σ_{k=0}^{t-1} obs[k] · ω · (1 − ω)^(t − k − 1)
//! ```
//!
//! either by the full O(t) convolution the Hawkes kernel uses on every call,
//! or incrementally through [`HawkesMemory`], which applies the equivalent
//! recursion `λ(t + 1) = (1 − ω)·λ(t) + ω·obs[t]` in O(1) per step.
//!
//! Invariants & assumptions
//! ------------------------
//! - `0 < ω ≤ 1`; the weights sum to `1 − (1 − ω)^t`, which tends to 1.
//! - `ω = 1` puts all weight on the most recent observation.
//! - An empty history (t = 0) yields λ = 0.
//!
//! Conventions
//! -----------
//! - Weights are built backwards from the most recent step by repeated
//!   multiplication with `1 − ω`, avoiding `powi` on large exponents.
use crate::epidemic::{
    core::validation::{validate_decay_param, validate_observation},
    errors::KernelResult,
};
use ndarray::{Array1, ArrayView1, aview1};

/// Memory weights for steps `0..t`, oldest first.
///
/// `weights[k] = ω · (1 − ω)^(t − k − 1)`.
pub fn decay_weights(omega: f64, t: usize) -> Array1<f64> {
    let mut weights = Array1::zeros(t);
    let mut w = omega;
    for k in (0..t).rev() {
        weights[k] = w;
        w *= 1.0 - omega;
    }
    weights
}

/// Full O(t) convolution of `observed` with the geometric kernel.
///
/// Every entry of `observed` contributes; pass `series.prefix(t)?` to
/// restrict to steps before `t`.
pub fn convolve_history(observed: &[f64], omega: f64) -> f64 {
    let mut intensity = 0.0;
    let mut w = omega;
    for &count in observed.iter().rev() {
        intensity += count * w;
        w *= 1.0 - omega;
    }
    intensity
}

/// Per-particle convolution for a column of decay rates.
///
/// When every particle shares the same `ω` the convolution runs once and is
/// broadcast.
pub fn convolve_history_column(observed: &[f64], omegas: ArrayView1<'_, f64>) -> Array1<f64> {
    match omegas.first() {
        Some(&first) if omegas.iter().all(|&w| w == first) => {
            Array1::from_elem(omegas.len(), convolve_history(observed, first))
        }
        _ => omegas.mapv(|omega| convolve_history(observed, omega)),
    }
}

/// Incremental geometric memory, equivalent to [`convolve_history`].
///
/// After `observe` has been called with `obs[0], …, obs[t−1]`,
/// [`HawkesMemory::intensity`] equals `convolve_history(&obs[..t], ω)` up to
/// rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HawkesMemory {
    omega: f64,
    intensity: f64,
    steps: usize,
}

impl HawkesMemory {
    /// Start an empty memory with decay `omega`.
    ///
    /// # Errors
    /// - `KernelError::InvalidDecay` unless `0 < omega ≤ 1`.
    pub fn new(omega: f64) -> KernelResult<Self> {
        validate_decay_param(aview1(&[omega]))?;
        Ok(HawkesMemory { omega, intensity: 0.0, steps: 0 })
    }

    /// Fold the observation of the current step into the memory and return
    /// the intensity for the next step.
    ///
    /// # Errors
    /// - `KernelError::InvalidObservation` if `count` is NaN, ±inf, or < 0.
    pub fn observe(&mut self, count: f64) -> KernelResult<f64> {
        let count = validate_observation(self.steps, count)?;
        self.intensity = (1.0 - self.omega) * self.intensity + self.omega * count;
        self.steps += 1;
        Ok(self.intensity)
    }

    /// Intensity λ(t) for the next step `t = steps()`.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Number of observations folded in so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Decay rate ω.
    pub fn omega(&self) -> f64 {
        self.omega
    }
}
