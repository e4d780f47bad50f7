//! Observed infection counts consumed by the Hawkes kernel.
//!
//! [`ObservedSeries`] is an append-only, validated history of per-step
//! observation counts. Index `k` holds the count observed at step `k`; the
//! Hawkes kernel at step `t` reads entries `0..t`.
use crate::epidemic::{
    core::validation::validate_observation,
    errors::{KernelError, KernelResult},
};
use ndarray::Array1;

/// Append-only series of observed counts (finite, ≥ 0).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedSeries {
    values: Vec<f64>,
}

impl ObservedSeries {
    /// Validate and wrap an existing history.
    ///
    /// # Errors
    /// - [`KernelError::InvalidObservation`] for the first NaN, ±inf, or
    ///   negative entry.
    pub fn new(values: Vec<f64>) -> KernelResult<Self> {
        for (index, &value) in values.iter().enumerate() {
            validate_observation(index, value)?;
        }
        Ok(ObservedSeries { values })
    }

    /// Validate and wrap an `ndarray` history.
    pub fn from_array(values: Array1<f64>) -> KernelResult<Self> {
        ObservedSeries::new(values.to_vec())
    }

    /// Append the observation for the next step.
    ///
    /// # Errors
    /// - [`KernelError::InvalidObservation`] if `value` is NaN, ±inf, or < 0.
    pub fn push(&mut self, value: f64) -> KernelResult<()> {
        let value = validate_observation(self.values.len(), value)?;
        self.values.push(value);
        Ok(())
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no step has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the full history.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Borrow the first `t` observations (steps `0..t`).
    ///
    /// # Errors
    /// - [`KernelError::HistoryTooShort`] if fewer than `t` steps are recorded.
    pub fn prefix(&self, t: usize) -> KernelResult<&[f64]> {
        self.values
            .get(..t)
            .ok_or(KernelError::HistoryTooShort { t, len: self.values.len() })
    }
}
