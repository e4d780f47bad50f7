//! Per-call step context: time step and, for Hawkes, the observation history.
//!
//! Purpose
//! -------
//! Bundle the scalar inputs of a kernel call that are not part of the
//! ensemble or the parameters, so every kernel shares one `advance`
//! signature.
//!
//! Key behaviors
//! -------------
//! - [`StepContext::new`] validates `dt > 0`; [`StepContext::unit`] is the
//!   common `dt = 1` case.
//! - [`StepContext::with_history`] attaches the observed series, the current
//!   step index `t`, and the total population `N` required by the Hawkes
//!   kernel, checking `t ≤ len(history)` and `N > 0` up front.
//!
//! Conventions
//! -----------
//! - Compartmental kernels ignore the history; the Hawkes kernel ignores
//!   `dt` (its step is the observation interval).
use crate::epidemic::{
    core::{
        observations::ObservedSeries,
        validation::{validate_population, validate_time_step},
    },
    errors::{KernelError, KernelResult},
};

/// Observation history attached to a step.
#[derive(Debug, Clone, Copy)]
pub struct HistoryWindow<'a> {
    /// Shared observed series (read-only).
    pub observed: &'a ObservedSeries,
    /// Current step index; steps `0..t` are visible.
    pub t: usize,
    /// Total population `N`.
    pub population: f64,
}

impl<'a> HistoryWindow<'a> {
    /// Observations strictly before the current step.
    pub fn visible(&self) -> KernelResult<&'a [f64]> {
        self.observed.prefix(self.t)
    }
}

/// Scalar inputs of one kernel call.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    dt: f64,
    history: Option<HistoryWindow<'a>>,
}

impl<'a> StepContext<'a> {
    /// Context with time step `dt` and no history.
    ///
    /// # Errors
    /// - [`KernelError::InvalidTimeStep`] unless `dt` is finite and > 0.
    pub fn new(dt: f64) -> KernelResult<Self> {
        Ok(StepContext { dt: validate_time_step(dt)?, history: None })
    }

    /// Context with `dt = 1` and no history.
    pub fn unit() -> Self {
        StepContext { dt: 1.0, history: None }
    }

    /// Attach the observation history for step `t` and population `N`.
    ///
    /// # Errors
    /// - [`KernelError::InvalidPopulation`] unless `population` is finite
    ///   and > 0.
    /// - [`KernelError::HistoryTooShort`] if `t > observed.len()`.
    pub fn with_history(
        self, observed: &'a ObservedSeries, t: usize, population: f64,
    ) -> KernelResult<Self> {
        let population = validate_population(population)?;
        if t > observed.len() {
            return Err(KernelError::HistoryTooShort { t, len: observed.len() });
        }
        Ok(StepContext { dt: self.dt, history: Some(HistoryWindow { observed, t, population }) })
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Attached history, if any.
    pub fn history(&self) -> Option<&HistoryWindow<'a>> {
        self.history.as_ref()
    }
}

impl Default for StepContext<'_> {
    fn default() -> Self {
        StepContext::unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify context validation.
    //
    // Given
    // -----
    // - dt = -1; a 2-step history with t = 3; population 0; a valid window.
    //
    // Expect
    // ------
    // - `InvalidTimeStep`, `HistoryTooShort`, `InvalidPopulation`, and a
    //   window exposing the first `t` observations.
    fn step_context_validates_inputs() {
        // Arrange
        let observed = ObservedSeries::new(vec![4.0, 6.0]).unwrap();

        // Act / Assert
        assert_eq!(StepContext::new(-1.0).unwrap_err(), KernelError::InvalidTimeStep { dt: -1.0 });
        assert_eq!(
            StepContext::unit().with_history(&observed, 3, 100.0).unwrap_err(),
            KernelError::HistoryTooShort { t: 3, len: 2 }
        );
        assert!(matches!(
            StepContext::unit().with_history(&observed, 1, 0.0),
            Err(KernelError::InvalidPopulation { .. })
        ));
        let ctx = StepContext::new(0.5).unwrap().with_history(&observed, 1, 100.0).unwrap();
        let window = ctx.history().expect("history attached");
        assert_eq!(ctx.dt(), 0.5);
        assert_eq!(window.visible(), Ok(&[4.0][..]));
    }
}
