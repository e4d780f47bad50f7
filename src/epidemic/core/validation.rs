//! Validation helpers for ensembles, parameters, and step contexts.
//!
//! Purpose
//! -------
//! Centralize the elementwise checks the kernels rely on so that ensembles,
//! parameter structs, observation histories, and step contexts all report
//! violations through the same [`KernelError`] variants.
//!
//! Key behaviors
//! -------------
//! - Scan columns once, stopping at the first offending particle, and report
//!   its row index and value.
//! - Keep counts (`S, I, R, NI, lambda_I, C_I`) and rates (`B, Rt, gamma`, ...)
//!   apart: both must be finite and ≥ 0, but they produce different variants.
//!
//! Invariants & assumptions
//! ------------------------
//! - Columns are 1-D views whose index is the particle index.
//! - Name uniqueness is checked with a quadratic scan; name lists are short
//!   (a handful of compartments or parameters).
//!
//! Conventions
//! -----------
//! - Helpers return `KernelResult<()>` (or the validated scalar) and never
//!   panic.
use crate::epidemic::errors::{KernelError, KernelResult};
use ndarray::ArrayView1;

/// Ensure every entry of a count column is finite and ≥ 0.
///
/// # Errors
/// - [`KernelError::NonFiniteState`] for NaN/±inf entries.
/// - [`KernelError::NegativeCompartment`] for entries < 0.
pub fn validate_count_column(column: ArrayView1<'_, f64>, name: &str) -> KernelResult<()> {
    for (particle, &value) in column.iter().enumerate() {
        if !value.is_finite() {
            return Err(KernelError::NonFiniteState { particle, column: name.to_string(), value });
        }
        if value < 0.0 {
            return Err(KernelError::NegativeCompartment {
                particle,
                column: name.to_string(),
                value,
            });
        }
    }
    Ok(())
}

/// Ensure every entry of a state-held rate column (e.g. `B`, `Rt`) is finite
/// and ≥ 0.
///
/// # Errors
/// - [`KernelError::NonFiniteState`] for NaN/±inf entries.
/// - [`KernelError::NegativeRate`] for entries < 0.
pub fn validate_state_rate_column(column: ArrayView1<'_, f64>, name: &str) -> KernelResult<()> {
    for (particle, &value) in column.iter().enumerate() {
        if !value.is_finite() {
            return Err(KernelError::NonFiniteState { particle, column: name.to_string(), value });
        }
        if value < 0.0 {
            return Err(KernelError::NegativeRate { name: name.to_string(), particle, value });
        }
    }
    Ok(())
}

/// Ensure every entry of a rate parameter column is finite and ≥ 0.
///
/// # Errors
/// - [`KernelError::NonFiniteParameter`] for NaN/±inf entries.
/// - [`KernelError::NegativeRate`] for entries < 0.
pub fn validate_rate_param(column: ArrayView1<'_, f64>, name: &str) -> KernelResult<()> {
    for (particle, &value) in column.iter().enumerate() {
        if !value.is_finite() {
            return Err(KernelError::NonFiniteParameter {
                name: name.to_string(),
                particle,
                value,
            });
        }
        if value < 0.0 {
            return Err(KernelError::NegativeRate { name: name.to_string(), particle, value });
        }
    }
    Ok(())
}

/// Ensure every Hawkes decay rate satisfies `0 < omega_I ≤ 1`.
///
/// # Errors
/// - [`KernelError::InvalidDecay`] for values outside (0, 1] or non-finite.
pub fn validate_decay_param(column: ArrayView1<'_, f64>) -> KernelResult<()> {
    for (particle, &value) in column.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            return Err(KernelError::InvalidDecay { particle, value });
        }
    }
    Ok(())
}

/// Validate a time step and return it.
///
/// # Errors
/// - [`KernelError::InvalidTimeStep`] if `dt` is non-finite or ≤ 0.
pub fn validate_time_step(dt: f64) -> KernelResult<f64> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(KernelError::InvalidTimeStep { dt });
    }
    Ok(dt)
}

/// Validate a total population size and return it.
///
/// # Errors
/// - [`KernelError::InvalidPopulation`] if `n` is non-finite or ≤ 0.
pub fn validate_population(n: f64) -> KernelResult<f64> {
    if !n.is_finite() || n <= 0.0 {
        return Err(KernelError::InvalidPopulation { value: n });
    }
    Ok(n)
}

/// Validate a single observation count.
///
/// # Errors
/// - [`KernelError::InvalidObservation`] if `value` is non-finite or < 0.
pub fn validate_observation(index: usize, value: f64) -> KernelResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(KernelError::InvalidObservation { index, value });
    }
    Ok(value)
}

/// Return the first name that occurs more than once, if any.
pub fn first_duplicate<S: AsRef<str>>(names: &[S]) -> Option<&str> {
    names.iter().enumerate().find_map(|(i, name)| {
        let name = name.as_ref();
        names[..i].iter().any(|prev| prev.as_ref() == name).then_some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Error variants and payloads for count, rate, and decay columns.
    // - Scalar guards for dt, population, and observations.
    // - Duplicate-name detection.
    //
    // They intentionally DO NOT cover:
    // - How ensembles and parameter structs wire these helpers together (see
    //   `ensemble` and `params`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure the first negative entry of a count column is reported.
    //
    // Given
    // -----
    // - Column [1.0, -2.0, -3.0] named "S".
    //
    // Expect
    // ------
    // - `NegativeCompartment { particle: 1, column: "S", value: -2.0 }`.
    fn count_column_reports_first_negative_entry() {
        // Arrange
        let column = array![1.0, -2.0, -3.0];

        // Act
        let err = validate_count_column(column.view(), "S").unwrap_err();

        // Assert
        assert_eq!(
            err,
            KernelError::NegativeCompartment { particle: 1, column: "S".to_string(), value: -2.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure NaN in a rate parameter is rejected as non-finite.
    //
    // Given
    // -----
    // - Column [0.1, NaN] named "gamma".
    //
    // Expect
    // ------
    // - `NonFiniteParameter` for particle 1.
    fn rate_param_rejects_nan() {
        // Arrange
        let column = array![0.1, f64::NAN];

        // Act
        let err = validate_rate_param(column.view(), "gamma").unwrap_err();

        // Assert
        match err {
            KernelError::NonFiniteParameter { name, particle, .. } => {
                assert_eq!(name, "gamma");
                assert_eq!(particle, 1);
            }
            other => panic!("expected NonFiniteParameter, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the (0, 1] bounds on the Hawkes decay.
    //
    // Given
    // -----
    // - Accepted: [1.0, 0.5]. Rejected: [0.0], [1.2].
    //
    // Expect
    // ------
    // - Accepted column passes, rejected columns yield `InvalidDecay`.
    fn decay_param_bounds_are_half_open() {
        assert!(validate_decay_param(array![1.0, 0.5].view()).is_ok());
        assert!(matches!(
            validate_decay_param(array![0.0].view()),
            Err(KernelError::InvalidDecay { particle: 0, .. })
        ));
        assert!(matches!(
            validate_decay_param(array![1.2].view()),
            Err(KernelError::InvalidDecay { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify the scalar guards.
    //
    // Given
    // -----
    // - dt = 0, population = inf, observation = -1.
    //
    // Expect
    // ------
    // - Each returns its dedicated variant; valid values pass through.
    fn scalar_guards_reject_invalid_values() {
        assert_eq!(validate_time_step(0.5), Ok(0.5));
        assert_eq!(validate_time_step(0.0), Err(KernelError::InvalidTimeStep { dt: 0.0 }));
        assert!(matches!(
            validate_population(f64::INFINITY),
            Err(KernelError::InvalidPopulation { .. })
        ));
        assert_eq!(
            validate_observation(4, -1.0),
            Err(KernelError::InvalidObservation { index: 4, value: -1.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify duplicate-name detection.
    //
    // Given
    // -----
    // - ["gamma", "nu_beta", "gamma"] and ["a", "b"].
    //
    // Expect
    // ------
    // - First list reports "gamma"; second reports nothing.
    fn first_duplicate_finds_repeated_names() {
        assert_eq!(first_duplicate(&["gamma", "nu_beta", "gamma"]), Some("gamma"));
        assert_eq!(first_duplicate(&["a", "b"]), None);
    }
}
