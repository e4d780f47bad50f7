//! epidemic::errors — error surface for the transition kernels.
//!
//! Purpose
//! -------
//! Provide a single error enum, [`KernelError`], and the result alias
//! [`KernelResult`] shared by ensembles, parameter tables, step contexts, and
//! the SIR / SIRS / Hawkes kernels. Every validation or sampling failure a
//! kernel call can produce is reported through this type.
//!
//! Key behaviors
//! -------------
//! - Attach a human-readable `Display` message to every variant, embedding the
//!   offending value, particle index, or column name.
//! - Group variants into three coarse classes via [`KernelError::kind`]:
//!   missing parameters, domain violations, and shape mismatches. Drivers that
//!   want to drop a single trajectory rather than abort the run can match on
//!   the class instead of individual variants.
//! - Convert `rand_distr` construction errors into
//!   [`KernelError::Distribution`] so sampling code can use `?` directly.
//!
//! Invariants & assumptions
//! ------------------------
//! - Errors are small, cheap to clone, and carry no references into caller
//!   data.
//! - Particle indices are 0-based row indices into the ensemble.
//!
//! Conventions
//! -----------
//! - Column and parameter names are carried as owned `String`s because they
//!   originate from caller-provided name lists.
//! - With the `python-bindings` feature every variant maps to a Python
//!   `ValueError` carrying the `Display` message.
//!
//! Testing notes
//! -------------
//! - Unit tests check payload embedding in `Display` messages and the
//!   variant → [`ErrorKind`] classification.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use rand_distr::{BinomialError, PoissonError};

/// Result alias for every fallible kernel operation.
pub type KernelResult<T> = Result<T, KernelError>;

/// Coarse error classes used by drivers to decide how to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required parameter name was not supplied.
    MissingParameter,
    /// A value lies outside its admissible domain (negative counts or rates,
    /// zero population, out-of-range decay, too-short history, ...).
    Domain,
    /// Lengths or column counts of the supplied tables disagree.
    ShapeMismatch,
}

/// Unified error type for the epidemic transition kernels.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    // ---- Parameters ----
    /// A required parameter is absent from the parameter names.
    MissingParameter { name: &'static str, model: &'static str },

    /// Parameter names and values have different lengths.
    ParamLengthMismatch { names: usize, values: usize },

    /// Parameter table rows are neither 1 nor the number of particles.
    ParamRowMismatch { expected: usize, actual: usize },

    /// The same parameter name appears more than once.
    DuplicateParameter { name: String },

    /// A parameter value is NaN or ±inf.
    NonFiniteParameter { name: String, particle: usize, value: f64 },

    /// A rate (or volatility) parameter is negative.
    NegativeRate { name: String, particle: usize, value: f64 },

    /// Hawkes decay `omega_I` must lie in (0, 1].
    InvalidDecay { particle: usize, value: f64 },

    // ---- Ensemble ----
    /// The ensemble has no particles.
    EmptyEnsemble,

    /// The ensemble does not have the number of columns the model expects.
    StateColumnMismatch { expected: usize, actual: usize },

    /// Column names and column count disagree.
    StateNameMismatch { names: usize, columns: usize },

    /// The same column name appears more than once.
    DuplicateStateName { name: String },

    /// A state entry is NaN or ±inf.
    NonFiniteState { particle: usize, column: String, value: f64 },

    /// A count column holds a negative value.
    NegativeCompartment { particle: usize, column: String, value: f64 },

    /// S + I + R is zero, so the force of infection is undefined.
    ZeroPopulation { particle: usize },

    // ---- Step context ----
    /// Time step must be finite and > 0.
    InvalidTimeStep { dt: f64 },

    /// Population size passed to the Hawkes kernel must be finite and > 0.
    InvalidPopulation { value: f64 },

    /// The Hawkes kernel was called without an observation history.
    MissingHistory,

    /// The observation history holds fewer than `t` entries.
    HistoryTooShort { t: usize, len: usize },

    /// An observation is NaN, ±inf, or negative.
    InvalidObservation { index: usize, value: f64 },

    // ---- Configuration ----
    /// A model name could not be parsed into a model kind.
    UnknownModel { name: String },

    // ---- Sampling ----
    /// A distribution rejected its parameters.
    Distribution { reason: String },
}

impl KernelError {
    /// Classify this error into one of the three recovery classes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KernelError::MissingParameter { .. } => ErrorKind::MissingParameter,
            KernelError::ParamLengthMismatch { .. }
            | KernelError::ParamRowMismatch { .. }
            | KernelError::DuplicateParameter { .. }
            | KernelError::EmptyEnsemble
            | KernelError::StateColumnMismatch { .. }
            | KernelError::StateNameMismatch { .. }
            | KernelError::DuplicateStateName { .. } => ErrorKind::ShapeMismatch,
            KernelError::NonFiniteParameter { .. }
            | KernelError::NegativeRate { .. }
            | KernelError::InvalidDecay { .. }
            | KernelError::NonFiniteState { .. }
            | KernelError::NegativeCompartment { .. }
            | KernelError::ZeroPopulation { .. }
            | KernelError::InvalidTimeStep { .. }
            | KernelError::InvalidPopulation { .. }
            | KernelError::MissingHistory
            | KernelError::HistoryTooShort { .. }
            | KernelError::InvalidObservation { .. }
            | KernelError::UnknownModel { .. }
            | KernelError::Distribution { .. } => ErrorKind::Domain,
        }
    }
}

impl std::error::Error for KernelError {}

impl std::fmt::Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameters ----
            KernelError::MissingParameter { name, model } => {
                write!(f, "Missing required parameter '{name}' for the {model} kernel.")
            }
            KernelError::ParamLengthMismatch { names, values } => {
                write!(f, "Parameter names ({names}) and values ({values}) must have equal length.")
            }
            KernelError::ParamRowMismatch { expected, actual } => {
                write!(
                    f,
                    "Parameter table must have 1 row or one row per particle: expected {expected}, got {actual}"
                )
            }
            KernelError::DuplicateParameter { name } => {
                write!(f, "Parameter '{name}' is listed more than once.")
            }
            KernelError::NonFiniteParameter { name, particle, value } => {
                write!(f, "Parameter '{name}' for particle {particle} must be finite; got {value}")
            }
            KernelError::NegativeRate { name, particle, value } => {
                write!(f, "Rate '{name}' for particle {particle} must be >= 0; got {value}")
            }
            KernelError::InvalidDecay { particle, value } => {
                write!(f, "omega_I for particle {particle} must satisfy 0 < omega_I <= 1; got {value}")
            }
            // ---- Ensemble ----
            KernelError::EmptyEnsemble => write!(f, "Particle ensemble has no rows."),
            KernelError::StateColumnMismatch { expected, actual } => {
                write!(f, "Ensemble column mismatch: expected {expected}, got {actual}")
            }
            KernelError::StateNameMismatch { names, columns } => {
                write!(f, "State names ({names}) must match the number of columns ({columns}).")
            }
            KernelError::DuplicateStateName { name } => {
                write!(f, "State column '{name}' is listed more than once.")
            }
            KernelError::NonFiniteState { particle, column, value } => {
                write!(f, "State '{column}' for particle {particle} is non-finite: {value}")
            }
            KernelError::NegativeCompartment { particle, column, value } => {
                write!(f, "Compartment '{column}' for particle {particle} is negative: {value}")
            }
            KernelError::ZeroPopulation { particle } => {
                write!(f, "Particle {particle} has zero population (S + I + R = 0).")
            }
            // ---- Step context ----
            KernelError::InvalidTimeStep { dt } => {
                write!(f, "Time step must be finite and > 0; got {dt}")
            }
            KernelError::InvalidPopulation { value } => {
                write!(f, "Population size must be finite and > 0; got {value}")
            }
            KernelError::MissingHistory => {
                write!(f, "The Hawkes kernel requires an observation history.")
            }
            KernelError::HistoryTooShort { t, len } => {
                write!(f, "Step index t ({t}) exceeds the observation history length ({len}).")
            }
            KernelError::InvalidObservation { index, value } => {
                write!(f, "Observation at index {index} must be finite and >= 0; got {value}")
            }
            // ---- Configuration ----
            KernelError::UnknownModel { name } => {
                write!(f, "Unknown model '{name}' (expected 'sir', 'sirs', or 'hawkes').")
            }
            // ---- Sampling ----
            KernelError::Distribution { reason } => {
                write!(f, "Distribution rejected its parameters: {reason}")
            }
        }
    }
}

impl From<BinomialError> for KernelError {
    fn from(err: BinomialError) -> KernelError {
        KernelError::Distribution { reason: format!("binomial: {err}") }
    }
}

impl From<PoissonError> for KernelError {
    fn from(err: PoissonError) -> KernelError {
        KernelError::Distribution { reason: format!("poisson: {err}") }
    }
}

/// Convert a [`KernelError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<KernelError> for PyErr {
    fn from(err: KernelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Payload embedding in `Display` messages for representative variants.
    // - The variant → `ErrorKind` classification used by drivers.
    //
    // They intentionally DO NOT cover:
    // - The `From<KernelError> for PyErr` conversion, which needs the Python
    //   C API and belongs in Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `MissingParameter` names both the parameter and the model.
    //
    // Given
    // -----
    // - `MissingParameter { name: "gamma", model: "SIR" }`.
    //
    // Expect
    // ------
    // - The message contains "gamma" and "SIR".
    fn missing_parameter_display_names_parameter_and_model() {
        // Arrange
        let err = KernelError::MissingParameter { name: "gamma", model: "SIR" };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("gamma"), "message should name the parameter.\nGot: {msg}");
        assert!(msg.contains("SIR"), "message should name the model.\nGot: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `NegativeCompartment` embeds the particle, column and value.
    //
    // Given
    // -----
    // - Particle 7, column "I", value -3.5.
    //
    // Expect
    // ------
    // - The message contains "7", "I" and "-3.5".
    fn negative_compartment_display_embeds_payload() {
        // Arrange
        let err =
            KernelError::NegativeCompartment { particle: 7, column: "I".to_string(), value: -3.5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('7'));
        assert!(msg.contains("'I'"));
        assert!(msg.contains("-3.5"));
    }

    #[test]
    // Purpose
    // -------
    // Check the three-way classification of errors.
    //
    // Given
    // -----
    // - One representative variant per class.
    //
    // Expect
    // ------
    // - MissingParameter → `ErrorKind::MissingParameter`,
    //   ZeroPopulation → `ErrorKind::Domain`,
    //   ParamLengthMismatch → `ErrorKind::ShapeMismatch`.
    fn kind_classifies_representative_variants() {
        // Arrange
        let missing = KernelError::MissingParameter { name: "omega_I", model: "Hawkes" };
        let domain = KernelError::ZeroPopulation { particle: 0 };
        let shape = KernelError::ParamLengthMismatch { names: 2, values: 3 };

        // Act / Assert
        assert_eq!(missing.kind(), ErrorKind::MissingParameter);
        assert_eq!(domain.kind(), ErrorKind::Domain);
        assert_eq!(shape.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a `rand_distr` binomial error converts into `Distribution`.
    //
    // Given
    // -----
    // - `rand_distr::Binomial::new(10, 1.5)`, which rejects p > 1.
    //
    // Expect
    // ------
    // - Converting the error yields `KernelError::Distribution` whose reason
    //   mentions "binomial".
    fn binomial_error_converts_into_distribution_variant() {
        // Arrange
        let raw = rand_distr::Binomial::new(10, 1.5).unwrap_err();

        // Act
        let err: KernelError = raw.into();

        // Assert
        match err {
            KernelError::Distribution { reason } => assert!(reason.contains("binomial")),
            other => panic!("expected Distribution, got {other:?}"),
        }
    }
}
