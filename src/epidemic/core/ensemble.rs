//! Particle ensembles — labeled per-particle state tables.
//!
//! Purpose
//! -------
//! Represent the state of every particle as a rectangular table with named
//! columns: rows are particles, columns are compartments (SIR/SIRS) or Hawkes
//! state variables. All kernels consume and produce this type, so drivers can
//! hold any model's state behind one container.
//!
//! Key behaviors
//! -------------
//! - [`ParticleEnsemble`] couples an `Array2<f64>` with its column names and
//!   rejects empty tables, name/column count mismatches, and duplicate names.
//! - [`ParticleEnsemble::compartments`] and [`ParticleEnsemble::hawkes_state`]
//!   decompose the table positionally into typed column views after checking
//!   the column count and the domain of each column.
//! - [`population`] returns `N = S + I + R` per particle.
//!
//! Invariants & assumptions
//! ------------------------
//! - Compartmental layout is positional: `S, I, R, NI, B`.
//! - Hawkes layout is positional: `lambda_I, C_I, Rt`.
//! - Column names are labels only; callers may rename columns (e.g. to match
//!   a data frame) without affecting the kernels.
//! - Count columns are finite and ≥ 0; rate columns (`B`, `Rt`) are finite
//!   and ≥ 0. Both are checked before every step.
//! - A rate started positive stays positive under the geometric walk. A rate
//!   of exactly 0 is accepted as well: it is absorbing (the walk keeps it at
//!   0) and switches transmission off for that particle, which lets callers
//!   pin individual particles to no-infection scenarios.
//!
//! Conventions
//! -----------
//! - Kernels never mutate their input ensemble; each call allocates a fresh
//!   table carrying the same column names.
use crate::epidemic::{
    core::validation::{first_duplicate, validate_count_column, validate_state_rate_column},
    errors::{KernelError, KernelResult},
};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Default column names for SIR/SIRS ensembles.
pub const COMPARTMENT_NAMES: [&str; 5] = ["S", "I", "R", "NI", "B"];

/// Default column names for Hawkes ensembles.
pub const HAWKES_NAMES: [&str; 3] = ["lambda_I", "C_I", "Rt"];

/// Positional column indices for compartmental ensembles.
pub(crate) mod compartment {
    pub const S: usize = 0;
    pub const I: usize = 1;
    pub const R: usize = 2;
    pub const NI: usize = 3;
    pub const B: usize = 4;
    pub const WIDTH: usize = 5;
}

/// Positional column indices for Hawkes ensembles.
pub(crate) mod hawkes {
    pub const LAMBDA: usize = 0;
    pub const CUMULATIVE: usize = 1;
    pub const RT: usize = 2;
    pub const WIDTH: usize = 3;
}

/// `ParticleEnsemble` — per-particle state with named columns.
///
/// Fields
/// ------
/// - `values`: `Array2<f64>` of shape `(n_particles, n_columns)`.
/// - `names`: one label per column.
///
/// Invariants
/// ----------
/// - `values.nrows() > 0`.
/// - `names.len() == values.ncols()` and names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEnsemble {
    values: Array2<f64>,
    names: Vec<String>,
}

impl ParticleEnsemble {
    /// Build an ensemble from values and column names.
    ///
    /// # Errors
    /// - [`KernelError::EmptyEnsemble`] if `values` has no rows.
    /// - [`KernelError::StateNameMismatch`] if `names.len() != values.ncols()`.
    /// - [`KernelError::DuplicateStateName`] if a name repeats.
    pub fn new<S: Into<String>>(values: Array2<f64>, names: Vec<S>) -> KernelResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if values.nrows() == 0 {
            return Err(KernelError::EmptyEnsemble);
        }
        if names.len() != values.ncols() {
            return Err(KernelError::StateNameMismatch {
                names: names.len(),
                columns: values.ncols(),
            });
        }
        if let Some(name) = first_duplicate(&names) {
            return Err(KernelError::DuplicateStateName { name: name.to_string() });
        }
        Ok(ParticleEnsemble { values, names })
    }

    /// Build a SIR/SIRS ensemble with the default `S, I, R, NI, B` labels.
    ///
    /// # Errors
    /// - [`KernelError::StateColumnMismatch`] if `values` does not have 5
    ///   columns, plus the errors of [`ParticleEnsemble::new`].
    pub fn compartmental(values: Array2<f64>) -> KernelResult<Self> {
        if values.ncols() != compartment::WIDTH {
            return Err(KernelError::StateColumnMismatch {
                expected: compartment::WIDTH,
                actual: values.ncols(),
            });
        }
        ParticleEnsemble::new(values, COMPARTMENT_NAMES.to_vec())
    }

    /// Build a Hawkes ensemble with the default `lambda_I, C_I, Rt` labels.
    ///
    /// # Errors
    /// - [`KernelError::StateColumnMismatch`] if `values` does not have 3
    ///   columns, plus the errors of [`ParticleEnsemble::new`].
    pub fn hawkes(values: Array2<f64>) -> KernelResult<Self> {
        if values.ncols() != hawkes::WIDTH {
            return Err(KernelError::StateColumnMismatch {
                expected: hawkes::WIDTH,
                actual: values.ncols(),
            });
        }
        ParticleEnsemble::new(values, HAWKES_NAMES.to_vec())
    }

    /// Number of particles (rows).
    pub fn n_particles(&self) -> usize {
        self.values.nrows()
    }

    /// Number of state columns.
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    /// Column labels, in positional order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Borrow the underlying table.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Consume the ensemble and return the underlying table.
    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Borrow a column by label.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.names.iter().position(|n| n == name).map(|j| self.values.column(j))
    }

    /// Replace the values while keeping the labels of `self`.
    ///
    /// Used by kernels to return a table keyed like their input.
    pub(crate) fn with_values(&self, values: Array2<f64>) -> ParticleEnsemble {
        debug_assert_eq!(values.ncols(), self.names.len());
        ParticleEnsemble { values, names: self.names.clone() }
    }

    /// Decompose a SIR/SIRS ensemble into validated column views.
    ///
    /// # Errors
    /// - [`KernelError::StateColumnMismatch`] unless there are exactly 5
    ///   columns.
    /// - [`KernelError::NonFiniteState`] / [`KernelError::NegativeCompartment`]
    ///   for invalid `S, I, R, NI` entries.
    /// - [`KernelError::NonFiniteState`] / [`KernelError::NegativeRate`] for
    ///   invalid `B` entries.
    pub fn compartments(&self) -> KernelResult<CompartmentColumns<'_>> {
        self.expect_width(compartment::WIDTH)?;
        let columns = CompartmentColumns {
            s: self.values.column(compartment::S),
            i: self.values.column(compartment::I),
            r: self.values.column(compartment::R),
            ni: self.values.column(compartment::NI),
            b: self.values.column(compartment::B),
        };
        validate_count_column(columns.s, &self.names[compartment::S])?;
        validate_count_column(columns.i, &self.names[compartment::I])?;
        validate_count_column(columns.r, &self.names[compartment::R])?;
        validate_count_column(columns.ni, &self.names[compartment::NI])?;
        validate_state_rate_column(columns.b, &self.names[compartment::B])?;
        Ok(columns)
    }

    /// Decompose a Hawkes ensemble into validated column views.
    ///
    /// # Errors
    /// - [`KernelError::StateColumnMismatch`] unless there are exactly 3
    ///   columns.
    /// - [`KernelError::NonFiniteState`] / [`KernelError::NegativeCompartment`]
    ///   for invalid `lambda_I` or `C_I` entries.
    /// - [`KernelError::NonFiniteState`] / [`KernelError::NegativeRate`] for
    ///   invalid `Rt` entries.
    pub fn hawkes_state(&self) -> KernelResult<HawkesColumns<'_>> {
        self.expect_width(hawkes::WIDTH)?;
        let columns = HawkesColumns {
            lambda: self.values.column(hawkes::LAMBDA),
            cumulative: self.values.column(hawkes::CUMULATIVE),
            rt: self.values.column(hawkes::RT),
        };
        validate_count_column(columns.lambda, &self.names[hawkes::LAMBDA])?;
        validate_count_column(columns.cumulative, &self.names[hawkes::CUMULATIVE])?;
        validate_state_rate_column(columns.rt, &self.names[hawkes::RT])?;
        Ok(columns)
    }

    fn expect_width(&self, expected: usize) -> KernelResult<()> {
        if self.values.ncols() != expected {
            return Err(KernelError::StateColumnMismatch {
                expected,
                actual: self.values.ncols(),
            });
        }
        Ok(())
    }
}

/// Borrowed column views of a compartmental ensemble.
#[derive(Debug, Clone, Copy)]
pub struct CompartmentColumns<'a> {
    /// Susceptible counts.
    pub s: ArrayView1<'a, f64>,
    /// Infected counts.
    pub i: ArrayView1<'a, f64>,
    /// Removed / recovered counts.
    pub r: ArrayView1<'a, f64>,
    /// New infections recorded in the previous step.
    pub ni: ArrayView1<'a, f64>,
    /// Transmission rate.
    pub b: ArrayView1<'a, f64>,
}

/// Borrowed column views of a Hawkes ensemble.
#[derive(Debug, Clone, Copy)]
pub struct HawkesColumns<'a> {
    /// Intensity accumulator / infections drawn in the previous step.
    pub lambda: ArrayView1<'a, f64>,
    /// Cumulative infections.
    pub cumulative: ArrayView1<'a, f64>,
    /// Time-varying reproduction number.
    pub rt: ArrayView1<'a, f64>,
}

/// Per-particle population `N = S + I + R`.
///
/// The `NI` and `B` columns are not part of the population.
pub fn population(columns: &CompartmentColumns<'_>) -> Array1<f64> {
    &columns.s + &columns.i + &columns.r
}

/// Check that every particle has a strictly positive population.
///
/// # Errors
/// - [`KernelError::ZeroPopulation`] for the first particle with `N == 0`.
pub fn ensure_positive_population(n: &Array1<f64>) -> KernelResult<()> {
    match n.iter().position(|&value| value <= 0.0) {
        Some(particle) => Err(KernelError::ZeroPopulation { particle }),
        None => Ok(()),
    }
}

/// Stack equally long columns into an `(n_particles, columns.len())` table.
pub(crate) fn stack_columns(columns: &[Array1<f64>]) -> Array2<f64> {
    let n = columns.first().map_or(0, |c| c.len());
    let mut out = Array2::zeros((n, columns.len()));
    for (j, column) in columns.iter().enumerate() {
        out.index_axis_mut(Axis(1), j).assign(column);
    }
    out
}
