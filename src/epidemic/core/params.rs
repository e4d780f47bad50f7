//! Parameter tables and typed per-model parameter sets.
//!
//! Purpose
//! -------
//! Turn the driver-facing "values + parallel name list" parameter vectors into
//! validated, typed structure-of-arrays parameter sets, one per model:
//! [`SirParams`], [`SirsParams`], and [`HawkesParams`].
//!
//! Key behaviors
//! -------------
//! - [`ParamTable`] stores a `(rows, n_params)` table with unique column
//!   names. A single row is shared by every particle; otherwise there must be
//!   exactly one row per particle.
//! - Each typed set picks only the names it needs from a table, fails fast on
//!   missing required names, and fills optional names with a documented
//!   default. Unrelated names are ignored, so one table can carry parameters
//!   for several models.
//! - Typed sets can also be built directly from per-particle arrays
//!   (`new`) or from scalars broadcast to all particles (`broadcast`).
//!
//! Invariants & assumptions
//! ------------------------
//! - After construction every column has the same length (the particle
//!   count) and holds finite values.
//! - Rates (`gamma`, `alpha`) and volatilities (`nu_beta`) are ≥ 0.
//! - Hawkes decay `omega_I` lies in (0, 1].
//!
//! Defaults
//! --------
//! | model  | required            | optional (default)            |
//! |--------|---------------------|-------------------------------|
//! | SIR    | `gamma`             | `nu_beta` (0.1)               |
//! | SIRS   | `gamma`, `nu_beta`  | `alpha` (0.0)                 |
//! | Hawkes | `omega_I`           | `nu_beta` (0.1)               |
use crate::epidemic::{
    core::validation::{first_duplicate, validate_decay_param, validate_rate_param},
    errors::{KernelError, KernelResult},
};
use ndarray::{Array1, Array2, ArrayView1};

/// Recovery rate (I → R), per unit time.
pub const GAMMA: &str = "gamma";
/// Volatility of the transmission-rate / Rt random walk.
pub const NU_BETA: &str = "nu_beta";
/// Rate of immunity loss (R → S), per unit time.
pub const ALPHA: &str = "alpha";
/// Decay rate of the Hawkes memory kernel.
pub const OMEGA_I: &str = "omega_I";

/// Default `nu_beta` for the SIR and Hawkes kernels.
pub const DEFAULT_NU_BETA: f64 = 0.1;
/// Default `alpha` for the SIRS kernel (no waning immunity).
pub const DEFAULT_ALPHA: f64 = 0.0;

const SIR_LABEL: &str = "SIR";
const SIRS_LABEL: &str = "SIRS";
const HAWKES_LABEL: &str = "Hawkes";

/// `ParamTable` — name-keyed parameter values, shared or per particle.
///
/// Fields
/// ------
/// - `values`: `Array2<f64>` of shape `(rows, names.len())`; `rows` is 1 for
///   a shared parameter vector or the particle count for heterogeneous ones.
/// - `names`: unique parameter names, one per column.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamTable {
    values: Array2<f64>,
    names: Vec<String>,
}

impl ParamTable {
    /// Build a table from a `(rows, n_params)` array and matching names.
    ///
    /// # Errors
    /// - [`KernelError::ParamLengthMismatch`] if `names.len()` differs from the
    ///   column count.
    /// - [`KernelError::ParamRowMismatch`] if the table has no rows.
    /// - [`KernelError::DuplicateParameter`] if a name repeats.
    pub fn new<S: Into<String>>(values: Array2<f64>, names: Vec<S>) -> KernelResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != values.ncols() {
            return Err(KernelError::ParamLengthMismatch {
                names: names.len(),
                values: values.ncols(),
            });
        }
        if values.nrows() == 0 {
            return Err(KernelError::ParamRowMismatch { expected: 1, actual: 0 });
        }
        if let Some(name) = first_duplicate(&names) {
            return Err(KernelError::DuplicateParameter { name: name.to_string() });
        }
        Ok(ParamTable { values, names })
    }

    /// Build a single shared row from a value slice and a parallel name list.
    ///
    /// # Errors
    /// Same as [`ParamTable::new`].
    pub fn shared<S: AsRef<str>>(values: &[f64], names: &[S]) -> KernelResult<Self> {
        if values.len() != names.len() {
            return Err(KernelError::ParamLengthMismatch {
                names: names.len(),
                values: values.len(),
            });
        }
        let row = Array2::from_shape_vec((1, values.len()), values.to_vec()).map_err(|_| {
            KernelError::ParamLengthMismatch { names: names.len(), values: values.len() }
        })?;
        ParamTable::new(row, names.iter().map(|n| n.as_ref().to_string()).collect())
    }

    /// Build a single shared row from `(name, value)` pairs.
    pub fn from_pairs(pairs: &[(&str, f64)]) -> KernelResult<Self> {
        let values: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
        let names: Vec<&str> = pairs.iter().map(|(n, _)| *n).collect();
        ParamTable::shared(&values, &names)
    }

    /// Number of rows (1 when shared).
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Parameter names, in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Borrow the raw column for `name`, if present.
    pub fn get(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.names.iter().position(|n| n == name).map(|j| self.values.column(j))
    }

    /// Column for `name` expanded to `n_particles` entries, if present.
    ///
    /// # Errors
    /// - [`KernelError::ParamRowMismatch`] if the table has neither 1 nor
    ///   `n_particles` rows.
    pub fn column_for(&self, name: &str, n_particles: usize) -> KernelResult<Option<Array1<f64>>> {
        let Some(column) = self.get(name) else {
            return Ok(None);
        };
        match column.len() {
            1 => Ok(Some(Array1::from_elem(n_particles, column[0]))),
            len if len == n_particles => Ok(Some(column.to_owned())),
            len => Err(KernelError::ParamRowMismatch { expected: n_particles, actual: len }),
        }
    }

    fn required(
        &self, name: &'static str, model: &'static str, n_particles: usize,
    ) -> KernelResult<Array1<f64>> {
        self.column_for(name, n_particles)?
            .ok_or(KernelError::MissingParameter { name, model })
    }

    fn optional(&self, name: &str, default: f64, n_particles: usize) -> KernelResult<Array1<f64>> {
        Ok(self
            .column_for(name, n_particles)?
            .unwrap_or_else(|| Array1::from_elem(n_particles, default)))
    }
}

/// Validated SIR parameters, one entry per particle.
#[derive(Debug, Clone, PartialEq)]
pub struct SirParams {
    /// Recovery rate γ ≥ 0.
    pub gamma: Array1<f64>,
    /// Transmission-rate volatility ν ≥ 0.
    pub nu_beta: Array1<f64>,
}

impl SirParams {
    /// Build from per-particle arrays.
    ///
    /// # Errors
    /// - [`KernelError::ParamRowMismatch`] if the arrays differ in length.
    /// - Rate validation errors for negative or non-finite entries.
    pub fn new(gamma: Array1<f64>, nu_beta: Array1<f64>) -> KernelResult<Self> {
        ensure_same_len(gamma.len(), &[nu_beta.len()])?;
        validate_rate_param(gamma.view(), GAMMA)?;
        validate_rate_param(nu_beta.view(), NU_BETA)?;
        Ok(SirParams { gamma, nu_beta })
    }

    /// Broadcast scalar parameters to `n_particles` particles.
    pub fn broadcast(gamma: f64, nu_beta: f64, n_particles: usize) -> KernelResult<Self> {
        SirParams::new(
            Array1::from_elem(n_particles, gamma),
            Array1::from_elem(n_particles, nu_beta),
        )
    }

    /// Pick `gamma` (required) and `nu_beta` (default 0.1) from a table.
    pub fn from_table(table: &ParamTable, n_particles: usize) -> KernelResult<Self> {
        let gamma = table.required(GAMMA, SIR_LABEL, n_particles)?;
        let nu_beta = table.optional(NU_BETA, DEFAULT_NU_BETA, n_particles)?;
        SirParams::new(gamma, nu_beta)
    }

    /// Number of particles covered.
    pub fn len(&self) -> usize {
        self.gamma.len()
    }

    /// Whether the set covers no particles.
    pub fn is_empty(&self) -> bool {
        self.gamma.is_empty()
    }
}

/// Validated SIRS parameters, one entry per particle.
#[derive(Debug, Clone, PartialEq)]
pub struct SirsParams {
    /// Recovery rate γ ≥ 0.
    pub gamma: Array1<f64>,
    /// Transmission-rate volatility ν ≥ 0.
    pub nu_beta: Array1<f64>,
    /// Immunity-loss rate α ≥ 0.
    pub alpha: Array1<f64>,
}

impl SirsParams {
    /// Build from per-particle arrays.
    ///
    /// # Errors
    /// - [`KernelError::ParamRowMismatch`] if the arrays differ in length.
    /// - Rate validation errors for negative or non-finite entries.
    pub fn new(gamma: Array1<f64>, nu_beta: Array1<f64>, alpha: Array1<f64>) -> KernelResult<Self> {
        ensure_same_len(gamma.len(), &[nu_beta.len(), alpha.len()])?;
        validate_rate_param(gamma.view(), GAMMA)?;
        validate_rate_param(nu_beta.view(), NU_BETA)?;
        validate_rate_param(alpha.view(), ALPHA)?;
        Ok(SirsParams { gamma, nu_beta, alpha })
    }

    /// Broadcast scalar parameters to `n_particles` particles.
    pub fn broadcast(gamma: f64, nu_beta: f64, alpha: f64, n_particles: usize) -> KernelResult<Self> {
        SirsParams::new(
            Array1::from_elem(n_particles, gamma),
            Array1::from_elem(n_particles, nu_beta),
            Array1::from_elem(n_particles, alpha),
        )
    }

    /// Pick `gamma` and `nu_beta` (both required) and `alpha` (default 0)
    /// from a table.
    pub fn from_table(table: &ParamTable, n_particles: usize) -> KernelResult<Self> {
        let gamma = table.required(GAMMA, SIRS_LABEL, n_particles)?;
        let nu_beta = table.required(NU_BETA, SIRS_LABEL, n_particles)?;
        let alpha = table.optional(ALPHA, DEFAULT_ALPHA, n_particles)?;
        SirsParams::new(gamma, nu_beta, alpha)
    }

    /// Number of particles covered.
    pub fn len(&self) -> usize {
        self.gamma.len()
    }

    /// Whether the set covers no particles.
    pub fn is_empty(&self) -> bool {
        self.gamma.is_empty()
    }
}

/// Validated Hawkes parameters, one entry per particle.
#[derive(Debug, Clone, PartialEq)]
pub struct HawkesParams {
    /// Memory-kernel decay, 0 < ω ≤ 1.
    pub omega_i: Array1<f64>,
    /// Rt volatility ν ≥ 0.
    pub nu_beta: Array1<f64>,
}

impl HawkesParams {
    /// Build from per-particle arrays.
    ///
    /// # Errors
    /// - [`KernelError::ParamRowMismatch`] if the arrays differ in length.
    /// - [`KernelError::InvalidDecay`] for `omega_I` outside (0, 1].
    /// - Rate validation errors for `nu_beta`.
    pub fn new(omega_i: Array1<f64>, nu_beta: Array1<f64>) -> KernelResult<Self> {
        ensure_same_len(omega_i.len(), &[nu_beta.len()])?;
        validate_decay_param(omega_i.view())?;
        validate_rate_param(nu_beta.view(), NU_BETA)?;
        Ok(HawkesParams { omega_i, nu_beta })
    }

    /// Broadcast scalar parameters to `n_particles` particles.
    pub fn broadcast(omega_i: f64, nu_beta: f64, n_particles: usize) -> KernelResult<Self> {
        HawkesParams::new(
            Array1::from_elem(n_particles, omega_i),
            Array1::from_elem(n_particles, nu_beta),
        )
    }

    /// Pick `omega_I` (required) and `nu_beta` (default 0.1) from a table.
    pub fn from_table(table: &ParamTable, n_particles: usize) -> KernelResult<Self> {
        let omega_i = table.required(OMEGA_I, HAWKES_LABEL, n_particles)?;
        let nu_beta = table.optional(NU_BETA, DEFAULT_NU_BETA, n_particles)?;
        HawkesParams::new(omega_i, nu_beta)
    }

    /// Number of particles covered.
    pub fn len(&self) -> usize {
        self.omega_i.len()
    }

    /// Whether the set covers no particles.
    pub fn is_empty(&self) -> bool {
        self.omega_i.is_empty()
    }
}

/// Check that a typed parameter set covers exactly `n_particles` particles.
///
/// # Errors
/// - [`KernelError::ParamRowMismatch`] otherwise.
pub fn ensure_covers(params_len: usize, n_particles: usize) -> KernelResult<()> {
    if params_len != n_particles {
        return Err(KernelError::ParamRowMismatch { expected: n_particles, actual: params_len });
    }
    Ok(())
}

fn ensure_same_len(expected: usize, others: &[usize]) -> KernelResult<()> {
    match others.iter().find(|&&len| len != expected) {
        Some(&actual) => Err(KernelError::ParamRowMismatch { expected, actual }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `ParamTable` construction checks and shared-row broadcasting.
    // - Required / optional name handling and defaults for each model.
    // - Validation of typed parameter sets.
    //
    // They intentionally DO NOT cover:
    // - How kernels consume the typed sets (see the model modules).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a shared row is broadcast and the SIR default applies.
    //
    // Given
    // -----
    // - Names ["gamma"], values [0.2], three particles.
    //
    // Expect
    // ------
    // - gamma = [0.2; 3], nu_beta = [0.1; 3].
    fn sir_params_from_shared_table_apply_default_volatility() {
        // Arrange
        let table = ParamTable::shared(&[0.2], &["gamma"]).expect("valid table");

        // Act
        let params = SirParams::from_table(&table, 3).expect("gamma present");

        // Assert
        assert_eq!(params.gamma, array![0.2, 0.2, 0.2]);
        assert_eq!(params.nu_beta, Array1::from_elem(3, DEFAULT_NU_BETA));
    }

    #[test]
    // Purpose
    // -------
    // Ensure each model fails fast on its own required names.
    //
    // Given
    // -----
    // - A table holding only `gamma`.
    //
    // Expect
    // ------
    // - SIRS reports missing `nu_beta`; Hawkes reports missing `omega_I`.
    fn missing_required_names_fail_fast() {
        // Arrange
        let table = ParamTable::from_pairs(&[("gamma", 0.1)]).unwrap();

        // Act
        let sirs = SirsParams::from_table(&table, 2).unwrap_err();
        let hawkes = HawkesParams::from_table(&table, 2).unwrap_err();

        // Assert
        assert_eq!(sirs, KernelError::MissingParameter { name: NU_BETA, model: "SIRS" });
        assert_eq!(hawkes, KernelError::MissingParameter { name: OMEGA_I, model: "Hawkes" });
    }

    #[test]
    // Purpose
    // -------
    // Verify per-particle tables and row-count checks.
    //
    // Given
    // -----
    // - A 2-row table with gamma and nu_beta.
    //
    // Expect
    // ------
    // - Accepted for 2 particles with values taken row-wise.
    // - Rejected for 3 particles with `ParamRowMismatch`.
    fn per_particle_table_must_match_particle_count() {
        // Arrange
        let table =
            ParamTable::new(array![[0.1, 0.0], [0.2, 0.3]], vec!["gamma", "nu_beta"]).unwrap();

        // Act
        let ok = SirParams::from_table(&table, 2).expect("two rows, two particles");
        let err = SirParams::from_table(&table, 3).unwrap_err();

        // Assert
        assert_eq!(ok.gamma, array![0.1, 0.2]);
        assert_eq!(ok.nu_beta, array![0.0, 0.3]);
        assert_eq!(err, KernelError::ParamRowMismatch { expected: 3, actual: 2 });
    }

    #[test]
    // Purpose
    // -------
    // Ensure shape errors in the raw table are reported.
    //
    // Given
    // -----
    // - Two values but one name; duplicated names.
    //
    // Expect
    // ------
    // - `ParamLengthMismatch` and `DuplicateParameter`.
    fn table_shape_errors_are_reported() {
        assert_eq!(
            ParamTable::shared(&[0.1, 0.2], &["gamma"]).unwrap_err(),
            KernelError::ParamLengthMismatch { names: 1, values: 2 }
        );
        assert_eq!(
            ParamTable::shared(&[0.1, 0.2], &["gamma", "gamma"]).unwrap_err(),
            KernelError::DuplicateParameter { name: "gamma".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify domain checks on typed sets.
    //
    // Given
    // -----
    // - Negative gamma for SIR; omega_I = 0 for Hawkes.
    //
    // Expect
    // ------
    // - `NegativeRate` and `InvalidDecay`.
    fn typed_sets_validate_domains() {
        assert!(matches!(
            SirParams::broadcast(-0.1, 0.1, 2),
            Err(KernelError::NegativeRate { .. })
        ));
        assert!(matches!(
            HawkesParams::broadcast(0.0, 0.1, 2),
            Err(KernelError::InvalidDecay { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check that SIRS `alpha` defaults to zero and unrelated names are ignored.
    //
    // Given
    // -----
    // - Table with gamma, nu_beta and an unrelated "rho".
    //
    // Expect
    // ------
    // - alpha = [0, 0].
    fn sirs_alpha_defaults_to_zero() {
        // Arrange
        let table =
            ParamTable::from_pairs(&[("gamma", 0.1), ("nu_beta", 0.05), ("rho", 9.0)]).unwrap();

        // Act
        let params = SirsParams::from_table(&table, 2).unwrap();

        // Assert
        assert_eq!(params.alpha, array![0.0, 0.0]);
        assert!(table.contains("rho"));
    }
}
