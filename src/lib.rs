//! rust_epidemics — particle-filter transition kernels with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the SIR, SIRS, and discrete-time Hawkes transition kernels to
//! Python via the `_rust_epidemics` extension module. When the
//! `python-bindings` feature is enabled, this module defines the
//! Python-facing kernel class and the `kernels` submodule used by the
//! `rust_epidemics` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module (`epidemic`) as the public crate surface.
//! - Define a `#[pyclass]` wrapper, [`TransitionKernel`], that owns a
//!   selected kernel plus its random generator, so repeated `advance` calls
//!   from a Python driver loop draw from one reproducible stream.
//! - Create and register the `kernels` submodule under `rust_epidemics` so
//!   that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in [`epidemic`]; this file performs only FFI
//!   glue, input conversion, and error mapping.
//! - A Python `TransitionKernel` is not shared across threads while stepping;
//!   each instance owns its generator.
//!
//! Conventions
//! -----------
//! - Ensembles cross the boundary as 2-D float64 arrays with rows =
//!   particles; column labels default to the model's layout.
//! - Parameters cross as a 1-D shared vector or a 2-D per-particle table,
//!   always with a parallel list of names.
//! - `KernelError`s are raised as `ValueError`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`epidemic`] directly and can ignore
//!   the items guarded by `python-bindings`.
//! - Python code imports `rust_epidemics.kernels.TransitionKernel`.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   the Rust integration tests in `tests/`.

pub mod epidemic;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use rand::{SeedableRng, rngs::StdRng};

#[cfg(feature = "python-bindings")]
use crate::{
    epidemic::{EpidemicKernel, ParticleEnsemble, StepContext},
    utils::{extract_f64_matrix, extract_observed, extract_param_table},
};

/// TransitionKernel — Python-facing wrapper around [`EpidemicKernel`].
///
/// Purpose
/// -------
/// Let a Python particle-filter driver select a model by name and advance
/// numpy ensembles one step at a time.
///
/// Parameters
/// ----------
/// Constructed from Python via `TransitionKernel(model, seed=None)`:
/// - `model`: `str`
///   One of `"sir"`, `"sirs"`, `"hawkes"` (alias `"dthp"`).
/// - `seed`: `Option<u64>`
///   Seed for the owned generator; drawn from OS entropy when `None`.
///
/// Fields
/// ------
/// - `kernel`: [`EpidemicKernel`]
///   Selected model.
/// - `rng`: `StdRng`
///   Generator consumed by every `advance` call.
///
/// Notes
/// -----
/// - Native Rust callers should use [`EpidemicKernel`] with their own RNG.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_epidemics.kernels")]
pub struct TransitionKernel {
    kernel: EpidemicKernel,
    rng: StdRng,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl TransitionKernel {
    #[new]
    #[pyo3(signature = (model, seed = None), text_signature = "(model, /, seed=None)")]
    pub fn new(model: &str, seed: Option<u64>) -> PyResult<Self> {
        let kernel: EpidemicKernel = model.parse()?;
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(TransitionKernel { kernel, rng })
    }

    /// Model label ("SIR", "SIRS", or "Hawkes").
    #[getter]
    pub fn model(&self) -> &'static str {
        self.kernel.kind().label()
    }

    /// Default state column names for the selected model.
    #[getter]
    pub fn state_names(&self) -> Vec<&'static str> {
        self.kernel.kind().state_names().to_vec()
    }

    /// Restart the owned generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Advance an ensemble by one step and return the new table.
    ///
    /// `observed`, `t`, and `population` are required by the Hawkes model
    /// and ignored otherwise; `t` defaults to `len(observed)`.
    #[pyo3(
        signature = (
            state,
            theta,
            theta_names,
            state_names = None,
            observed = None,
            t = None,
            population = None,
            dt = 1.0,
        ),
        text_signature = "(self, state, theta, theta_names, /, state_names=None, observed=None, \
                          t=None, population=None, dt=1.0)"
    )]
    pub fn advance<'py>(
        &mut self, py: Python<'py>, state: &Bound<'py, PyAny>, theta: &Bound<'py, PyAny>,
        theta_names: Vec<String>, state_names: Option<Vec<String>>,
        observed: Option<&Bound<'py, PyAny>>, t: Option<usize>, population: Option<f64>,
        dt: f64,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let kind = self.kernel.kind();
        let names = state_names
            .unwrap_or_else(|| kind.state_names().iter().map(|s| s.to_string()).collect());
        let ensemble = ParticleEnsemble::new(extract_f64_matrix(state)?, names)?;
        let table = extract_param_table(py, theta, theta_names)?;

        let series = observed.map(|raw| extract_observed(py, raw)).transpose()?;
        let ctx = StepContext::new(dt)?;
        let ctx = match &series {
            Some(series) => {
                let population = population.ok_or_else(|| {
                    PyValueError::new_err("population is required with an observed history")
                })?;
                ctx.with_history(series, t.unwrap_or(series.len()), population)?
            }
            None if kind.needs_history() => {
                return Err(PyValueError::new_err(format!(
                    "the {kind} kernel requires observed, t, and population"
                )));
            }
            None => ctx,
        };

        let next = self.kernel.advance(&ensemble, &table, &ctx, &mut self.rng)?;
        Ok(next.into_values().into_pyarray(py))
    }
}

/// _rust_epidemics — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_epidemics` Python module and register the `kernels`
/// submodule used by the public `rust_epidemics` package.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_epidemics<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let kernels_mod = PyModule::new(_py, "kernels")?;
    kernels(_py, m, &kernels_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_epidemics.kernels", kernels_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn kernels<'py>(
    _py: Python, rust_epidemics: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<TransitionKernel>()?;
    rust_epidemics.add_submodule(m)?;
    Ok(())
}
