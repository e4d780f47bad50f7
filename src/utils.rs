//! utils — Python-side conversion helpers for the kernel bindings.
//!
//! Purpose
//! -------
//! Convert loosely typed Python inputs (numpy arrays, pandas objects, nested
//! sequences) into the validated Rust types the kernels consume:
//! `Array2<f64>` ensembles, [`ParamTable`]s, and [`ObservedSeries`].
//!
//! Conventions
//! -----------
//! - Everything here is compiled only with the `python-bindings` feature.
//! - Shape errors in the Python objects surface as `TypeError`; domain
//!   errors surface through the `KernelError → PyErr` conversion.

#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::epidemic::core::{ObservedSeries, ParamTable};

/// Borrow or copy a 1-D float64 array from a numpy array, pandas Series, or
/// sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro);
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a 2-D float64 table from a numpy array, pandas DataFrame, or nested
/// sequence of equal-length rows.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray, pandas.DataFrame, or list of rows")
    })?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(PyTypeError::new_err("all rows must have the same length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let n_rows = if n_cols == 0 { 0 } else { flat.len() / n_cols };
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| PyTypeError::new_err(format!("invalid table shape: {e}")))
}

/// Build a [`ParamTable`] from a 1-D shared vector or a 2-D per-particle
/// table plus its parallel name list.
#[cfg(feature = "python-bindings")]
pub fn extract_param_table<'py>(
    py: Python<'py>, theta: &Bound<'py, PyAny>, theta_names: Vec<String>,
) -> PyResult<ParamTable> {
    if let Ok(table) = theta.extract::<PyReadonlyArray2<f64>>() {
        return Ok(ParamTable::new(table.as_array().to_owned(), theta_names)?);
    }
    let shared = extract_f64_array(py, theta)?;
    let values = shared.as_array().to_vec();
    Ok(ParamTable::shared(&values, &theta_names)?)
}

/// Copy an observed infection series into a validated [`ObservedSeries`].
#[cfg(feature = "python-bindings")]
pub fn extract_observed<'py>(
    py: Python<'py>, observed: &Bound<'py, PyAny>,
) -> PyResult<ObservedSeries> {
    let arr = extract_f64_array(py, observed)?;
    Ok(ObservedSeries::new(arr.as_array().to_vec())?)
}
