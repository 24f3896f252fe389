//! utils — conversion helpers for the PyO3 boundary.
//!
//! Everything here is compiled only with the `python-bindings` feature. The
//! extractors accept numpy arrays first (zero-copy when contiguous) and fall
//! back to nested Python sequences, so lists and pandas objects work too.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2, Array3};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2, PyReadonlyArray3,
};

#[cfg(feature = "python-bindings")]
use crate::correlation::{CorrelationOptions, LegendreOrder};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned 1-D copy of `raw_data`.
#[cfg(feature = "python-bindings")]
pub fn extract_array1<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array1<f64>> {
    Ok(extract_f64_array(py, raw_data)?.as_array().to_owned())
}

/// Owned `[rows, cols]` copy of a 2-D array or a list of equally long rows.
#[cfg(feature = "python-bindings")]
pub fn extract_array2(raw_data: &Bound<'_, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }
    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray or nested sequence of float64")
    })?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err("all rows must have the same length"));
    }
    let n_rows = rows.len();
    Array2::from_shape_vec((n_rows, n_cols), rows.into_iter().flatten().collect())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Owned `[frames, entities, 3]`-style copy of a 3-D array or nested lists.
#[cfg(feature = "python-bindings")]
pub fn extract_array3(raw_data: &Bound<'_, PyAny>) -> PyResult<Array3<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray3<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }
    let frames: Vec<Vec<Vec<f64>>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 3-D numpy.ndarray or nested sequence of float64")
    })?;
    let n_rows = frames.first().map_or(0, Vec::len);
    let n_cols = frames.first().and_then(|f| f.first()).map_or(0, Vec::len);
    let ragged = frames.iter().any(|f| f.len() != n_rows || f.iter().any(|r| r.len() != n_cols));
    if ragged {
        return Err(PyValueError::new_err("nested sequences must be rectangular"));
    }
    let shape = (frames.len(), n_rows, n_cols);
    Array3::from_shape_vec(shape, frames.into_iter().flatten().flatten().collect())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Validated [`CorrelationOptions`] from keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn extract_correlation_options(
    n_origins: Option<usize>, spacing: Option<usize>, upper: Option<f64>, average: Option<bool>,
    verbose: Option<bool>,
) -> PyResult<CorrelationOptions> {
    let opts = CorrelationOptions::new(
        n_origins.unwrap_or(50),
        spacing,
        upper,
        average.unwrap_or(true),
    )?;
    Ok(opts.with_verbose(verbose.unwrap_or(false)))
}

#[cfg(feature = "python-bindings")]
pub fn extract_legendre_order(order: Option<usize>) -> PyResult<LegendreOrder> {
    Ok(LegendreOrder::try_from(order.unwrap_or(2))?)
}
