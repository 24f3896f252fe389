//! rust_mdtools — molecular-dynamics analysis helpers with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the analysis routines to Python via the `_rust_mdtools`
//! extension module. The crate turns trajectories, stress tensors and thermo
//! output into lag-time correlation functions, density histograms and
//! styled figures, and caches results on disk between sessions.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules:
//!   - [`correlation`]: multi-origin correlation kernel and named
//!     correlation-function containers.
//!   - [`trajectory`]: in-memory trajectories, topologies, atom selections
//!     and the loader seam for file formats.
//!   - [`analysis`]: MSD, stress ACF, orientational correlation, density
//!     histograms, thermo tables and time-series helpers.
//!   - [`plotting`]: explicit plot styling and `plotters`-based figures.
//!   - [`persistence`]: the JSON-backed result shelf.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_mdtools` Python extension, with `correlation` and `analysis`
//!   submodules registered in `sys.modules` for dot-notation imports.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion and error mapping.
//! - Every Rust error type converts to a Python `ValueError` at the
//!   boundary.
//!
//! Conventions
//! -----------
//! - Correlation results cross the boundary as `(time, values)` with
//!   `values` shaped `[n_points, n_entities]` (`n_entities = 1` when
//!   averaged).
//! - Positions are `[frames, atoms, 3]`; stress tensors are
//!   `[frames, components]`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on the inner modules (or their
//!   preludes) and can ignore the items guarded by `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   pipeline test under `tests/`.

pub mod analysis;
pub mod correlation;
pub mod persistence;
pub mod plotting;
pub mod trajectory;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::collections::HashMap;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    analysis::HistogramOptions,
    correlation::{Correlation, CorrelationFunction},
    trajectory::{AtomSelection, Topology, Trajectory},
    utils::{
        extract_array1, extract_array2, extract_array3, extract_correlation_options,
        extract_legendre_order,
    },
};

/// Python-facing `(time, values)` pair.
#[cfg(feature = "python-bindings")]
type PyCorrelation<'py> = (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray2<f64>>);

#[cfg(feature = "python-bindings")]
fn correlation_to_py<'py>(py: Python<'py>, correlation: Correlation) -> PyCorrelation<'py> {
    let time = correlation.time.clone().into_pyarray(py);
    (time, correlation.into_lag_major().into_pyarray(py))
}

/// CorrelationFunction — Python-facing wrapper for a named correlation
/// function.
///
/// Purpose
/// -------
/// Hold a `[n_points, n_entities]` result under a name, expose its cached
/// average and support the non-mutating `*` / `/` scalar operators.
///
/// Parameters
/// ----------
/// Constructed from Python via `CorrelationFunction(name, values, average_axis=1)`:
/// - `name`: `str`
/// - `values`: 2-D array-like of `f64`.
/// - `average_axis`: `int`, `0` or `1`.
///
/// Notes
/// -----
/// - Native Rust code should use [`CorrelationFunction`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "CorrelationFunction", module = "rust_mdtools.correlation", unsendable)]
pub struct PyCorrelationFunction {
    inner: CorrelationFunction,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyCorrelationFunction {
    #[new]
    #[pyo3(
        text_signature = "(name, values, /, average_axis=1)",
        signature = (name, values, average_axis = 1)
    )]
    pub fn new(name: &str, values: &Bound<'_, PyAny>, average_axis: usize) -> PyResult<Self> {
        let values = extract_array2(values)?;
        Ok(PyCorrelationFunction { inner: CorrelationFunction::new(name, values, average_axis)? })
    }

    #[getter]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    #[getter]
    pub fn values<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.values().clone().into_pyarray(py)
    }

    /// Mean along the averaging axis, computed once.
    #[getter]
    pub fn average<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.average().clone().into_pyarray(py)
    }

    pub fn __mul__(&self, factor: f64) -> Self {
        PyCorrelationFunction { inner: &self.inner * factor }
    }

    pub fn __rmul__(&self, factor: f64) -> Self {
        self.__mul__(factor)
    }

    pub fn __truediv__(&self, divisor: f64) -> Self {
        PyCorrelationFunction { inner: &self.inner / divisor }
    }

    pub fn __repr__(&self) -> String {
        let (n_points, n_entities) = self.inner.values().dim();
        format!("CorrelationFunction({:?}, shape=({n_points}, {n_entities}))", self.inner.name())
    }
}

/// Mean-squared displacement of `positions[frames, atoms, 3]`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        positions,
        dt,
        names = None,
        selection = "all",
        n_origins = None,
        spacing = None,
        upper = None,
        average = None,
        verbose = None,
    ),
    text_signature = "(positions, dt, /, names=None, selection='all', n_origins=50, \
                      spacing=None, upper=None, average=True, verbose=False)"
)]
pub fn msd<'py>(
    py: Python<'py>, positions: &Bound<'py, PyAny>, dt: f64, names: Option<Vec<String>>,
    selection: &str, n_origins: Option<usize>, spacing: Option<usize>, upper: Option<f64>,
    average: Option<bool>, verbose: Option<bool>,
) -> PyResult<PyCorrelation<'py>> {
    let xyz = extract_array3(positions)?;
    let names = names.unwrap_or_else(|| vec!["X".to_owned(); xyz.dim().1]);
    let traj = Trajectory::new(xyz, Topology::from_names(names), dt)?;
    let selection = AtomSelection::try_from(selection)?;
    let opts = extract_correlation_options(n_origins, spacing, upper, average, verbose)?;
    let result = analysis::msd(&traj, &selection, &opts)?;
    Ok(correlation_to_py(py, result))
}

/// Stress autocorrelation of `tensors[frames, components]`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        tensors,
        dt,
        normalize = true,
        n_origins = None,
        spacing = None,
        upper = None,
        average = None,
        verbose = None,
    ),
    text_signature = "(tensors, dt, /, normalize=True, n_origins=50, spacing=None, \
                      upper=None, average=True, verbose=False)"
)]
pub fn stress_acf<'py>(
    py: Python<'py>, tensors: &Bound<'py, PyAny>, dt: f64, normalize: bool,
    n_origins: Option<usize>, spacing: Option<usize>, upper: Option<f64>, average: Option<bool>,
    verbose: Option<bool>,
) -> PyResult<PyCorrelation<'py>> {
    let tensors = extract_array2(tensors)?;
    let opts = extract_correlation_options(n_origins, spacing, upper, average, verbose)?;
    let result = analysis::stress_acf(tensors, dt, normalize, &opts)?;
    Ok(correlation_to_py(py, result))
}

/// Legendre orientational correlation of unit `vectors[frames, molecules, 3]`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (vectors, dt, order = None, upper = None, normalize = true),
    text_signature = "(vectors, dt, /, order=2, upper=None, normalize=True)"
)]
pub fn orientational_correlation<'py>(
    py: Python<'py>, vectors: &Bound<'py, PyAny>, dt: f64, order: Option<usize>,
    upper: Option<f64>, normalize: bool,
) -> PyResult<PyCorrelation<'py>> {
    let vectors = extract_array3(vectors)?;
    let order = extract_legendre_order(order)?;
    let result = analysis::orientational_correlation(vectors, dt, order, upper, normalize)?;
    Ok(correlation_to_py(py, result))
}

/// Time-resolved density histogram of `positions[frames, atoms, 3]`.
///
/// Returns `(centers, rows)` with one row per `chunk` frames.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        positions,
        dt,
        chunk,
        names = None,
        selection = "all",
        start = 0.0,
        width = 0.1,
        n_edges = 150,
        axis = 2,
        verbose = false,
    ),
    text_signature = "(positions, dt, chunk, /, names=None, selection='all', start=0.0, \
                      width=0.1, n_edges=150, axis=2, verbose=False)"
)]
pub fn density_hist<'py>(
    py: Python<'py>, positions: &Bound<'py, PyAny>, dt: f64, chunk: usize,
    names: Option<Vec<String>>, selection: &str, start: f64, width: f64, n_edges: usize,
    axis: usize, verbose: bool,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray2<f64>>)> {
    let xyz = extract_array3(positions)?;
    let names = names.unwrap_or_else(|| vec!["X".to_owned(); xyz.dim().1]);
    let traj = Trajectory::new(xyz, Topology::from_names(names), dt)?;
    let selection = AtomSelection::try_from(selection)?;
    let opts = HistogramOptions::new(start, width, n_edges, axis)?.with_verbose(verbose);
    let hist = analysis::density_hist(traj.chunks(chunk)?, &selection, &opts)?;
    Ok((hist.centers.into_pyarray(py), hist.rows.into_pyarray(py)))
}

/// Cumulative trapezoidal integral of `constant · weights · series`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (series, time = None, constant = 1.0, dt = 1.0, weights = None),
    text_signature = "(series, /, time=None, constant=1.0, dt=1.0, weights=None)"
)]
pub fn integrate_series<'py>(
    py: Python<'py>, series: &Bound<'py, PyAny>, time: Option<&Bound<'py, PyAny>>,
    constant: f64, dt: f64, weights: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let series = extract_array1(py, series)?;
    let time = time.map(|t| extract_array1(py, t)).transpose()?;
    let weights = weights.map(|w| extract_array1(py, w)).transpose()?;
    let integral = analysis::integrate_series(
        series.view(),
        time.as_ref().map(|t| t.view()),
        constant,
        dt,
        weights.as_ref().map(|w| w.view()),
    )?;
    Ok(integral.into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (values), text_signature = "(values, /)")]
pub fn cumulative_average<'py>(
    py: Python<'py>, values: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let values = extract_array1(py, values)?;
    Ok(analysis::cumulative_average(values.view()).into_pyarray(py))
}

/// Thermo table of `path` as `{label: array}`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (path, identifier = "Step", columns = None),
    text_signature = "(path, /, identifier='Step', columns=None)"
)]
pub fn extract_numbers<'py>(
    py: Python<'py>, path: &str, identifier: &str, columns: Option<Vec<usize>>,
) -> PyResult<HashMap<String, Bound<'py, PyArray1<f64>>>> {
    let data = analysis::extract_numbers_from_file(path, identifier, columns.as_deref())?;
    Ok(data
        .iter()
        .map(|(label, values)| (label.to_owned(), values.clone().into_pyarray(py)))
        .collect())
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_mdtools<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let correlation_mod = PyModule::new(_py, "correlation")?;
    let analysis_mod = PyModule::new(_py, "analysis")?;
    correlation_module(_py, m, &correlation_mod)?;
    analysis_module(_py, m, &analysis_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_mdtools.correlation", correlation_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("rust_mdtools.analysis", analysis_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn correlation_module<'py>(
    _py: Python, rust_mdtools: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyCorrelationFunction>()?;
    m.add_function(wrap_pyfunction!(msd, m)?)?;
    m.add_function(wrap_pyfunction!(stress_acf, m)?)?;
    m.add_function(wrap_pyfunction!(orientational_correlation, m)?)?;
    rust_mdtools.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn analysis_module<'py>(
    _py: Python, rust_mdtools: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(density_hist, m)?)?;
    m.add_function(wrap_pyfunction!(integrate_series, m)?)?;
    m.add_function(wrap_pyfunction!(cumulative_average, m)?)?;
    m.add_function(wrap_pyfunction!(extract_numbers, m)?)?;
    rust_mdtools.add_submodule(m)?;
    Ok(())
}
