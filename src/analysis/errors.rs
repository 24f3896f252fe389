//! analysis::errors — error type for the analysis entry points.
//!
//! Purpose
//! -------
//! Collect failures of the MSD / ACF / histogram / thermo routines in one
//! enum. Kernel and trajectory failures are wrapped unchanged so callers can
//! still match on the inner variant.
//!
//! Conventions
//! -----------
//! - I/O errors are stored as text to keep the enum `Clone + PartialEq`.
//! - `From` conversions exist for [`CorrelationError`], [`TrajectoryError`]
//!   and `std::io::Error` so the `?` operator works across layers.

use crate::{correlation::errors::CorrelationError, trajectory::errors::TrajectoryError};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    // ---- Wrapped layers ----
    Correlation(CorrelationError),
    Trajectory(TrajectoryError),

    // ---- Histogram ----
    /// Bin layout with non-positive width or fewer than two edges.
    InvalidBins { start: f64, width: f64, n_edges: usize },

    /// Coordinate axis outside `0..3`.
    InvalidAxis { axis: usize },

    // ---- Thermo ----
    /// System size is non-positive or non-finite.
    InvalidSystemSize { size: f64 },

    /// No header line contains the identifier.
    IdentifierNotFound { identifier: String },

    /// Requested label is absent from the data.
    MissingLabel { label: String },

    /// Requested column index exceeds the header width.
    ColumnOutOfRange { column: usize, n_labels: usize },

    /// `xlim` with `min > max` or non-finite bounds.
    InvalidTimeRange { min: f64, max: f64 },

    // ---- Time series ----
    /// Two arrays that must agree in shape do not.
    ShapeMismatch { expected: Vec<usize>, actual: Vec<usize> },

    /// Time step is non-positive or non-finite.
    InvalidTimeStep { dt: f64 },

    // ---- Diffusion ----
    /// No `D[...]` summary line in an MSD log.
    DiffusionNotFound,

    /// Fewer than two distinct samples in an Einstein fit window.
    FitWindowTooShort { n_samples: usize },

    // ---- Input files ----
    /// Data line that cannot be parsed.
    Parse { line: usize, content: String },

    Io { message: String },
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Correlation(err) => Some(err),
            AnalysisError::Trajectory(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Wrapped layers ----
            AnalysisError::Correlation(err) => write!(f, "{err}"),
            AnalysisError::Trajectory(err) => write!(f, "{err}"),
            // ---- Histogram ----
            AnalysisError::InvalidBins { start, width, n_edges } => {
                write!(
                    f,
                    "Histogram needs width > 0 and >= 2 edges; got start={start}, \
                     width={width}, n_edges={n_edges}"
                )
            }
            AnalysisError::InvalidAxis { axis } => {
                write!(f, "Coordinate axis must be 0, 1 or 2; got: {axis}")
            }
            // ---- Thermo ----
            AnalysisError::InvalidSystemSize { size } => {
                write!(f, "System size must be finite and > 0; got: {size}")
            }
            AnalysisError::IdentifierNotFound { identifier } => {
                write!(f, "{identifier} not found in the file")
            }
            AnalysisError::MissingLabel { label } => {
                write!(f, "No series labelled {label:?}")
            }
            AnalysisError::ColumnOutOfRange { column, n_labels } => {
                write!(f, "Column {column} out of range for a header with {n_labels} labels")
            }
            AnalysisError::InvalidTimeRange { min, max } => {
                write!(f, "Time range needs finite bounds with min <= max; got: ({min}, {max})")
            }
            // ---- Time series ----
            AnalysisError::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "Array of shape {actual:?} is not compatible with the series of shape \
                     {expected:?}"
                )
            }
            AnalysisError::InvalidTimeStep { dt } => {
                write!(f, "dt must be finite and > 0; got: {dt}")
            }
            // ---- Diffusion ----
            AnalysisError::DiffusionNotFound => {
                write!(f, "No diffusion coefficient line (D[...]) in the MSD log")
            }
            AnalysisError::FitWindowTooShort { n_samples } => {
                write!(f, "Einstein fit needs >= 2 distinct times; got {n_samples} samples")
            }
            // ---- Input files ----
            AnalysisError::Parse { line, content } => {
                write!(f, "Cannot parse line {line}: {content:?}")
            }
            AnalysisError::Io { message } => write!(f, "I/O error: {message}"),
        }
    }
}

impl From<CorrelationError> for AnalysisError {
    fn from(err: CorrelationError) -> Self {
        AnalysisError::Correlation(err)
    }
}

impl From<TrajectoryError> for AnalysisError {
    fn from(err: TrajectoryError) -> Self {
        AnalysisError::Trajectory(err)
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io { message: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<AnalysisError> for PyErr {
    fn from(err: AnalysisError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
