//! plotting::errors — error type for styling and figure rendering.
//!
//! Conventions
//! -----------
//! - Backend failures from `plotters` are flattened to text so the enum
//!   stays `Clone + PartialEq`; the generic `From<DrawingAreaErrorKind<_>>`
//!   impl lets `?` work inside backend-generic drawing code.
//! - Thermo lookups go through [`AnalysisError`] and are wrapped unchanged.

use crate::analysis::errors::AnalysisError;
use plotters::drawing::DrawingAreaErrorKind;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PlotError {
    // ---- Style configuration ----
    /// Style name other than `"gruvbox"` or `"seaborn"`.
    UnknownStyle { name: String },

    /// Palette name that is not built in.
    UnknownPalette { name: String },

    /// Output format other than `"svg"` or `"png"`.
    UnknownFormat { name: String },

    /// Colour string that is not `#rrggbb`.
    InvalidColor { color: String },

    /// Figure width or height non-positive or non-finite.
    InvalidFigureSize { width: f64, height: f64 },

    // ---- Data ----
    /// A requested series key is not in the input.
    MissingSeries { key: String },

    /// `x` and `y` of a series differ in length.
    SeriesLengthMismatch { key: String, x_len: usize, y_len: usize },

    /// Nothing to draw (no series, no panels or an empty image).
    EmptyFigure,

    /// Axis limits with `min >= max` or non-finite bounds.
    InvalidLimits { min: f64, max: f64 },

    /// Cell spacing of an image that is non-positive or non-finite.
    InvalidSpacing { d_time: f64, d_dist: f64 },

    /// Colour-scale floor that is NaN or infinite.
    InvalidColorFloor { vmin: f64 },

    Analysis(AnalysisError),

    // ---- Output ----
    /// The drawing backend reported a failure.
    Render { message: String },

    Io { path: String, message: String },
}

impl std::error::Error for PlotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlotError::Analysis(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Style configuration ----
            PlotError::UnknownStyle { name } => {
                write!(f, "Unknown plot style {name:?}; expected \"gruvbox\" or \"seaborn\"")
            }
            PlotError::UnknownPalette { name } => write!(f, "Unknown palette {name:?}"),
            PlotError::UnknownFormat { name } => {
                write!(f, "Unknown image format {name:?}; expected \"svg\" or \"png\"")
            }
            PlotError::InvalidColor { color } => {
                write!(f, "Colour must be written as #rrggbb; got: {color:?}")
            }
            PlotError::InvalidFigureSize { width, height } => {
                write!(f, "Figure size must be finite and > 0; got: ({width}, {height})")
            }
            // ---- Data ----
            PlotError::MissingSeries { key } => write!(f, "No series named {key:?}"),
            PlotError::SeriesLengthMismatch { key, x_len, y_len } => {
                write!(f, "Series {key:?} has {x_len} x values but {y_len} y values")
            }
            PlotError::EmptyFigure => write!(f, "Nothing to plot"),
            PlotError::InvalidLimits { min, max } => {
                write!(f, "Axis limits need finite bounds with min < max; got: ({min}, {max})")
            }
            PlotError::InvalidSpacing { d_time, d_dist } => {
                write!(f, "Cell spacing must be finite and > 0; got: ({d_time}, {d_dist})")
            }
            PlotError::InvalidColorFloor { vmin } => {
                write!(f, "Colour-scale floor must be finite; got: {vmin}")
            }
            PlotError::Analysis(err) => write!(f, "{err}"),
            // ---- Output ----
            PlotError::Render { message } => write!(f, "Rendering failed: {message}"),
            PlotError::Io { path, message } => write!(f, "Cannot write {path}: {message}"),
        }
    }
}

impl From<AnalysisError> for PlotError {
    fn from(err: AnalysisError) -> Self {
        PlotError::Analysis(err)
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render { message: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PlotError> for PyErr {
    fn from(err: PlotError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
