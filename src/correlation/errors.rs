//! correlation::errors — error type for the multi-origin correlation kernel.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by series construction,
//! option validation, origin selection and the accumulation loop, together
//! with the PyO3 bridge used when the `python-bindings` feature is enabled.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of the violated constraint ("dt must be
//!   finite and > 0") and embed the offending value.
//! - Every variant is small and cloneable so tests can match on it directly.
//!
//! Testing notes
//! -------------
//! - Unit tests check that each payload-carrying variant embeds its payload
//!   in the `Display` message.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type CorrelationResult<T> = Result<T, CorrelationError>;

/// Errors raised while preparing or running a correlation computation.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrelationError {
    // ---- Series validation ----
    /// The series has no frames, entities or components.
    EmptySeries,

    /// A sample is NaN/±inf.
    NonFiniteSample { frame: usize, value: f64 },

    /// The time step is non-positive or non-finite.
    InvalidTimeStep { dt: f64 },

    /// Array dimensions do not match the expected layout.
    ShapeMismatch { expected: String, actual: Vec<usize> },

    // ---- Options validation ----
    /// Origin count is zero.
    InvalidOriginCount { count: usize },

    /// Origin spacing is zero.
    InvalidOriginSpacing { spacing: usize },

    /// Upper time bound is non-positive or non-finite.
    InvalidUpperBound { upper: f64 },

    // ---- Window / origin selection ----
    /// Spacing larger than the series leaves no origins.
    EmptyOriginSet { n_frames: usize, spacing: usize },

    /// The requested window is shorter than one frame.
    EmptyWindow { upper: f64, dt: f64 },

    /// Some lag inside the window received no contributions.
    ZeroContributions { lag: usize },

    // ---- Contribution semantics ----
    /// Entity has zero variance while normalization is requested.
    DegenerateVariance { entity: usize },

    /// Lag-0 value is zero so the lag-0 normalization is undefined.
    ZeroInitialValue { entity: usize },

    /// Legendre polynomial order outside the implemented set.
    UnsupportedLegendreOrder { order: usize },

    // ---- Containers ----
    /// Averaging axis is out of range or has zero length.
    InvalidAverageAxis { axis: usize, shape: Vec<usize> },
}

impl std::error::Error for CorrelationError {}

impl std::fmt::Display for CorrelationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Series validation ----
            CorrelationError::EmptySeries => {
                write!(f, "Input series is empty.")
            }
            CorrelationError::NonFiniteSample { frame, value } => {
                write!(f, "Sample in frame {frame} is non-finite: {value}")
            }
            CorrelationError::InvalidTimeStep { dt } => {
                write!(f, "dt must be finite and > 0; got: {dt}")
            }
            CorrelationError::ShapeMismatch { expected, actual } => {
                write!(f, "Expected array of shape {expected}; got: {actual:?}")
            }
            // ---- Options validation ----
            CorrelationError::InvalidOriginCount { count } => {
                write!(f, "Number of time origins must be >= 1; got: {count}")
            }
            CorrelationError::InvalidOriginSpacing { spacing } => {
                write!(f, "Origin spacing must be >= 1 frame; got: {spacing}")
            }
            CorrelationError::InvalidUpperBound { upper } => {
                write!(f, "Upper time bound must be finite and > 0; got: {upper}")
            }
            // ---- Window / origin selection ----
            CorrelationError::EmptyOriginSet { n_frames, spacing } => {
                write!(
                    f,
                    "Origin spacing {spacing} leaves no origins in a series of {n_frames} frames"
                )
            }
            CorrelationError::EmptyWindow { upper, dt } => {
                write!(f, "Upper bound {upper} is shorter than one time step ({dt})")
            }
            CorrelationError::ZeroContributions { lag } => {
                write!(f, "No time origin contributes to lag {lag}")
            }
            // ---- Contribution semantics ----
            CorrelationError::DegenerateVariance { entity } => {
                write!(f, "Entity {entity} has zero variance; cannot normalize fluctuations")
            }
            CorrelationError::ZeroInitialValue { entity } => {
                write!(f, "Entity {entity} has a zero lag-0 value; cannot normalize by it")
            }
            CorrelationError::UnsupportedLegendreOrder { order } => {
                write!(f, "Order {order} of Legendre polynomial has not been implemented")
            }
            // ---- Containers ----
            CorrelationError::InvalidAverageAxis { axis, shape } => {
                write!(f, "Cannot average along axis {axis} of an array with shape {shape:?}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<CorrelationError> for PyErr {
    fn from(err: CorrelationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_time_step_embeds_value() {
        let msg = CorrelationError::InvalidTimeStep { dt: -0.5 }.to_string();
        assert!(msg.contains("-0.5"), "Got: {msg}");
    }

    #[test]
    fn empty_origin_set_reports_spacing_and_length() {
        let msg = CorrelationError::EmptyOriginSet { n_frames: 7, spacing: 100 }.to_string();
        assert!(msg.contains("100") && msg.contains('7'), "Got: {msg}");
    }

    #[test]
    fn unsupported_legendre_order_embeds_order() {
        let msg = CorrelationError::UnsupportedLegendreOrder { order: 4 }.to_string();
        assert!(msg.contains('4'), "Got: {msg}");
    }

    #[test]
    fn zero_contributions_embeds_lag() {
        let msg = CorrelationError::ZeroContributions { lag: 12 }.to_string();
        assert!(msg.contains("12"), "Got: {msg}");
    }
}
