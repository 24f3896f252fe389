//! correlation::series — uniformly sampled per-frame arrays.
//!
//! Purpose
//! -------
//! Provide [`TimeSeries`], the single input layout consumed by the
//! multi-origin correlation kernel. Scalar series, multi-component series
//! (e.g. the off-diagonal stress tensor components) and per-particle vector
//! series (e.g. positions) are all normalized to one 3-D layout.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values` has shape `[n_frames, n_entities, n_components]` with every
//!   dimension ≥ 1.
//! - All samples are finite; `dt` is finite and strictly positive.
//!
//! Conventions
//! -----------
//! - Axis 0 is time. Axis 1 indexes the entities the kernel reports
//!   separately (atoms, tensor components). Axis 2 holds the components that
//!   are reduced inside a single contribution (x/y/z for displacements and
//!   dot products).
//! - Component series built by [`TimeSeries::from_components`] map each
//!   column to its own entity with a single component.
use crate::correlation::errors::{CorrelationError, CorrelationResult};
use ndarray::{Array1, Array2, Array3, ArrayView3, Axis};

/// `TimeSeries` — validated `[frames, entities, components]` samples plus `dt`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Array3<f64>,
    dt: f64,
}

impl TimeSeries {
    /// Build a series from a full `[frames, entities, components]` array.
    ///
    /// Errors
    /// ------
    /// - `CorrelationError::InvalidTimeStep` if `dt` is not finite and > 0.
    /// - `CorrelationError::EmptySeries` if any dimension is zero.
    /// - `CorrelationError::NonFiniteSample` for the first NaN/±inf sample.
    pub fn new(values: Array3<f64>, dt: f64) -> CorrelationResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CorrelationError::InvalidTimeStep { dt });
        }
        if values.is_empty() {
            return Err(CorrelationError::EmptySeries);
        }
        for (frame, frame_values) in values.axis_iter(Axis(0)).enumerate() {
            if let Some(&value) = frame_values.iter().find(|v| !v.is_finite()) {
                return Err(CorrelationError::NonFiniteSample { frame, value });
            }
        }
        Ok(TimeSeries { values, dt })
    }

    /// One scalar per frame; a single entity with a single component.
    pub fn from_scalars(values: Array1<f64>, dt: f64) -> CorrelationResult<Self> {
        let n = values.len();
        let values = values.into_shape_with_order((n, 1, 1)).map_err(|_| {
            CorrelationError::ShapeMismatch { expected: "[n_frames]".into(), actual: vec![n] }
        })?;
        Self::new(values, dt)
    }

    /// `[frames, components]`, each component reported as its own entity.
    pub fn from_components(values: Array2<f64>, dt: f64) -> CorrelationResult<Self> {
        let (n, c) = values.dim();
        let values = values.into_shape_with_order((n, c, 1)).map_err(|_| {
            CorrelationError::ShapeMismatch {
                expected: "[n_frames, n_components]".into(),
                actual: vec![n, c],
            }
        })?;
        Self::new(values, dt)
    }

    /// `[frames, entities, 3]` vectors (positions, orientations).
    pub fn from_vectors(values: Array3<f64>, dt: f64) -> CorrelationResult<Self> {
        if values.dim().2 != 3 {
            return Err(CorrelationError::ShapeMismatch {
                expected: "[n_frames, n_entities, 3]".into(),
                actual: values.shape().to_vec(),
            });
        }
        Self::new(values, dt)
    }

    pub fn values(&self) -> ArrayView3<'_, f64> {
        self.values.view()
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn n_frames(&self) -> usize {
        self.values.dim().0
    }

    pub fn n_entities(&self) -> usize {
        self.values.dim().1
    }

    pub fn n_components(&self) -> usize {
        self.values.dim().2
    }

    /// Total duration covered by the samples, `n_frames · dt`.
    pub fn duration(&self) -> f64 {
        self.n_frames() as f64 * self.dt
    }
}
