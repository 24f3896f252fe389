//! analysis::stress — stress autocorrelation for Green–Kubo viscosity.
//!
//! Purpose
//! -------
//! Compute the normalized autocorrelation of pressure/stress tensor
//! components, `⟨δP(t₀ + τ) δP(t₀)⟩ / σ²`, from a `[n_frames, n_components]`
//! array sampled every `dt`.
//!
//! Key behaviors
//! -------------
//! - Each column (e.g. `Pxy`, `Pxz`, `Pyz`) is an independent entity; with
//!   `opts.average` the result is the mean over components.
//! - Fluctuations are taken about the whole-series mean of each component
//!   and, when `normalize` is set, divided by its whole-series population
//!   variance, so the lag-0 value is 1 when every frame is an origin.
//!
//! Downstream usage
//! ----------------
//! - Integrate the unnormalized ACF with
//!   [`integrate_series`](crate::analysis::timeseries::integrate_series)
//!   and the `V / k_B T` prefactor to obtain the running viscosity.
use crate::{
    analysis::errors::AnalysisResult,
    correlation::{Contribution, Correlation, CorrelationOptions, TimeSeries, correlate},
};
use ndarray::Array2;

/// Stress autocorrelation of every component column.
///
/// Errors
/// ------
/// - `AnalysisError::Correlation(DegenerateVariance)` when `normalize` is set
///   and a component is constant.
/// - Other kernel errors (`dt`, origins, window) wrapped unchanged.
pub fn stress_acf(
    tensors: Array2<f64>, dt: f64, normalize: bool, opts: &CorrelationOptions,
) -> AnalysisResult<Correlation> {
    let series = TimeSeries::from_components(tensors, dt)?;
    tracing::debug!(n_components = series.n_entities(), dt, normalize, "stress acf");
    Ok(correlate(&series, Contribution::NormalizedFluctuation { normalize }, opts)?)
}
