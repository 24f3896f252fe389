//! analysis::timeseries — small helpers around sampled series.
//!
//! Time axes for uniformly sampled data, cumulative trapezoidal
//! integration (Green–Kubo running integrals) and cumulative averages.
use crate::analysis::errors::{AnalysisError, AnalysisResult};
use ndarray::{Array1, ArrayBase, ArrayView1, Data, Dimension};

/// `[0, dt, 2·dt, …, (n − 1)·dt]`.
pub fn time_axis(n_frames: usize, dt: f64) -> Array1<f64> {
    Array1::from_iter((0..n_frames).map(|i| i as f64 * dt))
}

/// Time axis matching the first dimension of `series`.
pub fn time_axis_like<S, D>(series: &ArrayBase<S, D>, dt: f64) -> Array1<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    time_axis(series.shape().first().copied().unwrap_or(0), dt)
}

/// Cumulative trapezoidal integral of `constant · weights · series`,
/// starting at 0.
///
/// Parameters
/// ----------
/// - `series`: `ArrayView1<f64>`
///   Integrand samples.
/// - `time_axis`: `Option<ArrayView1<f64>>`
///   Sample times; defaults to [`time_axis_like`] with `dt`.
/// - `constant`: `f64`
///   Prefactor applied to the whole integral.
/// - `dt`: `f64`
///   Spacing used only when `time_axis` is `None`.
/// - `weights`: `Option<ArrayView1<f64>>`
///   Per-sample weights; must match `series` in shape.
///
/// Returns
/// -------
/// `Array1<f64>` of the same length as `series`, first element 0.
///
/// Errors
/// ------
/// - `AnalysisError::ShapeMismatch` when `weights` or `time_axis` differ
///   in length from `series`.
/// - `AnalysisError::InvalidTimeStep` when `dt` is used and is not finite
///   and > 0.
pub fn integrate_series(
    series: ArrayView1<f64>, time_axis: Option<ArrayView1<f64>>, constant: f64, dt: f64,
    weights: Option<ArrayView1<f64>>,
) -> AnalysisResult<Array1<f64>> {
    let n = series.len();
    let check = |other: &ArrayView1<f64>| {
        if other.len() != n {
            return Err(AnalysisError::ShapeMismatch {
                expected: series.shape().to_vec(),
                actual: other.shape().to_vec(),
            });
        }
        Ok(())
    };
    if let Some(w) = &weights {
        check(w)?;
    }
    let time = match time_axis {
        Some(t) => {
            check(&t)?;
            t.to_owned()
        }
        None => {
            if !dt.is_finite() || dt <= 0.0 {
                return Err(AnalysisError::InvalidTimeStep { dt });
            }
            time_axis_like(&series, dt)
        }
    };

    let integrand = match weights {
        Some(w) => &series * &w * constant,
        None => &series * constant,
    };
    let mut out = Array1::<f64>::zeros(n);
    for i in 1..n {
        let area = 0.5 * (integrand[i] + integrand[i - 1]) * (time[i] - time[i - 1]);
        out[i] = out[i - 1] + area;
    }
    Ok(out)
}

/// Running mean `y_i = (x_0 + … + x_i) / (i + 1)`.
pub fn cumulative_average(values: ArrayView1<f64>) -> Array1<f64> {
    let mut sum = 0.0;
    Array1::from_iter(values.iter().enumerate().map(|(i, &v)| {
        sum += v;
        sum / (i + 1) as f64
    }))
}
