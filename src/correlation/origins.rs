//! Origin selection and lag-window sizing.
//!
//! Origins are `⌊i · n_frames / count⌋` for `i = 0..count`, which is the
//! integer truncation of an evenly spaced, half-open linspace over
//! `[0, n_frames)`. Frame 0 is therefore always an origin, and with
//! `count > n_frames` some frames are selected more than once (each copy
//! contributes).
use crate::correlation::{
    errors::{CorrelationError, CorrelationResult},
    options::OriginPolicy,
};
use ndarray::Array1;

/// Frame indices used as time origins.
///
/// # Errors
/// - `InvalidOriginCount` / `InvalidOriginSpacing` for zero parameters.
/// - `EmptyOriginSet` when `spacing > n_frames`.
pub fn select_origins(n_frames: usize, policy: OriginPolicy) -> CorrelationResult<Vec<usize>> {
    let count = match policy {
        OriginPolicy::Count(0) => return Err(CorrelationError::InvalidOriginCount { count: 0 }),
        OriginPolicy::Count(n) => n,
        OriginPolicy::Spacing(0) => {
            return Err(CorrelationError::InvalidOriginSpacing { spacing: 0 });
        }
        OriginPolicy::Spacing(s) => {
            let count = n_frames / s;
            if count == 0 {
                return Err(CorrelationError::EmptyOriginSet { n_frames, spacing: s });
            }
            count
        }
    };
    Ok((0..count).map(|i| i * n_frames / count).collect())
}

/// Number of lag points, `⌊upper / dt⌋`, truncated to the series length.
///
/// A relative guard of a few ulps keeps exact multiples such as
/// `upper = 0.3, dt = 0.1` from flooring one point short, so the result is
/// 3 there where a plain `int(upper / dt)` truncation gives 2.
pub fn window_length(n_frames: usize, dt: f64, upper: Option<f64>) -> CorrelationResult<usize> {
    let n_points = match upper {
        None => n_frames,
        Some(u) if !u.is_finite() || u <= 0.0 => {
            return Err(CorrelationError::InvalidUpperBound { upper: u });
        }
        Some(u) => {
            let ratio = u / dt;
            (ratio * (1.0 + 4.0 * f64::EPSILON)).floor() as usize
        }
    };
    if n_points == 0 {
        return Err(CorrelationError::EmptyWindow { upper: upper.unwrap_or(0.0), dt });
    }
    Ok(n_points.min(n_frames))
}

/// `linspace(0, (n_points − 1)·dt, n_points)`.
pub fn lag_time_axis(n_points: usize, dt: f64) -> Array1<f64> {
    Array1::from_iter((0..n_points).map(|k| k as f64 * dt))
}

/// Number of origins reaching each lag, `|{o : o + k < n_frames}|`.
pub fn contribution_counts(origins: &[usize], n_frames: usize, n_points: usize) -> Array1<usize> {
    let mut counts = Array1::<usize>::zeros(n_points);
    for &origin in origins {
        let reach = n_points.min(n_frames.saturating_sub(origin));
        counts.slice_mut(ndarray::s![..reach]).mapv_inplace(|c| c + 1);
    }
    counts
}
