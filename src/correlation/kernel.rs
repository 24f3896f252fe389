//! correlation::kernel — the multiple-time-origin correlation accumulator.
//!
//! Purpose
//! -------
//! Compute a discretized lag-time correlation (or displacement) function
//! from a uniformly sampled series by averaging contributions from several
//! time origins. One kernel serves mean-squared displacement, normalized
//! stress autocorrelation and Legendre orientational correlation; the caller
//! picks the semantics through [`Contribution`].
//!
//! Key behaviors
//! -------------
//! - Select origins and the lag window from [`CorrelationOptions`] via
//!   [`select_origins`] and [`window_length`].
//! - For every origin `o` and lag `k < n_points` with `o + k < n_frames`,
//!   add the per-entity contribution to `sum[k, e]` and bump `count[k]`.
//! - Normalize `sum / count`, optionally rescale by the lag-0 value, and
//!   optionally average over entities.
//!
//! Invariants & assumptions
//! ------------------------
//! - `count[k]` equals the number of origins whose trailing window reaches
//!   lag `k`; it is non-increasing in `k`. Frame 0 is always an origin and
//!   the window never exceeds `n_frames`, so `count[k] ≥ 1` for every lag.
//! - The mean and variance used by [`Contribution::NormalizedFluctuation`]
//!   are computed per entity over the *whole* series (all frames and
//!   components), once, before the origin loop.
//!
//! Conventions
//! -----------
//! - Lags are in frames; the returned time axis is `k · dt`.
//! - Per-entity output is `[n_points, n_entities]` (lag-major).
//!
//! Testing notes
//! -------------
//! - Unit tests cover: zero MSD for a constant series, exact zero at lag 0
//!   with every frame as an origin, unit lag-0 value of the normalized
//!   fluctuation product, the count invariant, hand-computed MSD and ACF
//!   values, truncation of oversized windows, the Legendre orders and the
//!   lag-0 normalization.
use crate::correlation::{
    errors::{CorrelationError, CorrelationResult},
    options::CorrelationOptions,
    origins::{contribution_counts, lag_time_axis, select_origins, window_length},
    progress::LoopProgress,
    series::TimeSeries,
};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Legendre polynomial applied to the dot product of unit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendreOrder {
    /// `P₁(x) = x`
    First,
    /// `P₂(x) = (3x² − 1) / 2`
    Second,
}

impl LegendreOrder {
    pub fn eval(self, x: f64) -> f64 {
        match self {
            LegendreOrder::First => x,
            LegendreOrder::Second => 0.5 * (3.0 * x * x - 1.0),
        }
    }
}

impl TryFrom<usize> for LegendreOrder {
    type Error = CorrelationError;

    fn try_from(order: usize) -> CorrelationResult<Self> {
        match order {
            1 => Ok(LegendreOrder::First),
            2 => Ok(LegendreOrder::Second),
            _ => Err(CorrelationError::UnsupportedLegendreOrder { order }),
        }
    }
}

/// Reference-relative contribution accumulated at lag `k` from origin `o`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contribution {
    /// `Σ_c (x[o+k] − x[o])²` — mean-squared displacement.
    SquaredDisplacement,
    /// `Σ_c (x[o+k] − μ)(x[o] − μ) / σ²` with whole-series `μ`, `σ²`;
    /// `σ² = 1` when `normalize` is false.
    NormalizedFluctuation { normalize: bool },
    /// `P_ℓ(x[o] · x[o+k])` — orientational correlation.
    LegendreDot(LegendreOrder),
}

impl Contribution {
    fn label(&self) -> &'static str {
        match self {
            Contribution::SquaredDisplacement => "squared displacement",
            Contribution::NormalizedFluctuation { .. } => "normalized fluctuation",
            Contribution::LegendreDot(_) => "legendre dot product",
        }
    }
}

/// Normalized values per lag, either per entity or averaged over entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LagValues {
    /// `[n_points, n_entities]`
    PerEntity(Array2<f64>),
    /// `[n_points]`
    Averaged(Array1<f64>),
}

/// Output of [`correlate`]: time axis, contribution counts and values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub time: Array1<f64>,
    pub counts: Array1<usize>,
    pub values: LagValues,
}

impl Correlation {
    pub fn n_points(&self) -> usize {
        self.time.len()
    }

    /// Entity-averaged values regardless of how the result was requested.
    pub fn averaged(&self) -> Array1<f64> {
        match &self.values {
            LagValues::Averaged(v) => v.clone(),
            LagValues::PerEntity(v) => {
                v.mean_axis(Axis(1)).unwrap_or_else(|| Array1::zeros(v.nrows()))
            }
        }
    }

    /// Values as a `[n_points, n_entities]` array (`n_entities = 1` when
    /// averaged).
    pub fn into_lag_major(self) -> Array2<f64> {
        match self.values {
            LagValues::PerEntity(v) => v,
            LagValues::Averaged(v) => v.insert_axis(Axis(1)),
        }
    }
}

/// Run the multi-origin accumulation.
///
/// Parameters
/// ----------
/// - `series`: [`TimeSeries`]
///   Validated `[n_frames, n_entities, n_components]` samples.
/// - `contribution`: [`Contribution`]
///   Reference-relative quantity accumulated per origin and lag.
/// - `opts`: [`CorrelationOptions`]
///   Origin policy, window, averaging, normalization and progress.
///
/// Returns
/// -------
/// `CorrelationResult<Correlation>` with `time = k · dt`, the per-lag
/// contribution counts and the normalized values.
///
/// Errors
/// ------
/// - Option and window errors from [`select_origins`] / [`window_length`].
/// - `CorrelationError::DegenerateVariance { entity }` when a normalized
///   fluctuation is requested for an entity with zero variance.
/// - `CorrelationError::ZeroInitialValue { entity }` when lag-0
///   normalization meets a zero lag-0 value.
/// - `CorrelationError::ZeroContributions { lag }` if a lag inside the
///   window received no contribution.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_mdtools::correlation::{correlate, Contribution, CorrelationOptions, TimeSeries};
/// let series = TimeSeries::from_scalars(array![0.0, 1.0, 2.0, 3.0], 1.0).unwrap();
/// let opts = CorrelationOptions::new(4, None, None, true).unwrap();
/// let msd = correlate(&series, Contribution::SquaredDisplacement, &opts).unwrap();
/// assert_eq!(msd.averaged()[0], 0.0);
/// assert_eq!(msd.averaged()[1], 1.0);
/// ```
pub fn correlate(
    series: &TimeSeries, contribution: Contribution, opts: &CorrelationOptions,
) -> CorrelationResult<Correlation> {
    opts.validate()?;
    let n_frames = series.n_frames();
    let n_entities = series.n_entities();
    let dt = series.dt();

    let origins = select_origins(n_frames, opts.origins)?;
    let n_points = window_length(n_frames, dt, opts.upper)?;
    let stats = entity_statistics(series, contribution)?;

    tracing::debug!(
        n_frames,
        n_entities,
        n_origins = origins.len(),
        n_points,
        contribution = contribution.label(),
        "correlating"
    );

    let values = series.values();
    let mut sums = Array2::<f64>::zeros((n_points, n_entities));
    let counts = contribution_counts(&origins, n_frames, n_points);
    let mut progress =
        LoopProgress::new(origins.len(), "origins", opts.verbose, opts.report_interval);

    for (i, &origin) in origins.iter().enumerate() {
        let reference = values.index_axis(Axis(0), origin);
        let reach = n_points.min(n_frames - origin);
        for lag in 0..reach {
            let current = values.index_axis(Axis(0), origin + lag);
            let mut row = sums.row_mut(lag);
            for entity in 0..n_entities {
                row[entity] += contribution.evaluate(
                    current.row(entity),
                    reference.row(entity),
                    stats[entity],
                );
            }
        }
        progress.step(i, origin as f64 * dt);
    }
    progress.finish();

    if let Some(lag) = counts.iter().position(|&c| c == 0) {
        return Err(CorrelationError::ZeroContributions { lag });
    }

    let denominators = counts.mapv(|c| c as f64).insert_axis(Axis(1));
    let mut normalized = sums / &denominators;

    if opts.normalize_lag0 {
        for (entity, mut column) in normalized.axis_iter_mut(Axis(1)).enumerate() {
            let first = column[0];
            if first == 0.0 {
                return Err(CorrelationError::ZeroInitialValue { entity });
            }
            column.mapv_inplace(|v| v / first);
        }
    }

    let values = if opts.average {
        LagValues::Averaged(normalized.mean_axis(Axis(1)).ok_or(CorrelationError::EmptySeries)?)
    } else {
        LagValues::PerEntity(normalized)
    };

    Ok(Correlation { time: lag_time_axis(n_points, dt), counts, values })
}

// ---- Helper methods ----

impl Contribution {
    /// Contribution of one entity at one lag. `stats` is `(μ, σ²)`.
    #[inline]
    fn evaluate(
        &self, current: ArrayView1<f64>, reference: ArrayView1<f64>, stats: (f64, f64),
    ) -> f64 {
        match self {
            Contribution::SquaredDisplacement => {
                current.iter().zip(reference.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
            }
            Contribution::NormalizedFluctuation { .. } => {
                let (mean, variance) = stats;
                let product: f64 = current
                    .iter()
                    .zip(reference.iter())
                    .map(|(a, b)| (a - mean) * (b - mean))
                    .sum();
                product / variance
            }
            Contribution::LegendreDot(order) => order.eval(current.dot(&reference)),
        }
    }
}

/// Whole-series `(μ, σ²)` per entity. Only the fluctuation variant uses
/// them; other variants get `(0, 1)` placeholders.
fn entity_statistics(
    series: &TimeSeries, contribution: Contribution,
) -> CorrelationResult<Vec<(f64, f64)>> {
    let Contribution::NormalizedFluctuation { normalize } = contribution else {
        return Ok(vec![(0.0, 1.0); series.n_entities()]);
    };
    let values = series.values();
    values
        .axis_iter(Axis(1))
        .enumerate()
        .map(|(entity, samples)| {
            let mean = samples.iter().mean();
            if !normalize {
                return Ok((mean, 1.0));
            }
            let variance = samples.iter().population_variance();
            if variance <= 0.0 || !variance.is_finite() {
                return Err(CorrelationError::DegenerateVariance { entity });
            }
            Ok((mean, variance))
        })
        .collect()
}
