//! correlation::options — configuration for multi-origin correlation runs.
//!
//! Purpose
//! -------
//! Bundle the tunable parameters of the correlation kernel: how time origins
//! are chosen, how far past each origin lags are accumulated, whether the
//! per-entity result is averaged, and progress reporting.
//!
//! Key behaviors
//! -------------
//! - [`OriginPolicy`] encodes the two origin regimes: an explicit count of
//!   evenly spaced origins, or a fixed frame spacing. A spacing always
//!   overrides a count when both are supplied to [`CorrelationOptions::new`].
//! - [`CorrelationOptions::new`] validates every numeric field once so the
//!   kernel can assume clean inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Count(n)` has `n ≥ 1`; `Spacing(s)` has `s ≥ 1`.
//! - `upper`, when present, is finite and > 0.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the spacing-overrides-count rule, each rejection
//!   branch and the documented defaults.
use crate::correlation::errors::{CorrelationError, CorrelationResult};
use std::time::Duration;

/// How time origins are laid out over the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginPolicy {
    /// `n` origins evenly spaced over `[0, n_frames)`.
    Count(usize),
    /// One origin every `s` frames; the count becomes `n_frames / s`.
    Spacing(usize),
}

/// CorrelationOptions — knobs for [`correlate`](crate::correlation::kernel::correlate).
///
/// Fields
/// ------
/// - `origins`: [`OriginPolicy`]
///   Origin regime. Origins are always evenly spaced frame indices in the
///   half-open range `[0, n_frames)`.
/// - `upper`: `Option<f64>`
///   Largest lag time to accumulate, in the units of `dt`. `None` means the
///   full series duration. Windows longer than the series are truncated to
///   the series length.
/// - `average`: `bool`
///   Collapse the entity axis by arithmetic mean after normalization.
/// - `normalize_lag0`: `bool`
///   Divide every entity column by its lag-0 value after averaging over
///   origins.
/// - `verbose`: `bool`
///   Draw an `indicatif` progress bar over the origin loop.
/// - `report_interval`: `Duration`
///   Minimum wall-clock time between two progress reports.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationOptions {
    pub origins: OriginPolicy,
    pub upper: Option<f64>,
    pub average: bool,
    pub normalize_lag0: bool,
    pub verbose: bool,
    pub report_interval: Duration,
}

impl CorrelationOptions {
    /// Construct validated options.
    ///
    /// Parameters
    /// ----------
    /// - `n_origins`: `usize`
    ///   Number of evenly spaced origins; ignored when `spacing` is given.
    /// - `spacing`: `Option<usize>`
    ///   Frame spacing between origins. Overrides `n_origins`.
    /// - `upper`: `Option<f64>`
    ///   Upper lag time; `None` selects the full series duration.
    /// - `average`: `bool`
    ///   Average over entities after normalization.
    ///
    /// Errors
    /// ------
    /// - `CorrelationError::InvalidOriginSpacing` if `spacing == Some(0)`.
    /// - `CorrelationError::InvalidOriginCount` if no spacing is given and
    ///   `n_origins == 0`.
    /// - `CorrelationError::InvalidUpperBound` if `upper` is non-finite or ≤ 0.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_mdtools::correlation::options::{CorrelationOptions, OriginPolicy};
    /// let opts = CorrelationOptions::new(50, Some(100), None, true).unwrap();
    /// assert_eq!(opts.origins, OriginPolicy::Spacing(100));
    /// ```
    pub fn new(
        n_origins: usize, spacing: Option<usize>, upper: Option<f64>, average: bool,
    ) -> CorrelationResult<Self> {
        let origins = match spacing {
            Some(0) => return Err(CorrelationError::InvalidOriginSpacing { spacing: 0 }),
            Some(s) => OriginPolicy::Spacing(s),
            None if n_origins == 0 => {
                return Err(CorrelationError::InvalidOriginCount { count: n_origins });
            }
            None => OriginPolicy::Count(n_origins),
        };
        if let Some(u) = upper {
            if !u.is_finite() || u <= 0.0 {
                return Err(CorrelationError::InvalidUpperBound { upper: u });
            }
        }
        Ok(CorrelationOptions { origins, upper, average, ..CorrelationOptions::default() })
    }

    /// Enable the lag-0 normalization.
    pub fn with_lag0_normalization(mut self, normalize: bool) -> Self {
        self.normalize_lag0 = normalize;
        self
    }

    /// Toggle the terminal progress bar.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Re-check invariants on values built through struct literals.
    pub(crate) fn validate(&self) -> CorrelationResult<()> {
        match self.origins {
            OriginPolicy::Count(0) => return Err(CorrelationError::InvalidOriginCount { count: 0 }),
            OriginPolicy::Spacing(0) => {
                return Err(CorrelationError::InvalidOriginSpacing { spacing: 0 });
            }
            _ => {}
        }
        match self.upper {
            Some(u) if !u.is_finite() || u <= 0.0 => {
                Err(CorrelationError::InvalidUpperBound { upper: u })
            }
            _ => Ok(()),
        }
    }
}

impl Default for CorrelationOptions {
    /// 50 evenly spaced origins over the full series duration, per-entity
    /// output, no lag-0 normalization, silent, 1 ms report gating.
    fn default() -> Self {
        CorrelationOptions {
            origins: OriginPolicy::Count(50),
            upper: None,
            average: false,
            normalize_lag0: false,
            verbose: false,
            report_interval: Duration::from_millis(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // A supplied spacing replaces the origin count.
    //
    // Given
    // -----
    // - `n_origins = 10`, `spacing = Some(25)`.
    //
    // Expect
    // ------
    // - `origins == OriginPolicy::Spacing(25)`.
    fn spacing_overrides_count() {
        // Arrange / Act
        let opts = CorrelationOptions::new(10, Some(25), Some(4.0), false).unwrap();

        // Assert
        assert_eq!(opts.origins, OriginPolicy::Spacing(25));
        assert_eq!(opts.upper, Some(4.0));
    }

    #[test]
    fn zero_count_without_spacing_is_rejected() {
        let err = CorrelationOptions::new(0, None, None, false).unwrap_err();
        assert_eq!(err, CorrelationError::InvalidOriginCount { count: 0 });
    }

    #[test]
    fn zero_count_is_fine_when_spacing_given() {
        let opts = CorrelationOptions::new(0, Some(3), None, false).unwrap();
        assert_eq!(opts.origins, OriginPolicy::Spacing(3));
    }

    #[test]
    fn zero_spacing_is_rejected() {
        let err = CorrelationOptions::new(5, Some(0), None, false).unwrap_err();
        assert_eq!(err, CorrelationError::InvalidOriginSpacing { spacing: 0 });
    }

    #[test]
    fn non_positive_upper_is_rejected() {
        for upper in [0.0, -1.0, f64::NAN] {
            let err = CorrelationOptions::new(5, None, Some(upper), false).unwrap_err();
            assert!(matches!(err, CorrelationError::InvalidUpperBound { .. }));
        }
    }

    #[test]
    fn validate_catches_struct_literal_zero_count() {
        let opts = CorrelationOptions { origins: OriginPolicy::Count(0), ..Default::default() };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn default_is_silent_and_unnormalized() {
        let opts = CorrelationOptions::default();
        assert_eq!(opts.origins, OriginPolicy::Count(50));
        assert!(opts.upper.is_none());
        assert!(!opts.average && !opts.normalize_lag0 && !opts.verbose);
    }
}
