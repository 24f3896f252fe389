//! correlation — multiple-time-origin correlation kernel and containers.
//!
//! Purpose
//! -------
//! Provide one configurable engine for lag-time correlation and displacement
//! functions of uniformly sampled series. Mean-squared displacement, the
//! normalized stress autocorrelation and the Legendre orientational
//! correlation are all computed by [`correlate`] with a different
//! [`Contribution`].
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries`] normalizes scalar, component and vector inputs to a
//!   single `[frames, entities, components]` layout.
//! - [`CorrelationOptions`] and [`OriginPolicy`] decide which frames act as
//!   time origins and how long the lag window is.
//! - [`correlate`] accumulates per-lag sums and contribution counts,
//!   normalizes them and optionally averages over entities.
//! - [`CorrelationFunction`] / [`CorrelationFunctions`] wrap finished results
//!   under names for scaling and comparison.
//!
//! Invariants & assumptions
//! ------------------------
//! - Origins are evenly spaced over `[0, n_frames)` and always include
//!   frame 0, so every lag in the (clamped) window has at least one
//!   contribution.
//! - Errors are reported through [`CorrelationError`]; nothing in this
//!   subtree panics on user input.
//!
//! Downstream usage
//! ----------------
//! - `analysis` builds [`TimeSeries`] from trajectories and thermo data and
//!   calls [`correlate`]; most callers only need the prelude:
//!
//!   ```rust
//!   use rust_mdtools::correlation::prelude::*;
//!   ```
//!
//! Testing notes
//! -------------
//! - [`origins`] tests the origin layout and window sizing.
//! - [`kernel`] tests the count invariant and hand-computed values for each
//!   contribution variant.
//! - [`function`] tests the non-mutating scalar operators and the cached
//!   average.

pub mod errors;
pub mod function;
pub mod kernel;
pub mod options;
pub mod origins;
pub(crate) mod progress;
pub mod series;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{CorrelationError, CorrelationResult};
pub use self::function::{CorrelationFunction, CorrelationFunctions};
pub use self::kernel::{Contribution, Correlation, LagValues, LegendreOrder, correlate};
pub use self::options::{CorrelationOptions, OriginPolicy};
pub use self::origins::{lag_time_axis, select_origins, window_length};
pub use self::series::TimeSeries;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{CorrelationError, CorrelationResult};
    pub use super::function::{CorrelationFunction, CorrelationFunctions};
    pub use super::kernel::{Contribution, Correlation, LagValues, LegendreOrder, correlate};
    pub use super::options::{CorrelationOptions, OriginPolicy};
    pub use super::series::TimeSeries;
}
