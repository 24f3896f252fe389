//! analysis — MD observables built on the correlation kernel.
//!
//! Purpose
//! -------
//! Provide the user-facing analysis routines: mean-squared displacement,
//! stress autocorrelation, orientational correlation, time-resolved density
//! histograms, thermo table handling and small time-series helpers.
//!
//! Key behaviors
//! -------------
//! - [`msd`], [`stress_acf`] and [`orientational_correlation`] prepare a
//!   [`TimeSeries`](crate::correlation::TimeSeries) and delegate to
//!   [`correlate`](crate::correlation::correlate) with the matching
//!   contribution.
//! - [`density_hist`] consumes trajectory chunks and returns one normalized
//!   histogram row per chunk.
//! - [`extract_numbers`], [`normalize`] and [`ThermoData::window`] cover
//!   thermo output; [`read_xvg`] reads GROMACS two-column files.
//! - [`extract_diffusion`] collects `gmx msd` coefficients per temperature
//!   and [`diffusion_from_xvg`] fits them from an MSD curve.
//! - The `*_from_files` variants route loading through a
//!   [`TrajectoryLoader`](crate::trajectory::TrajectoryLoader).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every routine returns [`AnalysisResult`]; kernel and trajectory errors
//!   are wrapped, not flattened, so callers can match on them.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests on small synthetic systems with
//!   closed-form answers (ballistic MSD, uniform rotation, linear
//!   integrands, LAMMPS log excerpts).

pub mod diffusion;
pub mod errors;
pub mod histogram;
pub mod msd;
pub mod orientation;
pub mod stress;
pub mod thermo;
pub mod timeseries;
pub mod xvg;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::diffusion::{
    diffusion_from_msd, diffusion_from_xvg, extract_diffusion, msd_log_path, read_diffusion_log,
    read_diffusion_log_file,
};
pub use self::errors::{AnalysisError, AnalysisResult};
pub use self::histogram::{
    DensityHistogram, HistogramOptions, density_hist, density_hist_from_files, histogram,
};
pub use self::msd::{msd, msd_from_files};
pub use self::orientation::orientational_correlation;
pub use self::stress::stress_acf;
pub use self::thermo::{ThermoData, extract_numbers, extract_numbers_from_file, normalize};
pub use self::timeseries::{cumulative_average, integrate_series, time_axis, time_axis_like};
pub use self::xvg::{read_xvg, read_xvg_file};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{AnalysisError, AnalysisResult};
    pub use super::histogram::{DensityHistogram, HistogramOptions, density_hist};
    pub use super::msd::msd;
    pub use super::stress::stress_acf;
    pub use super::thermo::{ThermoData, extract_numbers, normalize};
}
