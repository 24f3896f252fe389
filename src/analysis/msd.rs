//! analysis::msd — mean-squared displacement of selected atoms.
//!
//! Purpose
//! -------
//! Turn a [`Trajectory`] and an [`AtomSelection`] into the squared
//! displacement correlation `⟨|r(t₀ + τ) − r(t₀)|²⟩` computed by the
//! multi-origin kernel.
//!
//! Key behaviors
//! -------------
//! - Resolve the selection against the trajectory topology; an empty
//!   selection fails before any array is copied.
//! - Feed the selected positions as a vector [`TimeSeries`] with the
//!   trajectory timestep as `dt` and run
//!   [`Contribution::SquaredDisplacement`].
//! - [`msd_from_files`] loads the trajectory through a
//!   [`TrajectoryLoader`] first.
//!
//! Conventions
//! -----------
//! - Per-atom output keeps the selection order as entity order.
use crate::{
    analysis::errors::AnalysisResult,
    correlation::{Contribution, Correlation, CorrelationOptions, TimeSeries, correlate},
    trajectory::{AtomSelection, Trajectory, TrajectoryLoader, load_traj},
};
use std::path::Path;

/// Mean-squared displacement of the atoms matching `selection`.
///
/// Parameters
/// ----------
/// - `traj`: [`Trajectory`]
///   Positions and timestep.
/// - `selection`: [`AtomSelection`]
///   Atoms to include, e.g. `AtomSelection::try_from("Ar")`.
/// - `opts`: [`CorrelationOptions`]
///   Origin policy, window and averaging.
///
/// Errors
/// ------
/// - `AnalysisError::Trajectory(EmptySelection)` when nothing matches.
/// - `AnalysisError::Correlation(_)` for kernel failures.
pub fn msd(
    traj: &Trajectory, selection: &AtomSelection, opts: &CorrelationOptions,
) -> AnalysisResult<Correlation> {
    let indices = traj.select(selection)?;
    tracing::debug!(selection = %selection, n_atoms = indices.len(), "msd");
    let positions = traj.positions(&indices)?;
    let series = TimeSeries::from_vectors(positions, traj.timestep())?;
    Ok(correlate(&series, Contribution::SquaredDisplacement, opts)?)
}

/// Load `path` with `loader` and compute its MSD.
pub fn msd_from_files<L: TrajectoryLoader + ?Sized>(
    loader: &L, path: &Path, topology: &Path, selection: &AtomSelection,
    opts: &CorrelationOptions,
) -> AnalysisResult<Correlation> {
    let traj = load_traj(loader, path, topology)?;
    msd(&traj, selection, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::errors::AnalysisError,
        correlation::{LagValues, OriginPolicy},
        trajectory::{Topology, TrajectoryError, loader::testing::InMemoryLoader},
    };
    use approx::assert_relative_eq;
    use ndarray::Array3;

    // Argon drifts along x at 1 Å / frame, krypton sits still.
    fn drifting_mixture(n_frames: usize) -> Trajectory {
        let top = Topology::from_names(["Ar", "Kr", "Ar"]);
        let xyz = Array3::from_shape_fn((n_frames, 3, 3), |(t, a, c)| {
            if a != 1 && c == 0 { t as f64 + a as f64 } else { a as f64 }
        });
        Trajectory::new(xyz, top, 1.0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Ballistic motion at unit speed gives MSD(τ) = τ² exactly, and the
    // selection restricts the entities to the matching atoms.
    //
    // Given
    // -----
    // - 20 frames, two drifting Ar atoms, one fixed Kr atom, dt = 1.
    //
    // Expect
    // ------
    // - Selecting "Ar" yields two entities, each with value k² at lag k.
    fn ballistic_argon_msd_is_quadratic() {
        // Arrange
        let traj = drifting_mixture(20);
        let opts = CorrelationOptions { origins: OriginPolicy::Count(10), ..Default::default() };

        // Act
        let result = msd(&traj, &AtomSelection::try_from("Ar").unwrap(), &opts).unwrap();

        // Assert
        let LagValues::PerEntity(values) = &result.values else { panic!("expected per-entity") };
        assert_eq!(values.ncols(), 2);
        for (k, row) in values.rows().into_iter().enumerate() {
            for &v in row {
                assert_relative_eq!(v, (k * k) as f64, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn fixed_atoms_have_zero_msd() {
        let traj = drifting_mixture(8);
        let opts = CorrelationOptions::new(4, None, None, true).unwrap();
        let result = msd(&traj, &AtomSelection::try_from("Kr").unwrap(), &opts).unwrap();
        assert!(result.averaged().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn missing_atoms_are_reported() {
        let traj = drifting_mixture(4);
        let err =
            msd(&traj, &AtomSelection::try_from("Ne").unwrap(), &CorrelationOptions::default())
                .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Trajectory(TrajectoryError::EmptySelection {
                selection: "name Ne".into()
            })
        );
    }

    #[test]
    fn msd_from_files_goes_through_the_loader() {
        let loader = InMemoryLoader { trajectory: drifting_mixture(6) };
        let opts = CorrelationOptions::new(6, None, Some(3.0), true).unwrap();

        let result = msd_from_files(
            &loader,
            Path::new("run.dcd"),
            Path::new("top.pdb"),
            &AtomSelection::All,
            &opts,
        )
        .unwrap();

        assert_eq!(result.n_points(), 3);
        // lag 1: two atoms moved by 1, one did not
        assert_relative_eq!(result.averaged()[1], 2.0 / 3.0, epsilon = 1e-12);
    }
}
