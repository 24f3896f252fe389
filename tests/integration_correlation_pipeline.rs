//! Integration tests for the trajectory → correlation → shelf → figure
//! pipeline.
//!
//! Purpose
//! -------
//! - Validate that the public modules compose the way an analysis script
//!   uses them: build a trajectory, compute MSD and density histograms,
//!   cache the results on a shelf, reload them, and draw them.
//!
//! Coverage
//! --------
//! - `analysis::msd` and `analysis::density_hist` on an in-memory
//!   trajectory with a known drift.
//! - `analysis::stress_acf` followed by `analysis::integrate_series`.
//! - `persistence` round trip of a `CorrelationFunction` and a
//!   `DensityHistogram`, then scalar scaling of the reloaded function.
//! - `plotting::plot_all` and `plotting::plot_density` writing SVG files.
//!
//! Exclusions
//! ----------
//! - Kernel edge cases, option validation and plot layout details; those
//!   are covered by unit tests inside each module.
//! - Python bindings.
use approx::assert_relative_eq;
use ndarray::{Array2, Array3};
use rust_mdtools::{
    analysis::{
        DensityHistogram, HistogramOptions, density_hist, integrate_series, msd, stress_acf,
    },
    correlation::{CorrelationFunction, CorrelationOptions},
    persistence::{Shelf, retrieve_from_shelf, save_to_shelf},
    plotting::{DensityPlot, ImageFormat, LinePlot, PlotStyle, Series, plot_all, plot_density},
    trajectory::{AtomSelection, Topology, Trajectory},
};

/// Purpose
/// -------
/// Two argon atoms drifting along x at 1 Å per frame and one static
/// krypton atom, each at a fixed height in z.
///
/// Returns
/// -------
/// - A `Trajectory` with `n_frames` frames, `dt = 1`, and z heights
///   `2.5`, `7.5`, `5.5` for atoms 0, 1, 2.
fn drifting_box(n_frames: usize) -> Trajectory {
    let heights = [2.5, 7.5, 5.5];
    let xyz = Array3::from_shape_fn((n_frames, 3, 3), |(t, a, c)| match (a, c) {
        (0 | 1, 0) => t as f64,
        (_, 2) => heights[a],
        _ => a as f64,
    });
    Trajectory::new(xyz, Topology::from_names(["Ar", "Ar", "Kr"]), 1.0).unwrap()
}

#[test]
// Purpose
// -------
// MSD of uniformly drifting atoms is the squared lag time, and it survives
// a shelf round trip as a `CorrelationFunction`.
//
// Given
// -----
// - The argon atoms of `drifting_box(30)` and five origins over a 10-frame
//   window.
//
// Expect
// ------
// - `msd(τ) = τ²` at every lag.
// - The reloaded function equals the stored one and scales by `/ 6`.
fn msd_is_cached_and_rescaled() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let traj = drifting_box(30);
    let selection = AtomSelection::try_from("Ar").unwrap();
    let opts = CorrelationOptions::new(5, None, Some(10.0), true).unwrap();

    // Act
    let result = msd(&traj, &selection, &opts).unwrap();
    let time = result.time.clone();
    let function = CorrelationFunction::from_correlation("msd_Ar", result).unwrap();
    save_to_shelf(dir.path(), "results", "msd_Ar", &function).unwrap();
    let reloaded: CorrelationFunction =
        retrieve_from_shelf(dir.path(), "results", "msd_Ar").unwrap();
    let diffusion = &reloaded / 6.0;

    // Assert
    assert!(time.len() > 1);
    for (&t, &v) in time.iter().zip(reloaded.average()) {
        assert_relative_eq!(v, t * t, epsilon = 1e-10);
    }
    assert_eq!(reloaded, function);
    assert_eq!(diffusion.name(), "msd_Ar");
    for (&a, &b) in diffusion.average().iter().zip(function.average()) {
        assert_relative_eq!(a * 6.0, b, epsilon = 1e-10);
    }
}

#[test]
// Purpose
// -------
// Density rows count atoms per frame in each z bin for every chunk.
//
// Given
// -----
// - `drifting_box(20)` split into 4 chunks of 5 frames, ten 1 Å bins.
//
// Expect
// ------
// - Every row holds 1 in the bins at 2.5 and 7.5 for argon only, and the
//   histogram reloads unchanged from the shelf.
fn density_rows_track_fixed_heights() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let traj = drifting_box(20);
    let selection = AtomSelection::try_from("Ar").unwrap();
    let opts = HistogramOptions::new(0.0, 1.0, 11, 2).unwrap();

    // Act
    let hist = density_hist(traj.chunks(5).unwrap(), &selection, &opts).unwrap();
    let mut shelf = Shelf::open(dir.path(), "density").unwrap();
    shelf.set("Ar", &hist).unwrap();
    shelf.save().unwrap();
    let reloaded: DensityHistogram = retrieve_from_shelf(dir.path(), "density", "Ar").unwrap();

    // Assert
    assert_eq!(hist.rows.dim(), (4, 10));
    for row in hist.rows.rows() {
        assert_relative_eq!(row[2], 1.0);
        assert_relative_eq!(row[7], 1.0);
        assert_relative_eq!(row[5], 0.0);
        assert_relative_eq!(row.sum(), 2.0);
    }
    assert_eq!(reloaded, hist);
}

#[test]
// Purpose
// -------
// The normalized stress ACF starts at one and its running integral starts
// at zero with one value per lag.
fn stress_acf_feeds_the_running_integral() {
    // Arrange
    let n = 80;
    let tensors = Array2::from_shape_fn((n, 3), |(t, c)| {
        (0.15 * t as f64 * (c + 1) as f64).cos() + 0.05 * c as f64
    });
    let opts = CorrelationOptions::new(n, None, Some(20.0), true).unwrap();

    // Act
    let acf = stress_acf(tensors, 0.5, true, &opts).unwrap();
    let averaged = acf.averaged();
    let integral =
        integrate_series(averaged.view(), Some(acf.time.view()), 2.0, 1.0, None).unwrap();

    // Assert
    assert_relative_eq!(averaged[0], 1.0, epsilon = 1e-10);
    assert_eq!(integral.len(), averaged.len());
    assert_relative_eq!(integral[0], 0.0);
    let first_step = 2.0 * 0.5 * (averaged[0] + averaged[1]) * (acf.time[1] - acf.time[0]);
    assert_relative_eq!(integral[1], first_step, epsilon = 1e-10);
}

#[test]
// Purpose
// -------
// Results computed here render to the configured output folder.
//
// Given
// -----
// - The argon MSD curve and the argon density histogram.
//
// Expect
// ------
// - `msd.svg` and `density.svg` exist and the line plot carries its labels.
fn results_are_drawn_to_the_output_folder() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut style = PlotStyle::default();
    style.set_output_folder(dir.path());
    let traj = drifting_box(30);
    let selection = AtomSelection::try_from("Ar").unwrap();
    let opts = CorrelationOptions::new(5, None, Some(10.0), true).unwrap();
    let result = msd(&traj, &selection, &opts).unwrap();
    let time = result.time.clone();
    let function = CorrelationFunction::from_correlation("Ar", result).unwrap();
    let hist = density_hist(
        traj.chunks(10).unwrap(),
        &selection,
        &HistogramOptions::new(0.0, 1.0, 11, 2).unwrap(),
    )
    .unwrap();

    // Act
    let line = LinePlot::new()
        .with_labels("Time [ps]", "MSD [Å²]")
        .saved_as("msd", ImageFormat::Svg);
    let series = [Series::from_function(&function, time).unwrap()];
    let figure = plot_all(&series, &line, &style).unwrap();
    let density = DensityPlot {
        d_time: 10.0,
        d_dist: 1.0,
        filename: Some("density".into()),
        save: true,
        ..DensityPlot::default()
    };
    plot_density(hist.rows.view(), &density, &style).unwrap();

    // Assert
    assert!(figure.svg().contains("Time [ps]"));
    assert_eq!(figure.saved_to(), Some(dir.path().join("msd.svg").as_path()));
    assert!(dir.path().join("msd.svg").exists());
    assert!(dir.path().join("density.svg").exists());
}
