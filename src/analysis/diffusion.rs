//! analysis::diffusion — diffusion coefficients from MSD output.
//!
//! Purpose
//! -------
//! Collect self-diffusion coefficients across a temperature series, either
//! from the summary that `gmx msd` writes to its log or by fitting the
//! Einstein relation `MSD(t) ≈ 2·d·D·t` to an `.xvg` MSD curve.
//!
//! Key behaviors
//! -------------
//! - [`read_diffusion_log`] takes the value from the first line starting
//!   with `D[`, e.g. `D[        Ar] 2.1834 (+/- 0.0913) 1e-5 cm^2/s`, so
//!   the result keeps the log's unit.
//! - [`extract_diffusion`] maps each temperature to a log path and returns
//!   `(temperatures, D)` in input order.
//! - [`diffusion_from_msd`] is a least-squares slope over an optional time
//!   window divided by `2·d`; the result is in MSD units per time unit.
//!
//! Conventions
//! -----------
//! - [`msd_log_path`] is the `<root>/arkr-simulation-<T>/analysis/msd.log`
//!   layout written by the simulation scripts; pass any other closure to
//!   [`extract_diffusion`] for a different tree.
use crate::analysis::{
    errors::{AnalysisError, AnalysisResult},
    xvg::read_xvg_file,
};
use ndarray::{Array1, ArrayView1};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Diffusion coefficient reported in a `gmx msd` log.
///
/// Errors
/// ------
/// - `AnalysisError::DiffusionNotFound` if no line starts with `D[`.
/// - `AnalysisError::Parse` if that line has no number after `]`.
/// - `AnalysisError::Io` for read failures.
pub fn read_diffusion_log<R: BufRead>(reader: R) -> AnalysisResult<f64> {
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(rest) = line.trim_start().strip_prefix("D[") else {
            continue;
        };
        let value = rest
            .split_once(']')
            .and_then(|(_, tail)| tail.split_whitespace().next())
            .and_then(|token| token.parse::<f64>().ok())
            .filter(|d| d.is_finite());
        return value.ok_or_else(|| AnalysisError::Parse { line: i + 1, content: line.clone() });
    }
    Err(AnalysisError::DiffusionNotFound)
}

/// [`read_diffusion_log`] on a file.
pub fn read_diffusion_log_file<P: AsRef<Path>>(path: P) -> AnalysisResult<f64> {
    let file = File::open(path.as_ref())?;
    read_diffusion_log(BufReader::new(file))
}

/// `<root>/arkr-simulation-<temperature>/analysis/msd.log`.
pub fn msd_log_path(root: &Path, temperature: u32) -> PathBuf {
    root.join(format!("arkr-simulation-{temperature}"))
        .join("analysis")
        .join("msd.log")
}

/// Diffusion coefficient per temperature.
///
/// Parameters
/// ----------
/// - `temperatures`: `&[u32]`
///   Temperatures in the order they should appear in the output.
/// - `log_path`: `Fn(u32) -> PathBuf`
///   Location of the `gmx msd` log for one temperature, e.g.
///   `|t| msd_log_path(root, t)`.
///
/// Returns
/// -------
/// `(temperatures, D)` as `f64` arrays of equal length.
///
/// Errors
/// ------
/// The first [`read_diffusion_log_file`] failure.
pub fn extract_diffusion<F>(
    temperatures: &[u32], log_path: F,
) -> AnalysisResult<(Array1<f64>, Array1<f64>)>
where
    F: Fn(u32) -> PathBuf,
{
    let mut coefficients = Vec::with_capacity(temperatures.len());
    for &temperature in temperatures {
        let path = log_path(temperature);
        tracing::debug!(temperature, path = %path.display(), "reading diffusion coefficient");
        coefficients.push(read_diffusion_log_file(&path)?);
    }
    let temps = Array1::from_iter(temperatures.iter().map(|&t| f64::from(t)));
    Ok((temps, Array1::from(coefficients)))
}

/// Einstein-relation fit `D = slope / (2 · dims)` of `msd` against `time`.
///
/// Parameters
/// ----------
/// - `time`, `msd`: `ArrayView1<f64>`
///   Samples of one MSD curve; must have equal length.
/// - `fit`: `Option<(f64, f64)>`
///   Inclusive time window of the fit; `None` uses every sample.
/// - `dims`: `usize`
///   Dimensionality of the displacement (3 for bulk diffusion).
///
/// Errors
/// ------
/// - `AnalysisError::ShapeMismatch` when the arrays differ in length.
/// - `AnalysisError::InvalidTimeRange` for a reversed or non-finite window.
/// - `AnalysisError::FitWindowTooShort` when fewer than two distinct times
///   fall inside the window, or `dims == 0`.
pub fn diffusion_from_msd(
    time: ArrayView1<f64>, msd: ArrayView1<f64>, fit: Option<(f64, f64)>, dims: usize,
) -> AnalysisResult<f64> {
    if time.len() != msd.len() {
        return Err(AnalysisError::ShapeMismatch {
            expected: time.shape().to_vec(),
            actual: msd.shape().to_vec(),
        });
    }
    if let Some((min, max)) = fit {
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(AnalysisError::InvalidTimeRange { min, max });
        }
    }
    let inside = |t: f64| fit.is_none_or(|(min, max)| t >= min && t <= max);
    let points: Vec<(f64, f64)> = time
        .iter()
        .zip(msd.iter())
        .filter(|&(&t, &m)| inside(t) && t.is_finite() && m.is_finite())
        .map(|(&t, &m)| (t, m))
        .collect();

    let n = points.len() as f64;
    let t_mean = points.iter().map(|p| p.0).sum::<f64>() / n;
    let m_mean = points.iter().map(|p| p.1).sum::<f64>() / n;
    let s_tt: f64 = points.iter().map(|p| (p.0 - t_mean).powi(2)).sum();
    let s_tm: f64 = points.iter().map(|p| (p.0 - t_mean) * (p.1 - m_mean)).sum();
    if points.len() < 2 || s_tt <= 0.0 || dims == 0 {
        return Err(AnalysisError::FitWindowTooShort { n_samples: points.len() });
    }
    let slope = s_tm / s_tt;
    tracing::debug!(n_samples = points.len(), slope, dims, "einstein fit");
    Ok(slope / (2 * dims) as f64)
}

/// Read an `.xvg` MSD curve and fit it in three dimensions.
pub fn diffusion_from_xvg<P: AsRef<Path>>(
    path: P, fit: Option<(f64, f64)>,
) -> AnalysisResult<f64> {
    let (time, msd) = read_xvg_file(path)?;
    diffusion_from_msd(time.view(), msd.view(), fit, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;
    use std::{fs, io::Cursor};

    const MSD_LOG: &str = "\
                      :-) GROMACS - gmx msd, 2020.4 (-:

Command line:
  gmx msd -f traj.xtc -s topol.tpr -o msd.xvg

Reading frame       0 time    0.000
Last frame       2000 time 2000.000

Fitting from 200 to 1800 ps

D[        Ar] 2.1834 (+/- 0.0913) 1e-5 cm^2/s
";

    fn write_log(root: &Path, temperature: u32, d: f64) {
        let path = msd_log_path(root, temperature);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let body = format!("Fitting from 200 to 1800 ps\n\nD[ Ar] {d} (+/- 0.01) 1e-5 cm^2/s\n");
        fs::write(path, body).unwrap();
    }

    #[test]
    fn log_summary_line_is_read() {
        let d = read_diffusion_log(Cursor::new(MSD_LOG)).unwrap();
        assert_relative_eq!(d, 2.1834);
    }

    #[test]
    fn missing_or_malformed_summary_is_an_error() {
        let err = read_diffusion_log(Cursor::new("Fitting from 200 to 1800 ps\n")).unwrap_err();
        assert_eq!(err, AnalysisError::DiffusionNotFound);
        let err = read_diffusion_log(Cursor::new("D[ Ar] nan\n")).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { line: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // One coefficient per temperature is read from the simulation tree in
    // the order the temperatures are given.
    //
    // Given
    // -----
    // - Logs for 120 K and 90 K under a temporary root.
    //
    // Expect
    // ------
    // - `([120, 90], [3.5, 1.25])`, and a missing temperature is an I/O error.
    fn coefficients_follow_temperature_order() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        write_log(dir.path(), 90, 1.25);
        write_log(dir.path(), 120, 3.5);

        // Act
        let (temps, d) = extract_diffusion(&[120, 90], |t| msd_log_path(dir.path(), t)).unwrap();
        let missing = extract_diffusion(&[150], |t| msd_log_path(dir.path(), t));

        // Assert
        assert_eq!(temps.to_vec(), vec![120.0, 90.0]);
        assert_eq!(d.to_vec(), vec![3.5, 1.25]);
        assert!(matches!(missing, Err(AnalysisError::Io { .. })));
    }

    #[test]
    // Purpose
    // -------
    // The Einstein fit recovers `D` from an MSD that is linear inside the
    // window and distorted outside it.
    fn einstein_fit_uses_the_window() {
        // Arrange: MSD = 6·D·t with D = 0.25 for t ≥ 2, ballistic before.
        let time = Array1::from_iter((0..21).map(|i| i as f64 * 0.5));
        let msd = time.mapv(|t| if t < 2.0 { t * t } else { 1.5 * t });

        // Act
        let d = diffusion_from_msd(time.view(), msd.view(), Some((2.0, 10.0)), 3).unwrap();

        // Assert
        assert_relative_eq!(d, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_fits_are_rejected() {
        let time = Array1::from(vec![0.0, 1.0, 2.0]);
        let msd = Array1::from(vec![0.0, 6.0, 12.0]);
        let short = Array1::from(vec![0.0, 6.0]);
        assert!(matches!(
            diffusion_from_msd(time.view(), short.view(), None, 3),
            Err(AnalysisError::ShapeMismatch { .. })
        ));
        assert_eq!(
            diffusion_from_msd(time.view(), msd.view(), Some((0.5, 1.5)), 3).unwrap_err(),
            AnalysisError::FitWindowTooShort { n_samples: 1 }
        );
        assert!(matches!(
            diffusion_from_msd(time.view(), msd.view(), Some((2.0, 1.0)), 3),
            Err(AnalysisError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn xvg_curve_is_fitted_in_three_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msd.xvg");
        let mut body = String::from("# gmx msd\n@    title \"Mean Square Displacement\"\n");
        for i in 0..11 {
            let t = i as f64 * 10.0;
            body.push_str(&format!("{t} {}\n", 0.06 * t));
        }
        fs::write(&path, body).unwrap();

        let d = diffusion_from_xvg(&path, None).unwrap();

        assert_relative_eq!(d, 0.01, epsilon = 1e-12);
    }
}
