//! analysis::histogram — time-resolved density histograms.
//!
//! Purpose
//! -------
//! Bin one Cartesian coordinate (z by default) of selected atoms into fixed
//! uniform bins, one histogram row per trajectory chunk, to follow density
//! profiles (interfaces, layering) over time.
//!
//! Key behaviors
//! -------------
//! - Bin edges are `start + i · width` for `i = 0..n_edges`; bins are
//!   half-open `[e_i, e_{i+1})` except the last, which also includes its
//!   right edge. Values outside `[e_0, e_last]` are dropped.
//! - For each chunk, all frames and all selected atoms are binned together
//!   and the counts are divided by the chunk's frame count, giving the mean
//!   number of atoms per bin and frame.
//! - Chunks may come from [`Trajectory::chunks`] or from
//!   [`TrajectoryLoader::iterload`]; the selection is resolved once on the
//!   first chunk's topology.
//!
//! Invariants & assumptions
//! ------------------------
//! - `width > 0`, `n_edges ≥ 2`, `axis < 3`.
//! - The output has exactly one row per chunk; no placeholder rows.
//!
//! Testing notes
//! -------------
//! - Unit tests check the edge/centre layout, the right-closed last bin,
//!   the single-bin property for values sitting on a bin centre, and the
//!   per-chunk normalization by frame count.
use crate::{
    analysis::errors::{AnalysisError, AnalysisResult},
    correlation::progress::LoopProgress,
    trajectory::{AtomSelection, Topology, Trajectory, TrajectoryLoader, TrajectoryResult},
};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc, time::Duration};

/// HistogramOptions — bin layout and coordinate choice.
///
/// Fields
/// ------
/// - `start`: `f64`
///   Left edge of the first bin.
/// - `width`: `f64`
///   Uniform bin width.
/// - `n_edges`: `usize`
///   Number of edges; there are `n_edges − 1` bins.
/// - `axis`: `usize`
///   Coordinate to bin (0 = x, 1 = y, 2 = z).
/// - `verbose`: `bool`
///   Draw a progress spinner over the chunk loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramOptions {
    pub start: f64,
    pub width: f64,
    pub n_edges: usize,
    pub axis: usize,
    pub verbose: bool,
}

impl HistogramOptions {
    /// Errors
    /// ------
    /// - `AnalysisError::InvalidBins` if `width` is not finite and > 0, if
    ///   `start` is not finite, or if `n_edges < 2`.
    /// - `AnalysisError::InvalidAxis` if `axis > 2`.
    pub fn new(start: f64, width: f64, n_edges: usize, axis: usize) -> AnalysisResult<Self> {
        let opts = HistogramOptions { start, width, n_edges, axis, verbose: false };
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn n_bins(&self) -> usize {
        self.n_edges - 1
    }

    pub fn edges(&self) -> Array1<f64> {
        Array1::from_iter((0..self.n_edges).map(|i| self.start + i as f64 * self.width))
    }

    /// Midpoints of consecutive edges.
    pub fn centers(&self) -> Array1<f64> {
        let edges = self.edges();
        let n = self.n_bins();
        (&edges.slice(ndarray::s![1..]) + &edges.slice(ndarray::s![..n])) * 0.5
    }

    fn validate(&self) -> AnalysisResult<()> {
        let HistogramOptions { start, width, n_edges, axis, .. } = *self;
        if !start.is_finite() || !width.is_finite() || width <= 0.0 || n_edges < 2 {
            return Err(AnalysisError::InvalidBins { start, width, n_edges });
        }
        if axis > 2 {
            return Err(AnalysisError::InvalidAxis { axis });
        }
        Ok(())
    }
}

impl Default for HistogramOptions {
    /// 149 bins of 0.1 starting at 0 along z.
    fn default() -> Self {
        HistogramOptions { start: 0.0, width: 0.1, n_edges: 150, axis: 2, verbose: false }
    }
}

/// Chunk-by-bin density rows with their bin centres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityHistogram {
    /// `[n_bins]`
    pub centers: Array1<f64>,
    /// `[n_chunks, n_bins]`
    pub rows: Array2<f64>,
}

impl DensityHistogram {
    pub fn n_chunks(&self) -> usize {
        self.rows.nrows()
    }
}

/// Bin `values` with `opts`' edges, returning raw counts per bin.
pub fn histogram<'a, I>(values: I, opts: &HistogramOptions) -> Array1<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let edges = opts.edges();
    let n_bins = opts.n_bins();
    let last = edges[n_bins];
    let mut counts = Array1::<f64>::zeros(n_bins);
    for &v in values {
        if !(v >= opts.start && v <= last) {
            continue;
        }
        counts[bin_index(v, &edges.view(), opts)] += 1.0;
    }
    counts
}

/// Density histogram over a stream of chunks.
///
/// Parameters
/// ----------
/// - `chunks`: iterator of `TrajectoryResult<Trajectory>`
///   Consecutive trajectory chunks; loader errors are propagated.
/// - `selection`: [`AtomSelection`]
/// - `opts`: [`HistogramOptions`]
///
/// Errors
/// ------
/// - `AnalysisError::InvalidBins` / `InvalidAxis` for bad options.
/// - `AnalysisError::Trajectory(EmptySelection)` if no atom matches.
/// - Any error yielded by the chunk stream.
pub fn density_hist<I>(
    chunks: I, selection: &AtomSelection, opts: &HistogramOptions,
) -> AnalysisResult<DensityHistogram>
where
    I: IntoIterator<Item = TrajectoryResult<Trajectory>>,
{
    opts.validate()?;
    let chunks = chunks.into_iter();
    let expected = chunks.size_hint().1.unwrap_or(0);
    let mut progress =
        LoopProgress::new(expected, "chunks", opts.verbose, Duration::from_millis(1));

    let mut indices: Option<Vec<usize>> = None;
    let mut rows: Vec<Array1<f64>> = Vec::with_capacity(expected);
    let mut first_frame = 0usize;
    for (i, chunk) in chunks.enumerate() {
        let chunk = chunk?;
        let idx = match indices.take() {
            Some(idx) => idx,
            None => chunk.select(selection)?,
        };
        let selected = chunk.positions(&idx)?;
        indices = Some(idx);
        let coordinate = selected.index_axis(Axis(2), opts.axis);
        let counts = histogram(coordinate.iter(), opts);
        rows.push(counts / chunk.n_frames() as f64);

        progress.step(i, first_frame as f64 * chunk.timestep());
        first_frame += chunk.n_frames();
    }
    progress.finish();
    tracing::debug!(n_chunks = rows.len(), n_frames = first_frame, "density histogram");

    let mut out = Array2::<f64>::zeros((rows.len(), opts.n_bins()));
    for (mut target, row) in out.axis_iter_mut(Axis(0)).zip(rows) {
        target.assign(&row);
    }
    Ok(DensityHistogram { centers: opts.centers(), rows: out })
}

/// Stream `path` through `loader` in chunks of `chunk` frames and histogram
/// it. The selection is checked against the topology file before any frame
/// is read.
pub fn density_hist_from_files<L: TrajectoryLoader + ?Sized>(
    loader: &L, path: &Path, topology: &Path, chunk: usize, selection: &AtomSelection,
    opts: &HistogramOptions,
) -> AnalysisResult<DensityHistogram> {
    opts.validate()?;
    let topology: Arc<Topology> = Arc::new(loader.load_topology(topology)?);
    topology.select(selection)?;
    tracing::info!(path = %path.display(), chunk, "streaming trajectory");
    let stream = loader.iterload(path, topology, chunk)?;
    density_hist(stream, selection, opts)
}

// ---- Helper methods ----

/// Bin of an in-range value, with the float corrections numpy applies to
/// uniform bins.
fn bin_index(v: f64, edges: &ArrayView1<f64>, opts: &HistogramOptions) -> usize {
    let n_bins = opts.n_bins();
    let raw = ((v - opts.start) / opts.width).floor();
    let mut idx = if raw < 0.0 { 0 } else { (raw as usize).min(n_bins) };
    if idx == n_bins {
        idx -= 1;
    }
    if v < edges[idx] && idx > 0 {
        idx -= 1;
    } else if idx + 1 < n_bins && v >= edges[idx + 1] {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::loader::testing::InMemoryLoader;
    use approx::assert_relative_eq;
    use ndarray::{Array3, array};

    fn slab(n_frames: usize, z: impl Fn(usize, usize) -> f64) -> Trajectory {
        let top = Topology::from_names(["O", "H", "H"]);
        let xyz = Array3::from_shape_fn((n_frames, 3, 3), |(t, a, c)| {
            if c == 2 { z(t, a) } else { 0.0 }
        });
        Trajectory::new(xyz, top, 10.0).unwrap()
    }

    #[test]
    fn default_layout_has_149_bins_of_width_0_1() {
        let opts = HistogramOptions::default();
        let centers = opts.centers();
        assert_eq!(centers.len(), 149);
        assert_relative_eq!(centers[0], 0.05, epsilon = 1e-12);
        assert_relative_eq!(centers[148], 14.85, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Values on a bin centre all land in that bin; every other bin is zero.
    fn values_on_a_centre_fill_exactly_one_bin() {
        // Arrange
        let opts = HistogramOptions::default();
        let centre = opts.centers()[37];
        let values = vec![centre; 25];

        // Act
        let counts = histogram(values.iter(), &opts);

        // Assert
        assert_eq!(counts[37], 25.0);
        assert_eq!(counts.sum(), 25.0);
    }

    #[test]
    fn last_bin_is_closed_and_outliers_are_dropped() {
        let opts = HistogramOptions::new(0.0, 1.0, 4, 2).unwrap();
        let values = array![-0.1, 0.0, 0.999, 1.0, 2.5, 3.0, 3.0001];
        let counts = histogram(values.iter(), &opts);
        assert_eq!(counts.to_vec(), vec![2.0, 1.0, 2.0]);
    }

    #[test]
    fn invalid_layouts_are_rejected() {
        assert!(matches!(
            HistogramOptions::new(0.0, 0.0, 10, 2),
            Err(AnalysisError::InvalidBins { .. })
        ));
        assert!(matches!(
            HistogramOptions::new(0.0, 0.1, 1, 2),
            Err(AnalysisError::InvalidBins { .. })
        ));
        assert_eq!(
            HistogramOptions::new(0.0, 0.1, 10, 3),
            Err(AnalysisError::InvalidAxis { axis: 3 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Each chunk row is the raw count divided by the chunk's frame count,
    // with one row per chunk and no placeholder row.
    //
    // Given
    // -----
    // - 10 frames of 3 atoms, all at z = 0.25 (centre of bin 2 of a
    //   width-0.1 layout), chunked by 4 → chunk lengths 4, 4, 2.
    //
    // Expect
    // ------
    // - 3 rows; each has 3.0 in bin 2 (3 atoms per frame) and 0 elsewhere.
    fn chunk_rows_are_normalized_by_frame_count() {
        // Arrange
        let traj = slab(10, |_, _| 0.25);
        let opts = HistogramOptions::default();

        // Act
        let hist = density_hist(traj.chunks(4).unwrap(), &AtomSelection::All, &opts).unwrap();

        // Assert
        assert_eq!(hist.n_chunks(), 3);
        for row in hist.rows.rows() {
            assert_relative_eq!(row[2], 3.0, epsilon = 1e-12);
            assert_relative_eq!(row.sum(), 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn selection_restricts_binned_atoms() {
        // O at z = 1.05, hydrogens at z = 2.05
        let traj = slab(6, |_, a| if a == 0 { 1.05 } else { 2.05 });
        let opts = HistogramOptions::default();

        let hist =
            density_hist(traj.chunks(3).unwrap(), &AtomSelection::try_from("H").unwrap(), &opts)
                .unwrap();

        assert!(hist.rows.column(10).iter().all(|&v| v == 0.0));
        assert!(hist.rows.column(20).iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn from_files_rejects_empty_selection_before_streaming() {
        let loader = InMemoryLoader { trajectory: slab(4, |_, _| 0.5) };
        let err = density_hist_from_files(
            &loader,
            Path::new("traj.dcd"),
            Path::new("top.pdb"),
            2,
            &AtomSelection::try_from("Na").unwrap(),
            &HistogramOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::Trajectory(_)));
    }

    #[test]
    fn from_files_streams_every_chunk() {
        let loader = InMemoryLoader { trajectory: slab(9, |t, _| 0.1 * t as f64 + 0.05) };
        let hist = density_hist_from_files(
            &loader,
            Path::new("traj.dcd"),
            Path::new("top.pdb"),
            3,
            &AtomSelection::All,
            &HistogramOptions::default(),
        )
        .unwrap();
        assert_eq!(hist.rows.dim(), (3, 149));
        // chunk 1 holds frames 3..6 → bins 3, 4, 5 with 3 atoms / 3 frames each
        assert_relative_eq!(hist.rows[[1, 4]], 1.0, epsilon = 1e-12);
    }
}
