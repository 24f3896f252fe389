//! trajectory::frames — in-memory trajectories and chunk iteration.
//!
//! Purpose
//! -------
//! Hold particle positions `[n_frames, n_atoms, 3]` with their topology and
//! frame spacing, and hand them out in bounded chunks so histogramming code
//! can treat an in-memory trajectory exactly like a streamed one.
//!
//! Invariants & assumptions
//! ------------------------
//! - `xyz.dim() == (n_frames, topology.n_atoms(), 3)` with `n_frames ≥ 1`.
//! - `timestep` is finite and > 0; positions are finite.
//! - The topology sits behind an `Arc` so chunks share it.
use crate::trajectory::{
    errors::{TrajectoryError, TrajectoryResult},
    topology::{AtomSelection, Topology},
};
use ndarray::{Array3, ArrayView3, Axis, s};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    xyz: Array3<f64>,
    topology: Arc<Topology>,
    timestep: f64,
}

impl Trajectory {
    /// Validate and wrap positions.
    ///
    /// Errors
    /// ------
    /// - `TrajectoryError::InvalidTimestep` for a non-finite or ≤ 0 step.
    /// - `TrajectoryError::ShapeMismatch` unless the array is
    ///   `[n_frames ≥ 1, topology.n_atoms(), 3]`.
    /// - `TrajectoryError::NonFinitePosition` for the first NaN/±inf entry.
    pub fn new(
        xyz: Array3<f64>, topology: impl Into<Arc<Topology>>, timestep: f64,
    ) -> TrajectoryResult<Self> {
        let topology = topology.into();
        if !timestep.is_finite() || timestep <= 0.0 {
            return Err(TrajectoryError::InvalidTimestep { timestep });
        }
        let (n_frames, n_atoms, n_dims) = xyz.dim();
        if n_frames == 0 || n_atoms != topology.n_atoms() || n_dims != 3 {
            return Err(TrajectoryError::ShapeMismatch {
                expected: format!("[n_frames >= 1, {}, 3]", topology.n_atoms()),
                actual: xyz.shape().to_vec(),
            });
        }
        for ((frame, atom, _), v) in xyz.indexed_iter() {
            if !v.is_finite() {
                return Err(TrajectoryError::NonFinitePosition { frame, atom });
            }
        }
        Ok(Trajectory { xyz, topology, timestep })
    }

    pub fn n_frames(&self) -> usize {
        self.xyz.dim().0
    }

    pub fn n_atoms(&self) -> usize {
        self.xyz.dim().1
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn xyz(&self) -> ArrayView3<'_, f64> {
        self.xyz.view()
    }

    /// Indices matching `selection`; see [`Topology::select`].
    pub fn select(&self, selection: &AtomSelection) -> TrajectoryResult<Vec<usize>> {
        self.topology.select(selection)
    }

    /// Positions of the given atoms, `[n_frames, indices.len(), 3]`.
    pub fn positions(&self, indices: &[usize]) -> TrajectoryResult<Array3<f64>> {
        let n_atoms = self.n_atoms();
        if let Some(&index) = indices.iter().find(|&&i| i >= n_atoms) {
            return Err(TrajectoryError::AtomIndexOutOfRange { index, n_atoms });
        }
        Ok(self.xyz.select(Axis(1), indices))
    }

    /// Split into consecutive chunks of at most `chunk` frames.
    ///
    /// Items are `TrajectoryResult`s so that in-memory and streamed chunks
    /// (see [`TrajectoryLoader::iterload`](crate::trajectory::TrajectoryLoader::iterload))
    /// feed the same consumers. In-memory chunking itself never fails.
    pub fn chunks(&self, chunk: usize) -> TrajectoryResult<Chunks<'_>> {
        if chunk == 0 {
            return Err(TrajectoryError::InvalidChunkSize { chunk });
        }
        Ok(Chunks { source: self, chunk, next: 0 })
    }
}

/// Iterator returned by [`Trajectory::chunks`].
#[derive(Debug)]
pub struct Chunks<'a> {
    source: &'a Trajectory,
    chunk: usize,
    next: usize,
}

impl Iterator for Chunks<'_> {
    type Item = TrajectoryResult<Trajectory>;

    fn next(&mut self) -> Option<Self::Item> {
        let n_frames = self.source.n_frames();
        if self.next >= n_frames {
            return None;
        }
        let end = (self.next + self.chunk).min(n_frames);
        let xyz = self.source.xyz.slice(s![self.next..end, .., ..]).to_owned();
        self.next = end;
        Some(Ok(Trajectory {
            xyz,
            topology: Arc::clone(&self.source.topology),
            timestep: self.source.timestep,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.n_frames().saturating_sub(self.next).div_ceil(self.chunk);
        (remaining, Some(remaining))
    }
}
