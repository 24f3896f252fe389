//! trajectory::loader — seam for external trajectory readers.
//!
//! Purpose
//! -------
//! File-format parsing (DCD, XTC, LAMMPS dumps, PDB topologies, ...) is not
//! implemented by this crate. Callers plug a reader in through
//! [`TrajectoryLoader`]; the analysis entry points that take file paths only
//! ever talk to this trait.
//!
//! Key behaviors
//! -------------
//! - [`TrajectoryLoader::load`] materializes a whole trajectory.
//! - [`TrajectoryLoader::iterload`] streams it in chunks of at most `chunk`
//!   frames so memory stays bounded for long runs.
//! - [`load_traj`] wraps `load` with the `tracing` events emitted around
//!   every full load.
use crate::trajectory::{errors::TrajectoryResult, frames::Trajectory, topology::Topology};
use std::{path::Path, sync::Arc};

/// Boxed stream of trajectory chunks.
pub type ChunkStream<'a> = Box<dyn Iterator<Item = TrajectoryResult<Trajectory>> + 'a>;

pub trait TrajectoryLoader {
    /// Read the full trajectory at `path` using the topology file `topology`.
    fn load(&self, path: &Path, topology: &Path) -> TrajectoryResult<Trajectory>;

    /// Read only the topology file.
    fn load_topology(&self, path: &Path) -> TrajectoryResult<Topology>;

    /// Stream `path` in chunks of at most `chunk` frames.
    fn iterload<'a>(
        &'a self, path: &Path, topology: Arc<Topology>, chunk: usize,
    ) -> TrajectoryResult<ChunkStream<'a>>;
}

/// Load a full trajectory, logging before and after.
pub fn load_traj<L: TrajectoryLoader + ?Sized>(
    loader: &L, path: &Path, topology: &Path,
) -> TrajectoryResult<Trajectory> {
    tracing::info!(path = %path.display(), "loading trajectory");
    let traj = loader.load(path, topology)?;
    tracing::info!(
        n_frames = traj.n_frames(),
        n_atoms = traj.n_atoms(),
        timestep = traj.timestep(),
        "trajectory loaded"
    );
    Ok(traj)
}
