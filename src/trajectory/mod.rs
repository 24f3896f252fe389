//! trajectory — particle positions, topologies and the loader seam.
//!
//! Purpose
//! -------
//! Give the analysis routines a validated, in-memory view of an MD
//! trajectory and a trait through which callers supply their own file
//! readers.
//!
//! Key behaviors
//! -------------
//! - [`Topology`] and [`AtomSelection`] resolve `"all"` / name selections to
//!   atom indices; empty selections are errors.
//! - [`Trajectory`] holds `[n_frames, n_atoms, 3]` positions with a uniform
//!   timestep and splits itself into chunks.
//! - [`TrajectoryLoader`] abstracts full and chunked loading from disk.
//!
//! Downstream usage
//! ----------------
//! - `analysis::msd` and `analysis::histogram` consume [`Trajectory`] values
//!   and chunk streams produced here.

pub mod errors;
pub mod frames;
pub mod loader;
pub mod topology;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{TrajectoryError, TrajectoryResult};
pub use self::frames::{Chunks, Trajectory};
pub use self::loader::{ChunkStream, TrajectoryLoader, load_traj};
pub use self::topology::{Atom, AtomSelection, Topology};
