//! trajectory::errors — error type for trajectory containers and loaders.
//!
//! Conventions
//! -----------
//! - Loader failures carry the offending path and the loader's own message
//!   as text so the enum stays `Clone + PartialEq`.
//! - With `python-bindings`, every variant maps to `ValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type TrajectoryResult<T> = Result<T, TrajectoryError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    // ---- Topology / selection ----
    /// The selection matched no atom.
    EmptySelection { selection: String },

    /// A selection string could not be parsed.
    InvalidSelection { selection: String },

    /// Atom index outside the topology.
    AtomIndexOutOfRange { index: usize, n_atoms: usize },

    // ---- Frame data ----
    /// Position array is not `[n_frames, n_atoms, 3]` for the topology.
    ShapeMismatch { expected: String, actual: Vec<usize> },

    /// The frame spacing is non-positive or non-finite.
    InvalidTimestep { timestep: f64 },

    /// A position is NaN/±inf.
    NonFinitePosition { frame: usize, atom: usize },

    /// Chunks must hold at least one frame.
    InvalidChunkSize { chunk: usize },

    // ---- Loading ----
    /// The external loader failed for `path`.
    Load { path: String, message: String },
}

impl std::error::Error for TrajectoryError {}

impl std::fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Topology / selection ----
            TrajectoryError::EmptySelection { selection } => {
                write!(f, "No atoms with {selection}")
            }
            TrajectoryError::InvalidSelection { selection } => {
                write!(f, "Invalid atom selection: {selection:?}")
            }
            TrajectoryError::AtomIndexOutOfRange { index, n_atoms } => {
                write!(f, "Atom index {index} out of range for {n_atoms} atoms")
            }
            // ---- Frame data ----
            TrajectoryError::ShapeMismatch { expected, actual } => {
                write!(f, "Expected positions of shape {expected}; got: {actual:?}")
            }
            TrajectoryError::InvalidTimestep { timestep } => {
                write!(f, "Timestep must be finite and > 0; got: {timestep}")
            }
            TrajectoryError::NonFinitePosition { frame, atom } => {
                write!(f, "Non-finite position for atom {atom} in frame {frame}")
            }
            TrajectoryError::InvalidChunkSize { chunk } => {
                write!(f, "Chunk size must be >= 1 frame; got: {chunk}")
            }
            // ---- Loading ----
            TrajectoryError::Load { path, message } => {
                write!(f, "Failed to load {path}: {message}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<TrajectoryError> for PyErr {
    fn from(err: TrajectoryError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_names_the_selection() {
        let msg = TrajectoryError::EmptySelection { selection: "name Xe".into() }.to_string();
        assert_eq!(msg, "No atoms with name Xe");
    }

    #[test]
    fn load_error_embeds_path_and_message() {
        let err = TrajectoryError::Load { path: "run.dcd".into(), message: "truncated".into() };
        let msg = err.to_string();
        assert!(msg.contains("run.dcd") && msg.contains("truncated"), "Got: {msg}");
    }
}
