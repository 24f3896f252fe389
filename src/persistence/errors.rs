//! persistence::errors — error type for the shelf store.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ShelfResult<T> = Result<T, ShelfError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ShelfError {
    /// Reading, writing or renaming the backing file failed.
    Io { path: String, message: String },

    /// The backing file exists but is not a JSON object.
    Corrupt { path: String, message: String },

    /// A value could not be encoded as JSON.
    Encode { key: String, message: String },

    /// A stored value does not decode into the requested type.
    Decode { key: String, message: String },

    /// No entry under `key`.
    MissingKey { path: String, key: String },
}

impl std::error::Error for ShelfError {}

impl std::fmt::Display for ShelfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShelfError::Io { path, message } => write!(f, "I/O error on shelf {path}: {message}"),
            ShelfError::Corrupt { path, message } => {
                write!(f, "Shelf {path} is not a valid store: {message}")
            }
            ShelfError::Encode { key, message } => {
                write!(f, "Cannot encode value for key {key:?}: {message}")
            }
            ShelfError::Decode { key, message } => {
                write!(f, "Cannot decode value for key {key:?}: {message}")
            }
            ShelfError::MissingKey { path, key } => {
                write!(f, "Key {key:?} not found in shelf {path}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ShelfError> for PyErr {
    fn from(err: ShelfError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
