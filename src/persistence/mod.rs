//! persistence — disk-backed key-value storage for analysis results.
//!
//! Purpose
//! -------
//! Let notebooks and scripts cache expensive results (MSDs, ACFs, density
//! histograms) under `(folder, filename, key)` and reload them in a later
//! session instead of recomputing them.
//!
//! Key behaviors
//! -------------
//! - [`Shelf`] is an in-memory `key → JSON` map tied to one file.
//! - [`save_to_shelf`], [`save_map_to_shelf`], [`retrieve_from_shelf`],
//!   [`retrieve_map_from_shelf`] and [`shelf_keys`] open, use and write back
//!   a shelf within one call.
//!
//! Conventions
//! -----------
//! - Files are `<folder>/<filename>.json`; [`DEFAULT_SHELF_FOLDER`] is
//!   `"shelve"`.
//! - Failures are [`ShelfError`]s; nothing here panics on bad files.

pub mod errors;
pub mod shelf;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ShelfError, ShelfResult};
pub use self::shelf::{
    DEFAULT_SHELF_FOLDER, Shelf, retrieve_from_shelf, retrieve_map_from_shelf, save_map_to_shelf,
    save_to_shelf, shelf_keys,
};
