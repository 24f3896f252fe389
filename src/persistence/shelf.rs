//! persistence::shelf — JSON-backed key-value store for cached results.
//!
//! Purpose
//! -------
//! Cache computed quantities (correlation functions, histograms, thermo
//! tables) across sessions under `(folder, filename, key)`.
//!
//! Key behaviors
//! -------------
//! - A [`Shelf`] maps string keys to JSON values and is backed by
//!   `<folder>/<filename>.json`. Opening a missing file yields an empty
//!   shelf; the folder is created on first save.
//! - [`Shelf::save`] writes to a `.tmp` sibling and renames it over the
//!   store; readers see either the old or the new file.
//! - The free functions (`save_to_shelf`, `retrieve_from_shelf`, ...) open,
//!   mutate and write back the store within a single call.
//!
//! Conventions
//! -----------
//! - Keys iterate in sorted order.
//! - Values are any `serde` type; decoding into the wrong type is a
//!   [`ShelfError::Decode`], not a panic.
use crate::persistence::errors::{ShelfError, ShelfResult};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Folder used when callers do not pick one.
pub const DEFAULT_SHELF_FOLDER: &str = "shelve";

#[derive(Debug, Clone, PartialEq)]
pub struct Shelf {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl Shelf {
    /// Open `<folder>/<filename>.json`, or start empty if it does not exist.
    ///
    /// Errors
    /// ------
    /// - `ShelfError::Io` if the file exists but cannot be read.
    /// - `ShelfError::Corrupt` if it is not a JSON object.
    pub fn open(folder: impl AsRef<Path>, filename: &str) -> ShelfResult<Self> {
        let path = folder.as_ref().join(format!("{filename}.json"));
        if !path.exists() {
            tracing::debug!(path = %path.display(), "new shelf");
            return Ok(Shelf { path, entries: BTreeMap::new() });
        }
        let text = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let map: Map<String, Value> = serde_json::from_str(&text).map_err(|e| {
            ShelfError::Corrupt { path: path.display().to_string(), message: e.to_string() }
        })?;
        tracing::debug!(path = %path.display(), n_keys = map.len(), "shelf opened");
        Ok(Shelf { path, entries: map.into_iter().collect() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sorted keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Decode the value stored under `key`.
    ///
    /// Errors
    /// ------
    /// - `ShelfError::MissingKey` if `key` is absent.
    /// - `ShelfError::Decode` if the value does not fit `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ShelfResult<T> {
        let value = self.entries.get(key).ok_or_else(|| ShelfError::MissingKey {
            path: self.path.display().to_string(),
            key: key.to_owned(),
        })?;
        T::deserialize(value)
            .map_err(|e| ShelfError::Decode { key: key.to_owned(), message: e.to_string() })
    }

    /// Encode and store `value`, replacing any previous entry. In memory
    /// only until [`Shelf::save`].
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> ShelfResult<()> {
        let encoded = serde_json::to_value(value)
            .map_err(|e| ShelfError::Encode { key: key.to_owned(), message: e.to_string() })?;
        self.entries.insert(key.to_owned(), encoded);
        Ok(())
    }

    /// [`Shelf::set`] for every pair.
    pub fn update<K, T, I>(&mut self, entries: I) -> ShelfResult<()>
    where
        K: AsRef<str>,
        T: Serialize,
        I: IntoIterator<Item = (K, T)>,
    {
        for (key, value) in entries {
            self.set(key.as_ref(), &value)?;
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Decode every entry as `T`.
    pub fn to_map<T: DeserializeOwned>(&self) -> ShelfResult<BTreeMap<String, T>> {
        self.entries.keys().map(|k| self.get(k).map(|v| (k.clone(), v))).collect()
    }

    /// Write the shelf back atomically (`.tmp` then rename).
    pub fn save(&self) -> ShelfResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            ShelfError::Encode { key: String::new(), message: e.to_string() }
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), n_keys = self.entries.len(), "shelf saved");
        Ok(())
    }
}

/// Store one value under `key` in `<folder>/<filename>.json`.
pub fn save_to_shelf<T: Serialize + ?Sized>(
    folder: impl AsRef<Path>, filename: &str, key: &str, value: &T,
) -> ShelfResult<()> {
    let mut shelf = Shelf::open(folder, filename)?;
    shelf.set(key, value)?;
    shelf.save()
}

/// Store every `(key, value)` pair in one write.
pub fn save_map_to_shelf<K, T, I>(
    folder: impl AsRef<Path>, filename: &str, entries: I,
) -> ShelfResult<()>
where
    K: AsRef<str>,
    T: Serialize,
    I: IntoIterator<Item = (K, T)>,
{
    let mut shelf = Shelf::open(folder, filename)?;
    shelf.update(entries)?;
    shelf.save()
}

pub fn retrieve_from_shelf<T: DeserializeOwned>(
    folder: impl AsRef<Path>, filename: &str, key: &str,
) -> ShelfResult<T> {
    Shelf::open(folder, filename)?.get(key)
}

pub fn retrieve_map_from_shelf<T: DeserializeOwned>(
    folder: impl AsRef<Path>, filename: &str,
) -> ShelfResult<BTreeMap<String, T>> {
    Shelf::open(folder, filename)?.to_map()
}

/// Sorted keys of a shelf, each reported at `info` level.
pub fn shelf_keys(folder: impl AsRef<Path>, filename: &str) -> ShelfResult<Vec<String>> {
    let shelf = Shelf::open(folder, filename)?;
    tracing::info!("Keys in file `{filename}`:");
    let keys: Vec<String> = shelf.keys().map(str::to_owned).collect();
    for key in &keys {
        tracing::info!("{key}");
    }
    Ok(keys)
}

// ---- Helper methods ----

fn io_error(path: &Path, err: std::io::Error) -> ShelfError {
    ShelfError::Io { path: path.display().to_string(), message: err.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::CorrelationFunction;
    use ndarray::{Array1, Array2, array};
    use std::collections::HashMap;

    #[test]
    // Purpose
    // -------
    // A value written through one call is read back by another, with the
    // store landing at `<folder>/<filename>.json` and no `.tmp` left over.
    fn save_then_retrieve_round_trips_through_disk() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("shelve");
        let cf = CorrelationFunction::new("msd", Array2::from_elem((4, 2), 0.5), 1).unwrap();

        // Act
        save_to_shelf(&folder, "results", "Ar-120K", &cf).unwrap();
        let back: CorrelationFunction =
            retrieve_from_shelf(&folder, "results", "Ar-120K").unwrap();

        // Assert
        assert_eq!(back, cf);
        assert_eq!(back.average().to_vec(), vec![0.5; 4]);
        assert!(folder.join("results.json").exists());
        assert!(!folder.join("results.json.tmp").exists());
    }

    #[test]
    fn keys_are_sorted_and_later_writes_keep_earlier_entries() {
        let dir = tempfile::tempdir().unwrap();
        save_to_shelf(dir.path(), "db", "zeta", &1.0).unwrap();
        save_map_to_shelf(dir.path(), "db", [("alpha", 2.0), ("mid", 3.0)]).unwrap();

        let keys = shelf_keys(dir.path(), "db").unwrap();
        let map: BTreeMap<String, f64> = retrieve_map_from_shelf(dir.path(), "db").unwrap();

        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
        assert_eq!(map["zeta"], 1.0);
    }

    #[test]
    fn missing_key_and_wrong_type_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        save_to_shelf(dir.path(), "db", "time", &array![0.0, 1.0]).unwrap();

        let missing = retrieve_from_shelf::<f64>(dir.path(), "db", "absent").unwrap_err();
        let wrong = retrieve_from_shelf::<HashMap<String, f64>>(dir.path(), "db", "time");

        assert!(matches!(missing, ShelfError::MissingKey { .. }));
        assert!(matches!(wrong, Err(ShelfError::Decode { .. })));
        let time: Array1<f64> = retrieve_from_shelf(dir.path(), "db", "time").unwrap();
        assert_eq!(time.to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn opening_a_missing_shelf_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let shelf = Shelf::open(dir.path(), "nothing").unwrap();
        assert!(shelf.is_empty());
        assert!(retrieve_map_from_shelf::<f64>(dir.path(), "nothing").unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "[1, 2").unwrap();
        assert!(matches!(Shelf::open(dir.path(), "bad"), Err(ShelfError::Corrupt { .. })));
    }
}
