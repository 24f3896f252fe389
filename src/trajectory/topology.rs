//! trajectory::topology — atom metadata and name-based selection.
//!
//! Purpose
//! -------
//! Describe the atoms of a trajectory and resolve selections such as
//! `"all"` or `"Ar Kr"` to atom indices.
//!
//! Conventions
//! -----------
//! - A selection string is either the keyword `all` or a whitespace
//!   separated list of atom names; an atom matches when its name equals any
//!   listed name. Strings starting with `name ` are accepted as well, so
//!   `"name Ar"` and `"Ar"` are equivalent.
//! - Indices are returned in ascending topology order without duplicates.
use crate::trajectory::errors::{TrajectoryError, TrajectoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub name: String,
    pub residue: String,
}

impl Atom {
    pub fn new(name: impl Into<String>, residue: impl Into<String>) -> Self {
        Atom { name: name.into(), residue: residue.into() }
    }
}

/// Ordered atom list shared by every frame of a trajectory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    atoms: Vec<Atom>,
}

impl Topology {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Topology { atoms }
    }

    /// One atom per name, each in its own unnamed residue.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Topology { atoms: names.into_iter().map(|n| Atom::new(n, "")).collect() }
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Indices of atoms matching `selection`.
    ///
    /// Errors
    /// ------
    /// - `TrajectoryError::EmptySelection` if nothing matches.
    pub fn select(&self, selection: &AtomSelection) -> TrajectoryResult<Vec<usize>> {
        let indices: Vec<usize> = match selection {
            AtomSelection::All => (0..self.atoms.len()).collect(),
            AtomSelection::Names(names) => self
                .atoms
                .iter()
                .enumerate()
                .filter(|(_, atom)| names.iter().any(|n| *n == atom.name))
                .map(|(i, _)| i)
                .collect(),
        };
        if indices.is_empty() {
            return Err(TrajectoryError::EmptySelection { selection: selection.to_string() });
        }
        Ok(indices)
    }
}

/// Which atoms an analysis runs over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtomSelection {
    #[default]
    All,
    Names(Vec<String>),
}

impl TryFrom<&str> for AtomSelection {
    type Error = TrajectoryError;

    fn try_from(raw: &str) -> TrajectoryResult<Self> {
        let trimmed = raw.trim();
        if trimmed == "all" {
            return Ok(AtomSelection::All);
        }
        let names: Vec<String> = trimmed
            .strip_prefix("name ")
            .unwrap_or(trimmed)
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        if names.is_empty() {
            return Err(TrajectoryError::InvalidSelection { selection: raw.to_owned() });
        }
        Ok(AtomSelection::Names(names))
    }
}

impl fmt::Display for AtomSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomSelection::All => write!(f, "all"),
            AtomSelection::Names(names) => write!(f, "name {}", names.join(" ")),
        }
    }
}
