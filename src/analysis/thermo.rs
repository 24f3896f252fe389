//! analysis::thermo — thermodynamic output tables.
//!
//! Purpose
//! -------
//! Parse column-oriented thermo output (LAMMPS `log.lammps` blocks and
//! similar whitespace tables) into labelled series, restrict them to a time
//! range, and normalize extensive quantities by system size.
//!
//! Key behaviors
//! -------------
//! - [`extract_numbers`] finds the first line containing an identifier
//!   (e.g. `"Step"`), uses its whitespace-separated words as labels, and
//!   parses the rows after it. Rows with the wrong number of fields, a
//!   non-numeric field or a NaN are dropped, so trailing text such as
//!   `Loop time of ...` never ends up in the data.
//! - [`normalize`] returns a copy in which every series whose label contains
//!   `"Eng"` or one of the extra keywords is divided by the system size.
//! - [`ThermoData::window`] keeps the rows whose time lies in `[min, max]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All series in a [`ThermoData`] have the same length.
//! - Labels keep the order of the header line.
use crate::analysis::errors::{AnalysisError, AnalysisResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Labelled, equally long numeric series in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThermoData {
    labels: Vec<String>,
    series: HashMap<String, Array1<f64>>,
}

impl ThermoData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a series; a new label is appended to the order.
    pub fn insert(
        &mut self, label: impl Into<String>, values: Array1<f64>,
    ) -> Option<Array1<f64>> {
        let label = label.into();
        if !self.series.contains_key(&label) {
            self.labels.push(label.clone());
        }
        self.series.insert(label, values)
    }

    /// Errors
    /// ------
    /// - `AnalysisError::MissingLabel` if `label` is absent.
    pub fn get(&self, label: &str) -> AnalysisResult<&Array1<f64>> {
        self.series.get(label).ok_or_else(|| AnalysisError::MissingLabel { label: label.into() })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of samples per series.
    pub fn n_rows(&self) -> usize {
        self.labels.first().and_then(|l| self.series.get(l)).map_or(0, Array1::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<f64>)> {
        self.labels.iter().filter_map(|l| self.series.get(l).map(|v| (l.as_str(), v)))
    }

    /// Rows whose `label_t` value lies in `xlim = (min, max)`, inclusive.
    /// `None` keeps every row.
    ///
    /// Errors
    /// ------
    /// - `AnalysisError::MissingLabel` if `label_t` is absent.
    /// - `AnalysisError::InvalidTimeRange` for non-finite bounds or
    ///   `min > max`.
    pub fn window(&self, label_t: &str, xlim: Option<(f64, f64)>) -> AnalysisResult<ThermoData> {
        let time = self.get(label_t)?;
        let Some((min, max)) = xlim else {
            return Ok(self.clone());
        };
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(AnalysisError::InvalidTimeRange { min, max });
        }
        let keep: Vec<usize> = time
            .iter()
            .enumerate()
            .filter(|(_, t)| (min..=max).contains(*t))
            .map(|(i, _)| i)
            .collect();
        let mut out = ThermoData::new();
        for (label, values) in self.iter() {
            out.insert(label, keep.iter().map(|&i| values[i]).collect());
        }
        Ok(out)
    }
}

/// Parse a thermo table from `reader`.
///
/// Parameters
/// ----------
/// - `reader`: `impl BufRead`
///   Text positioned anywhere before the header line.
/// - `identifier`: `&str`
///   Substring that marks the header line, e.g. `"Step"`.
/// - `columns`: `Option<&[usize]>`
///   Header columns to keep; `None` keeps all. Each kept column is stored
///   under its own header label. Rows are dropped for NaN in the kept
///   columns only.
///
/// Errors
/// ------
/// - `AnalysisError::IdentifierNotFound` if no line contains `identifier`.
/// - `AnalysisError::ColumnOutOfRange` for a column past the header.
/// - `AnalysisError::Io` for read failures.
pub fn extract_numbers<R: BufRead>(
    reader: R, identifier: &str, columns: Option<&[usize]>,
) -> AnalysisResult<ThermoData> {
    let mut lines = reader.lines();
    let labels: Vec<String> = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if line.contains(identifier) {
                    break line.split_whitespace().map(str::to_owned).collect();
                }
            }
            None => {
                return Err(AnalysisError::IdentifierNotFound { identifier: identifier.into() });
            }
        }
    };
    let n_labels = labels.len();
    let selected: Vec<usize> = match columns {
        Some(cols) => {
            if let Some(&column) = cols.iter().find(|&&c| c >= n_labels) {
                return Err(AnalysisError::ColumnOutOfRange { column, n_labels });
            }
            cols.to_vec()
        }
        None => (0..n_labels).collect(),
    };

    let mut table: Vec<Vec<f64>> = vec![Vec::new(); selected.len()];
    let mut dropped = 0usize;
    for line in lines {
        let line = line?;
        let content = line.split('#').next().unwrap_or("");
        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != n_labels {
            dropped += 1;
            continue;
        }
        let row: Option<Vec<f64>> = selected
            .iter()
            .map(|&c| fields[c].parse::<f64>().ok().filter(|v| !v.is_nan()))
            .collect();
        match row {
            Some(row) => {
                for (column, value) in table.iter_mut().zip(row) {
                    column.push(value);
                }
            }
            None => dropped += 1,
        }
    }
    tracing::debug!(
        identifier,
        n_series = selected.len(),
        n_rows = table.first().map_or(0, Vec::len),
        dropped,
        "thermo table parsed"
    );

    let mut data = ThermoData::new();
    for (&c, column) in selected.iter().zip(table) {
        data.insert(labels[c].clone(), Array1::from(column));
    }
    Ok(data)
}

/// [`extract_numbers`] on a file.
pub fn extract_numbers_from_file<P: AsRef<Path>>(
    path: P, identifier: &str, columns: Option<&[usize]>,
) -> AnalysisResult<ThermoData> {
    let file = File::open(path.as_ref())?;
    extract_numbers(BufReader::new(file), identifier, columns)
}

/// Divide size-dependent series (labels containing `"Eng"` or any of
/// `extra_keywords`) by `size`, returning a new table.
///
/// Errors
/// ------
/// - `AnalysisError::InvalidSystemSize` if `size` is not finite and > 0.
pub fn normalize(
    data: &ThermoData, size: f64, extra_keywords: &[&str],
) -> AnalysisResult<ThermoData> {
    if !size.is_finite() || size <= 0.0 {
        return Err(AnalysisError::InvalidSystemSize { size });
    }
    let mut normalized = data.clone();
    for label in data.labels() {
        let extensive =
            label.contains("Eng") || extra_keywords.iter().any(|kw| label.contains(kw));
        if extensive {
            if let Some(values) = normalized.series.get_mut(label) {
                values.mapv_inplace(|v| v / size);
            }
        }
    }
    Ok(normalized)
}
