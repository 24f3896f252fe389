//! analysis::xvg — two-column GROMACS `.xvg` reader.
//!
//! Lines starting with `#` (comments) or `@` (xmgrace directives) are
//! skipped; every other non-blank line must start with two numbers, the
//! time and the value. Further columns are ignored.
use crate::analysis::errors::{AnalysisError, AnalysisResult};
use ndarray::Array1;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// `(time, value)` columns of an `.xvg` stream.
///
/// Errors
/// ------
/// - `AnalysisError::Parse` for a data line without two leading numbers;
///   `line` is 1-based.
/// - `AnalysisError::Io` for read failures.
pub fn read_xvg<R: BufRead>(reader: R) -> AnalysisResult<(Array1<f64>, Array1<f64>)> {
    let mut time = Vec::new();
    let mut value = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('@') {
            continue;
        }
        let mut fields = trimmed.split_whitespace().map(str::parse::<f64>);
        match (fields.next(), fields.next()) {
            (Some(Ok(t)), Some(Ok(v))) => {
                time.push(t);
                value.push(v);
            }
            _ => return Err(AnalysisError::Parse { line: i + 1, content: line.clone() }),
        }
    }
    tracing::debug!(n_samples = time.len(), "xvg parsed");
    Ok((Array1::from(time), Array1::from(value)))
}

/// [`read_xvg`] on a file.
pub fn read_xvg_file<P: AsRef<Path>>(path: P) -> AnalysisResult<(Array1<f64>, Array1<f64>)> {
    let file = File::open(path.as_ref())?;
    read_xvg(BufReader::new(file))
}
