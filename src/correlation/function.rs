//! correlation::function — named correlation-function containers.
//!
//! Purpose
//! -------
//! Hold computed correlation functions (MSD, stress ACF, orientational
//! correlation) together with a name and the axis along which the raw data
//! is averaged, so results from several runs can be collected, scaled into
//! physical units and compared.
//!
//! Key behaviors
//! -------------
//! - [`CorrelationFunction`] owns a raw `Array2<f64>` and computes its
//!   average along the designated axis lazily, caching it on first access.
//! - Multiplying or dividing by a scalar (`&cf * s`, `cf / s`) returns a new
//!   container and leaves the operand untouched; the cached average is not
//!   carried over, it is recomputed from the scaled values.
//! - [`CorrelationFunctions`] keys containers by name in a `BTreeMap` so
//!   iteration order is stable.
//!
//! Invariants & assumptions
//! ------------------------
//! - `average_axis ∈ {0, 1}` and the array has a non-zero length along it,
//!   for constructed and deserialized values alike.
//!
//! Testing notes
//! -------------
//! - Unit tests check that scaling is non-mutating, that division undoes
//!   multiplication, and that the cached average equals a direct
//!   `mean_axis` before and after scaling.
use crate::correlation::{
    errors::{CorrelationError, CorrelationResult},
    kernel::Correlation,
};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::{
    cell::OnceCell,
    collections::{BTreeMap, btree_map},
    ops::{Div, Index, Mul},
};

/// A named raw correlation array with a lazily averaged view.
///
/// Deserialization goes through [`CorrelationFunction::new`], so a stored
/// value with a bad axis is rejected on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCorrelationFunction")]
pub struct CorrelationFunction {
    name: String,
    values: Array2<f64>,
    average_axis: usize,
    #[serde(skip)]
    average: OnceCell<Array1<f64>>,
}

#[derive(Deserialize)]
struct RawCorrelationFunction {
    name: String,
    values: Array2<f64>,
    average_axis: usize,
}

impl TryFrom<RawCorrelationFunction> for CorrelationFunction {
    type Error = CorrelationError;

    fn try_from(raw: RawCorrelationFunction) -> CorrelationResult<Self> {
        CorrelationFunction::new(raw.name, raw.values, raw.average_axis)
    }
}

impl CorrelationFunction {
    /// Wrap `values` under `name`.
    ///
    /// Errors
    /// ------
    /// - `CorrelationError::InvalidAverageAxis` if `average_axis > 1` or the
    ///   array is empty along it.
    pub fn new(
        name: impl Into<String>, values: Array2<f64>, average_axis: usize,
    ) -> CorrelationResult<Self> {
        if average_axis > 1 || values.len_of(Axis(average_axis)) == 0 {
            return Err(CorrelationError::InvalidAverageAxis {
                axis: average_axis,
                shape: values.shape().to_vec(),
            });
        }
        let name = name.into();
        Ok(CorrelationFunction { name, values, average_axis, average: OnceCell::new() })
    }

    /// Lag-major kernel output; the average is taken over entities (axis 1).
    pub fn from_correlation(
        name: impl Into<String>, correlation: Correlation,
    ) -> CorrelationResult<Self> {
        Self::new(name, correlation.into_lag_major(), 1)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn average_axis(&self) -> usize {
        self.average_axis
    }

    /// Mean along `average_axis`, computed once.
    pub fn average(&self) -> &Array1<f64> {
        self.average.get_or_init(|| {
            self.values.mean_axis(Axis(self.average_axis)).unwrap_or_default()
        })
    }

    fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        CorrelationFunction {
            name: self.name.clone(),
            values: self.values.mapv(f),
            average_axis: self.average_axis,
            average: OnceCell::new(),
        }
    }
}

impl PartialEq for CorrelationFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.average_axis == other.average_axis
            && self.values == other.values
    }
}

impl Mul<f64> for &CorrelationFunction {
    type Output = CorrelationFunction;

    fn mul(self, factor: f64) -> CorrelationFunction {
        self.map_values(|v| v * factor)
    }
}

impl Mul<f64> for CorrelationFunction {
    type Output = CorrelationFunction;

    fn mul(self, factor: f64) -> CorrelationFunction {
        &self * factor
    }
}

impl Div<f64> for &CorrelationFunction {
    type Output = CorrelationFunction;

    fn div(self, factor: f64) -> CorrelationFunction {
        self.map_values(|v| v / factor)
    }
}

impl Div<f64> for CorrelationFunction {
    type Output = CorrelationFunction;

    fn div(self, factor: f64) -> CorrelationFunction {
        &self / factor
    }
}

/// Name-keyed collection of [`CorrelationFunction`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFunctions {
    functions: BTreeMap<String, CorrelationFunction>,
}

impl CorrelationFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the function's own name, returning a replaced entry.
    pub fn insert(&mut self, function: CorrelationFunction) -> Option<CorrelationFunction> {
        self.functions.insert(function.name.clone(), function)
    }

    pub fn get(&self, name: &str) -> Option<&CorrelationFunction> {
        self.functions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, CorrelationFunction> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn map_functions(&self, f: impl Fn(&CorrelationFunction) -> CorrelationFunction) -> Self {
        CorrelationFunctions {
            functions: self.functions.iter().map(|(k, v)| (k.clone(), f(v))).collect(),
        }
    }
}

impl FromIterator<CorrelationFunction> for CorrelationFunctions {
    fn from_iter<I: IntoIterator<Item = CorrelationFunction>>(iter: I) -> Self {
        let mut out = CorrelationFunctions::new();
        for function in iter {
            out.insert(function);
        }
        out
    }
}

impl<'a> IntoIterator for &'a CorrelationFunctions {
    type Item = (&'a String, &'a CorrelationFunction);
    type IntoIter = btree_map::Iter<'a, String, CorrelationFunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.functions.iter()
    }
}

impl Index<&str> for CorrelationFunctions {
    type Output = CorrelationFunction;

    fn index(&self, name: &str) -> &CorrelationFunction {
        &self.functions[name]
    }
}

impl Mul<f64> for &CorrelationFunctions {
    type Output = CorrelationFunctions;

    fn mul(self, factor: f64) -> CorrelationFunctions {
        self.map_functions(|f| f * factor)
    }
}

impl Div<f64> for &CorrelationFunctions {
    type Output = CorrelationFunctions;

    fn div(self, factor: f64) -> CorrelationFunctions {
        self.map_functions(|f| f / factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(name: &str, axis: usize) -> CorrelationFunction {
        let values = Array2::from_shape_fn((100, 10), |(i, j)| {
            ((i * 7 + j * 13) % 17) as f64 / 17.0 + 0.01 * i as f64
        });
        CorrelationFunction::new(name, values, axis).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Scaling returns a new container and leaves the original untouched;
    // division undoes multiplication.
    //
    // Given
    // -----
    // - A 100 × 10 function and the factor 0.37.
    //
    // Expect
    // ------
    // - `scaled ≠ original`, `scaled.values == original.values · 0.37`.
    // - `(scaled / 0.37).values ≈ original.values`.
    fn scalar_scaling_is_non_mutating_and_invertible() {
        // Arrange
        let original = sample("msd", 0);
        let snapshot = original.values().clone();

        // Act
        let scaled = &original * 0.37;
        let restored = &scaled / 0.37;

        // Assert
        assert_eq!(original.values(), &snapshot);
        assert_ne!(scaled, original);
        for (s, o) in scaled.values().iter().zip(original.values()) {
            assert_relative_eq!(*s, o * 0.37, epsilon = 1e-15);
        }
        for (r, o) in restored.values().iter().zip(original.values()) {
            assert_relative_eq!(r, o, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The cached average equals a direct mean along the designated axis,
    // also after scaling.
    fn lazy_average_matches_direct_mean_after_scaling() {
        for axis in [0, 1] {
            let original = sample("acf", axis);
            let _ = original.average();
            let scaled = original.clone() * 2.5;

            let direct = scaled.values().mean_axis(Axis(axis)).unwrap();
            assert_eq!(scaled.average().len(), direct.len());
            for (a, d) in scaled.average().iter().zip(direct.iter()) {
                assert_relative_eq!(a, d, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn invalid_axis_is_rejected() {
        let err = CorrelationFunction::new("x", Array2::zeros((3, 2)), 2).unwrap_err();
        assert!(matches!(err, CorrelationError::InvalidAverageAxis { axis: 2, .. }));
    }

    #[test]
    fn collection_scaling_applies_to_every_member() {
        let functions: CorrelationFunctions =
            [sample("a", 0), sample("b", 1)].into_iter().collect();

        let halved = &functions / 2.0;

        assert_eq!(halved.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_relative_eq!(halved["b"].values()[[3, 4]], functions["b"].values()[[3, 4]] / 2.0);
        assert_eq!(functions.len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // A stored function with an out-of-range or empty averaging axis is
    // rejected while loading instead of failing later in `average()`.
    //
    // Given
    // -----
    // - JSON for a 2 × 2 array with `average_axis = 5`.
    // - JSON for a 0 × 2 array averaged along axis 0.
    //
    // Expect
    // ------
    // - Both fail to deserialize; a valid document round-trips.
    fn deserialization_validates_the_average_axis() {
        // Arrange
        let bad_axis = concat!(
            r#"{"name":"x","values":{"v":1,"dim":[2,2],"data":[1,2,3,4]},"#,
            r#""average_axis":5}"#
        );
        let empty = r#"{"name":"x","values":{"v":1,"dim":[0,2],"data":[]},"average_axis":0}"#;
        let good = sample("msd", 1);

        // Act
        let bad_axis = serde_json::from_str::<CorrelationFunction>(bad_axis);
        let empty = serde_json::from_str::<CorrelationFunction>(empty);
        let json = serde_json::to_string(&good).unwrap();
        let reloaded: CorrelationFunction = serde_json::from_str(&json).unwrap();

        // Assert
        let err = bad_axis.unwrap_err().to_string();
        assert!(err.contains("axis 5"), "{err}");
        assert!(empty.is_err());
        assert_eq!(reloaded.name(), "msd");
        assert_eq!(reloaded.average_axis(), 1);
        for (r, g) in reloaded.average().iter().zip(good.average()) {
            assert_relative_eq!(*r, *g, epsilon = 1e-12);
        }
        assert_eq!(reloaded.average().len(), 100);
    }
}
