//! analysis::orientation — Legendre orientational correlation functions.
//!
//! Computes `C_ℓ(τ) = ⟨P_ℓ(u(t₀) · u(t₀ + τ))⟩` for unit vectors `u` (bond
//! or dipole directions) with every frame used as a time origin. Orders 1
//! and 2 are implemented; anything else is rejected when the order is
//! parsed.
use crate::{
    analysis::errors::AnalysisResult,
    correlation::{
        Contribution, Correlation, CorrelationOptions, LegendreOrder, OriginPolicy, TimeSeries,
        correlate,
    },
};
use ndarray::Array3;

/// Orientational correlation of `[n_frames, n_vectors, 3]` directions.
///
/// Parameters
/// ----------
/// - `vectors`: `Array3<f64>`
///   Directions per frame; callers normalize them to unit length.
/// - `dt`: `f64`
///   Frame spacing.
/// - `order`: [`LegendreOrder`]
/// - `upper`: `Option<f64>`
///   Largest lag time. The window includes the lag at `upper` itself, so
///   `⌊upper / dt⌋ + 1` points are returned (fewer if the series is
///   shorter).
/// - `normalize`: `bool`
///   Divide by the lag-0 value.
///
/// Returns
/// -------
/// The entity-averaged correlation.
pub fn orientational_correlation(
    vectors: Array3<f64>, dt: f64, order: LegendreOrder, upper: Option<f64>, normalize: bool,
) -> AnalysisResult<Correlation> {
    let series = TimeSeries::from_vectors(vectors, dt)?;
    let opts = CorrelationOptions {
        origins: OriginPolicy::Count(series.n_frames()),
        upper: upper.map(|u| u + dt),
        average: true,
        normalize_lag0: normalize,
        ..CorrelationOptions::default()
    };
    Ok(correlate(&series, Contribution::LegendreDot(order), &opts)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Unit vector rotating in the xy-plane by `omega` radians per frame.
    fn rotor(n_frames: usize, omega: f64) -> Array3<f64> {
        Array3::from_shape_fn((n_frames, 1, 3), |(t, _, c)| match c {
            0 => (omega * t as f64).cos(),
            1 => (omega * t as f64).sin(),
            _ => 0.0,
        })
    }

    #[test]
    // Purpose
    // -------
    // For uniform rotation the dot product at lag k is cos(kω), so
    // P₁ = cos(kω) and P₂ = (3cos²(kω) − 1)/2 at every lag.
    fn uniform_rotation_matches_closed_form() {
        // Arrange
        let omega = 0.1;
        let vectors = rotor(50, omega);

        // Act
        let p1 = orientational_correlation(vectors.clone(), 1.0, LegendreOrder::First, None, false)
            .unwrap();
        let p2 =
            orientational_correlation(vectors, 1.0, LegendreOrder::Second, Some(10.0), false)
                .unwrap();

        // Assert
        assert_eq!(p2.n_points(), 11);
        for (k, v) in p1.averaged().iter().enumerate() {
            assert_relative_eq!(*v, (omega * k as f64).cos(), epsilon = 1e-12);
        }
        for (k, v) in p2.averaged().iter().enumerate() {
            let x = (omega * k as f64).cos();
            assert_relative_eq!(*v, 0.5 * (3.0 * x * x - 1.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn normalized_correlation_starts_at_one() {
        let mut vectors = rotor(20, 0.3);
        vectors.mapv_inplace(|v| 0.5 * v);
        let c = orientational_correlation(vectors, 0.1, LegendreOrder::First, None, true).unwrap();
        assert_relative_eq!(c.averaged()[0], 1.0, epsilon = 1e-12);
    }
}
