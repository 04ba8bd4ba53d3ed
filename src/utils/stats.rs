//! Statistical helpers.

use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard normal critical value for a central interval of `level`.
///
/// `level` is the coverage, e.g. `0.95` gives ≈1.96 and `0.80` gives ≈1.28.
/// Levels outside (0, 1) yield `0.0` (no interval) or infinity.
///
/// # Example
/// ```
/// use kpi_forecast::utils::stats::z_score;
///
/// assert!((z_score(0.95) - 1.959964).abs() < 1e-5);
/// ```
pub fn z_score(level: f64) -> f64 {
    if level <= 0.0 || level.is_nan() {
        return 0.0;
    }
    if level >= 1.0 {
        return f64::INFINITY;
    }
    // Normal::new(0, 1) cannot fail.
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.inverse_cdf((1.0 + level) / 2.0),
        Err(_) => f64::NAN,
    }
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Root mean square of residuals with `dof` degrees of freedom removed.
///
/// The denominator never drops below 1.
pub fn residual_std(residuals: &[f64], dof: usize) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    let denom = residuals.len().saturating_sub(dof).max(1) as f64;
    (residuals.iter().map(|r| r * r).sum::<f64>() / denom).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn z_score_known_levels() {
        assert_relative_eq!(z_score(0.95), 1.959964, epsilon = 1e-5);
        assert_relative_eq!(z_score(0.80), 1.281552, epsilon = 1e-5);
        assert_relative_eq!(z_score(0.99), 2.575829, epsilon = 1e-5);
    }

    #[test]
    fn z_score_degenerate_levels() {
        assert_eq!(z_score(0.0), 0.0);
        assert_eq!(z_score(1.0), f64::INFINITY);
        assert_eq!(z_score(f64::NAN), 0.0);
    }

    #[test]
    fn mean_of_values() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-12);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn residual_std_removes_dof() {
        // sum of squares 8 over (4 - 2) = 4 -> 2
        assert_relative_eq!(residual_std(&[2.0, -2.0, 0.0, 0.0], 2), 2.0, epsilon = 1e-12);
        assert_relative_eq!(residual_std(&[3.0], 5), 3.0, epsilon = 1e-12);
        assert_eq!(residual_std(&[], 0), 0.0);
    }
}
