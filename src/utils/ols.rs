//! Penalized least squares over an explicit design matrix.
//!
//! Solves `(X'X + diag(penalty)) beta = X'y` by Cholesky decomposition. A
//! zero penalty leaves a column unregularized; the trend/seasonality model
//! uses positive penalties on changepoint and Fourier columns.

use crate::error::{Error, Result};

/// Fitted coefficients, one per design column.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    pub coefficients: Vec<f64>,
}

impl LeastSquaresFit {
    /// Linear prediction for one design row.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        row.iter().zip(&self.coefficients).map(|(x, b)| x * b).sum()
    }

    /// `y - X beta` for every row.
    pub fn residuals(&self, design: &[Vec<f64>], y: &[f64]) -> Vec<f64> {
        design
            .iter()
            .zip(y)
            .map(|(row, &yi)| yi - self.predict_row(row))
            .collect()
    }
}

/// Fit `y ≈ X beta` with a per-column ridge penalty.
///
/// `design` holds one row per observation; every row must have
/// `penalty.len()` columns.
pub fn ridge_fit(design: &[Vec<f64>], y: &[f64], penalty: &[f64]) -> Result<LeastSquaresFit> {
    let n = y.len();
    if n == 0 {
        return Err(Error::InsufficientData { needed: 1, got: 0 });
    }
    if design.len() != n {
        return Err(Error::InvalidParameter(format!(
            "design has {} rows for {} observations",
            design.len(),
            n
        )));
    }
    let k = penalty.len();
    if let Some(row) = design.iter().find(|row| row.len() != k) {
        return Err(Error::InvalidParameter(format!(
            "design row has {} columns, expected {}",
            row.len(),
            k
        )));
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &yi) in design.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * yi;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
        // Tiny jitter keeps rank-deficient designs solvable.
        xtx[i][i] += penalty[i] + 1e-9;
    }

    let coefficients = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        Error::ComputationError("least squares system is not positive definite".to_string())
    })?;

    Ok(LeastSquaresFit { coefficients })
}

/// Solve `A x = b` for symmetric positive definite `A` via Cholesky.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let sum = a[i][j] - (0..j).map(|k| l[i][k] * l[j][k]).sum::<f64>();
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        y[i] = (b[i] - (0..i).map(|j| l[i][j] * y[j]).sum::<f64>()) / l[i][i];
    }
    // L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        x[i] = (y[i] - ((i + 1)..n).map(|j| l[j][i] * x[j]).sum::<f64>()) / l[i][i];
    }
    Some(x)
}
