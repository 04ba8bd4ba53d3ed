//! ARIMA (Autoregressive Integrated Moving Average) model.

use crate::core::{Forecast, MonthlySeries};
use crate::error::{Error, Result};
use crate::models::arima::diff::{difference, integrate, integrated_ar};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::{mean, z_score};

/// ARIMA model orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ARIMASpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ARIMASpec {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Whether a constant is estimated. Differenced models carry none, so
    /// forecasts do not drift.
    pub fn has_constant(&self) -> bool {
        self.d == 0
    }

    /// Estimated parameters: AR + MA, plus the constant when there is one.
    pub fn num_params(&self) -> usize {
        self.p + self.q + usize::from(self.has_constant())
    }

    /// Shortest series the model can be fitted on.
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }
}

impl Default for ARIMASpec {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// ARIMA(p, d, q) fitted by conditional sum of squares.
///
/// The series must be gap-free: every calendar month between the first and
/// last point present.
#[derive(Debug, Clone)]
pub struct ARIMA {
    spec: ARIMASpec,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    /// Process mean; zero when `d > 0`.
    intercept: f64,
    original: Option<Vec<f64>>,
    differenced: Option<Vec<f64>>,
    fitted_diff: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
}

impl ARIMA {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            spec: ARIMASpec::new(p, d, q),
            ar_coefficients: vec![],
            ma_coefficients: vec![],
            intercept: 0.0,
            original: None,
            differenced: None,
            fitted_diff: None,
            residuals: None,
            residual_variance: None,
        }
    }

    /// ARIMA(1,1,1), the configuration used for KPI forecasts.
    pub fn arima_111() -> Self {
        Self::new(1, 1, 1)
    }

    pub fn spec(&self) -> ARIMASpec {
        self.spec
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn residual_variance(&self) -> Option<f64> {
        self.residual_variance
    }

    /// One-step-ahead predictions on the differenced scale and their errors.
    fn filter(
        diff_series: &[f64],
        ar: &[f64],
        ma: &[f64],
        intercept: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        let n = diff_series.len();
        let start = ar.len().max(ma.len());
        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];

        for t in start..n {
            let ar_part: f64 = ar
                .iter()
                .enumerate()
                .map(|(i, phi)| phi * (diff_series[t - 1 - i] - intercept))
                .sum();
            let ma_part: f64 = ma
                .iter()
                .enumerate()
                .map(|(i, theta)| theta * residuals[t - 1 - i])
                .sum();
            fitted[t] = intercept + ar_part + ma_part;
            residuals[t] = diff_series[t] - fitted[t];
        }

        (fitted, residuals)
    }

    /// `params` is `[ar..., ma...]`, preceded by the constant when
    /// `with_constant` is set.
    fn conditional_sum_of_squares(
        diff_series: &[f64],
        p: usize,
        with_constant: bool,
        params: &[f64],
    ) -> f64 {
        let (intercept, coefficients) = if with_constant {
            (params[0], &params[1..])
        } else {
            (0.0, params)
        };
        let (ar, ma) = coefficients.split_at(p);
        let start = p.max(ma.len()).min(diff_series.len());
        let (_, residuals) = Self::filter(diff_series, ar, ma, intercept);
        residuals[start..].iter().map(|e| e * e).sum()
    }

    fn estimate_parameters(&mut self, diff_series: &[f64]) {
        let ARIMASpec { p, q, .. } = self.spec;
        let with_constant = self.spec.has_constant();
        let initial_constant = if with_constant { mean(diff_series) } else { 0.0 };

        if p == 0 && q == 0 {
            self.intercept = initial_constant;
            self.ar_coefficients.clear();
            self.ma_coefficients.clear();
            return;
        }

        let mut initial = Vec::with_capacity(self.spec.num_params());
        let mut bounds = Vec::with_capacity(self.spec.num_params());
        if with_constant {
            initial.push(initial_constant);
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        initial.extend((0..p).map(|i| 0.1 / (i + 1) as f64));
        initial.extend((0..q).map(|i| 0.1 / (i + 1) as f64));
        // Keep AR stationary and MA invertible.
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + q));

        let result = nelder_mead(
            |params| Self::conditional_sum_of_squares(diff_series, p, with_constant, params),
            &initial,
            Some(bounds.as_slice()),
            NelderMeadConfig {
                max_iter: 1000,
                tolerance: 1e-8,
                ..Default::default()
            },
        );

        let offset = usize::from(with_constant);
        self.intercept = if with_constant { result.optimal_point[0] } else { 0.0 };
        self.ar_coefficients = result.optimal_point[offset..offset + p].to_vec();
        self.ma_coefficients = result.optimal_point[offset + p..].to_vec();
    }

    /// MA(infinity) weights of the integrated process, `psi_0 .. psi_{h-1}`.
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        let a = integrated_ar(&self.ar_coefficients, self.spec.d);
        let mut psi = Vec::with_capacity(horizon);
        for j in 0..horizon {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let theta = self.ma_coefficients.get(j - 1).copied().unwrap_or(0.0);
            let ar_part: f64 = (1..=j.min(a.len())).map(|i| a[i - 1] * psi[j - i]).sum();
            psi.push(theta + ar_part);
        }
        psi
    }
}

impl Default for ARIMA {
    fn default() -> Self {
        Self::arima_111()
    }
}

impl Forecaster for ARIMA {
    fn fit(&mut self, series: &MonthlySeries) -> Result<()> {
        if series.has_gaps() {
            return Err(Error::InvalidParameter(
                "ARIMA requires a gap-free monthly series".to_string(),
            ));
        }
        let values = series.values();
        let min_len = self.spec.min_observations();
        if values.len() < min_len {
            return Err(Error::InsufficientData {
                needed: min_len,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter(
                "series contains non-finite values".to_string(),
            ));
        }

        let diff_series = difference(&values, self.spec.d);
        self.estimate_parameters(&diff_series);

        let (fitted, residuals) = Self::filter(
            &diff_series,
            &self.ar_coefficients,
            &self.ma_coefficients,
            self.intercept,
        );
        let start = self.spec.p.max(self.spec.q);
        let effective = &residuals[start..];
        self.residual_variance = if effective.is_empty() {
            Some(0.0)
        } else {
            Some(effective.iter().map(|r| r * r).sum::<f64>() / effective.len() as f64)
        };

        self.original = Some(values);
        self.differenced = Some(diff_series);
        self.fitted_diff = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let original = self.original.as_ref().ok_or(Error::FitRequired)?;
        let diff_series = self.differenced.as_ref().ok_or(Error::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(Error::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        let mut extended = diff_series.clone();
        let mut errors = residuals.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let ar_part: f64 = self
                .ar_coefficients
                .iter()
                .enumerate()
                .filter(|(i, _)| t > *i)
                .map(|(i, phi)| phi * (extended[t - 1 - i] - self.intercept))
                .sum();
            let ma_part: f64 = self
                .ma_coefficients
                .iter()
                .enumerate()
                .filter(|(i, _)| t > *i)
                .map(|(i, theta)| theta * errors[t - 1 - i])
                .sum();
            extended.push(self.intercept + ar_part + ma_part);
            // Future shocks have expectation zero.
            errors.push(0.0);
        }

        let forecast_diff = &extended[diff_series.len()..];
        let predictions = integrate(forecast_diff, original, self.spec.d);
        Ok(Forecast::from_values(predictions))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }

        let sigma2 = self.residual_variance.unwrap_or(0.0);
        let z = z_score(level);
        let psi = self.psi_weights(horizon);

        let mut cumulative = 0.0;
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (&pred, &weight) in forecast.point().iter().zip(&psi) {
            cumulative += weight * weight;
            let se = (sigma2 * cumulative).sqrt();
            lower.push(pred - z * se);
            upper.push(pred + z * se);
        }

        Ok(Forecast::from_values_with_intervals(
            forecast.point().to_vec(),
            lower,
            upper,
        ))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted_diff.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}
