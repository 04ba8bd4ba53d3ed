//! Additive trend + yearly seasonality model for monthly series.
//!
//! `y(t) = k t + m + sum_j delta_j (t - c_j)+ + s(t)` where the trend is
//! piecewise linear with potential changepoints `c_j` placed over the first
//! part of the history, and `s(t)` is a Fourier series with a 12 month
//! period. All coefficients are estimated jointly by ridge regression; the
//! changepoint penalty plays the role of a sparse prior on rate changes.
//!
//! Time is measured in calendar months from the first observation, so
//! series with missing months are fitted as they are.

use chrono::NaiveDate;
use std::f64::consts::PI;

use crate::core::{months_between, Forecast, MonthlySeries};
use crate::error::{Error, Result};
use crate::models::Forecaster;
use crate::utils::ols::{ridge_fit, LeastSquaresFit};
use crate::utils::stats::{residual_std, z_score};

/// Fixed model configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSeasonalConfig {
    /// Upper bound on the number of changepoints.
    pub n_changepoints: usize,
    /// Share of the history in which changepoints may be placed.
    pub changepoint_range: f64,
    /// Smaller values give a stiffer trend.
    pub changepoint_prior_scale: f64,
    /// Fourier order of the yearly component.
    pub yearly_order: usize,
    /// Minimum month span before the yearly component is fitted.
    pub yearly_min_months: usize,
    pub seasonality_prior_scale: f64,
}

impl Default for TrendSeasonalConfig {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            yearly_order: 3,
            yearly_min_months: 24,
            seasonality_prior_scale: 10.0,
        }
    }
}

/// Piecewise-linear trend with optional yearly seasonality.
#[derive(Debug, Clone, Default)]
pub struct TrendSeasonal {
    config: TrendSeasonalConfig,
    state: Option<FittedState>,
}

#[derive(Debug, Clone)]
struct FittedState {
    first_period: NaiveDate,
    last_period: NaiveDate,
    /// Trend time is `month offset / t_scale`.
    t_scale: f64,
    y_scale: f64,
    changepoints: Vec<f64>,
    yearly_order: usize,
    coefficients: LeastSquaresFit,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    sigma: f64,
    n: usize,
}

impl TrendSeasonal {
    pub fn new(config: TrendSeasonalConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &TrendSeasonalConfig {
        &self.config
    }

    /// Changepoint locations in scaled time; empty before fitting.
    pub fn changepoints(&self) -> &[f64] {
        self.state
            .as_ref()
            .map(|s| s.changepoints.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the fitted model includes the yearly component.
    pub fn has_yearly(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.yearly_order > 0)
    }

    /// Residual standard deviation on the original scale.
    pub fn sigma(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.sigma)
    }

    /// Changepoints at evenly spaced observations of the leading history.
    fn place_changepoints(&self, t: &[f64]) -> Vec<f64> {
        let hist_size = (t.len() as f64 * self.config.changepoint_range).floor() as usize;
        let count = self.config.n_changepoints.min(hist_size.saturating_sub(1));
        if count == 0 {
            return vec![];
        }
        let step = (hist_size - 1) as f64 / count as f64;
        (1..=count)
            .map(|j| t[(j as f64 * step).round() as usize])
            .collect()
    }

    fn penalties(&self, n_changepoints: usize, yearly_order: usize) -> Vec<f64> {
        let mut penalty = vec![0.0, 0.0];
        penalty.extend(
            std::iter::repeat(1.0 / self.config.changepoint_prior_scale).take(n_changepoints),
        );
        penalty.extend(
            std::iter::repeat(1.0 / self.config.seasonality_prior_scale).take(2 * yearly_order),
        );
        penalty
    }
}

/// One design row: intercept, slope, changepoint hinges, Fourier terms.
fn design_row(t: f64, month_offset: f64, changepoints: &[f64], yearly_order: usize) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + changepoints.len() + 2 * yearly_order);
    row.push(1.0);
    row.push(t);
    row.extend(changepoints.iter().map(|&c| (t - c).max(0.0)));
    for k in 1..=yearly_order {
        let angle = 2.0 * PI * k as f64 * month_offset / 12.0;
        row.push(angle.sin());
        row.push(angle.cos());
    }
    row
}

impl Forecaster for TrendSeasonal {
    fn fit(&mut self, series: &MonthlySeries) -> Result<()> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) if series.len() >= 2 => (*first, *last),
            _ => {
                return Err(Error::InsufficientData {
                    needed: 2,
                    got: series.len(),
                })
            }
        };
        let values = series.values();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter(
                "series contains non-finite values".to_string(),
            ));
        }

        let offsets: Vec<f64> = series
            .points()
            .iter()
            .map(|p| months_between(first.period_start, p.period_start) as f64)
            .collect();
        let t_scale = (months_between(first.period_start, last.period_start) as f64).max(1.0);
        let t: Vec<f64> = offsets.iter().map(|o| o / t_scale).collect();

        let y_scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let y: Vec<f64> = values.iter().map(|v| v / y_scale).collect();

        let changepoints = self.place_changepoints(&t);
        let yearly_order = if series.month_span() >= self.config.yearly_min_months {
            self.config.yearly_order
        } else {
            0
        };

        let design: Vec<Vec<f64>> = t
            .iter()
            .zip(&offsets)
            .map(|(&ti, &oi)| design_row(ti, oi, &changepoints, yearly_order))
            .collect();
        let penalty = self.penalties(changepoints.len(), yearly_order);
        let coefficients = ridge_fit(&design, &y, &penalty)?;

        let fitted: Vec<f64> = design
            .iter()
            .map(|row| coefficients.predict_row(row) * y_scale)
            .collect();
        let residuals: Vec<f64> = values.iter().zip(&fitted).map(|(v, f)| v - f).collect();
        let sigma = residual_std(&residuals, 2);

        self.state = Some(FittedState {
            first_period: first.period_start,
            last_period: last.period_start,
            t_scale,
            y_scale,
            changepoints,
            yearly_order,
            coefficients,
            fitted,
            residuals,
            sigma,
            n: values.len(),
        });
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let state = self.state.as_ref().ok_or(Error::FitRequired)?;
        // The last observation sits at scaled time 1.
        let last_offset = months_between(state.first_period, state.last_period) as f64;

        let points = (1..=horizon)
            .map(|h| {
                let offset = last_offset + h as f64;
                let row = design_row(
                    offset / state.t_scale,
                    offset,
                    &state.changepoints,
                    state.yearly_order,
                );
                state.coefficients.predict_row(&row) * state.y_scale
            })
            .collect();
        Ok(Forecast::from_values(points))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let state = self.state.as_ref().ok_or(Error::FitRequired)?;
        let forecast = self.predict(horizon)?;
        let z = z_score(level);

        let (lower, upper): (Vec<f64>, Vec<f64>) = forecast
            .point()
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let se = state.sigma * (1.0 + (i + 1) as f64 / state.n as f64).sqrt();
                (p - z * se, p + z * se)
            })
            .unzip();

        Ok(Forecast::from_values_with_intervals(
            forecast.point().to_vec(),
            lower,
            upper,
        ))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "TrendSeasonal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{add_months, MonthlyPoint};
    use approx::assert_relative_eq;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
    }

    #[test]
    fn linear_series_extrapolates_linearly() {
        let values: Vec<f64> = (0..12).map(|i| 100.0 + 5.0 * i as f64).collect();
        let mut model = TrendSeasonal::default();
        model.fit(&MonthlySeries::consecutive(start(), &values)).unwrap();

        let forecast = model.predict(3).unwrap();
        assert_relative_eq!(forecast.point()[0], 160.0, epsilon = 1.0);
        assert_relative_eq!(forecast.point()[2], 170.0, epsilon = 2.0);
        assert!(!model.has_yearly());
    }

    #[test]
    fn changepoints_stay_in_leading_history() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let mut model = TrendSeasonal::default();
        model.fit(&MonthlySeries::consecutive(start(), &values)).unwrap();

        // floor(0.8 * 10) = 8 observations, 7 changepoints
        assert_eq!(model.changepoints().len(), 7);
        assert!(model.changepoints().iter().all(|&c| c <= 0.8 + 1e-12));
    }

    #[test]
    fn yearly_component_needs_two_years() {
        let seasonal: Vec<f64> = (0..36)
            .map(|i| 50.0 + 10.0 * (2.0 * PI * i as f64 / 12.0).sin())
            .collect();
        let mut model = TrendSeasonal::default();
        model.fit(&MonthlySeries::consecutive(start(), &seasonal)).unwrap();
        assert!(model.has_yearly());

        // Next January repeats the pattern of the previous Januaries.
        let forecast = model.predict(12).unwrap();
        assert_relative_eq!(forecast.point()[0], seasonal[0], epsilon = 2.0);
        assert_relative_eq!(forecast.point()[3], seasonal[3], epsilon = 2.0);
    }

    #[test]
    fn gaps_are_tolerated() {
        let points: Vec<MonthlyPoint> = [0, 1, 2, 5, 6, 7, 9]
            .iter()
            .map(|&m| MonthlyPoint::new(add_months(start(), m), 10.0 + m as f64))
            .collect();
        let series = MonthlySeries::new(points).unwrap();
        let mut model = TrendSeasonal::default();
        model.fit(&series).unwrap();

        let forecast = model.predict(1).unwrap();
        assert_relative_eq!(forecast.point()[0], 20.0, epsilon = 1.0);
    }

    #[test]
    fn intervals_contain_point_and_widen() {
        let values: Vec<f64> = (0..18)
            .map(|i| 30.0 + i as f64 + 2.0 * (i as f64 * 1.7).sin())
            .collect();
        let mut model = TrendSeasonal::default();
        model.fit(&MonthlySeries::consecutive(start(), &values)).unwrap();

        let forecast = model.predict_with_intervals(4, 0.95).unwrap();
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();
        for h in 0..4 {
            assert!(lower[h] < forecast.point()[h]);
            assert!(forecast.point()[h] < upper[h]);
        }
        assert!(upper[3] - lower[3] > upper[0] - lower[0]);
        assert!(model.sigma().unwrap() > 0.0);
    }

    #[test]
    fn constant_zero_series_is_flat() {
        let mut model = TrendSeasonal::default();
        model.fit(&MonthlySeries::consecutive(start(), &[0.0; 8])).unwrap();
        let forecast = model.predict_with_intervals(2, 0.8).unwrap();
        assert_relative_eq!(forecast.point()[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.upper().unwrap()[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn errors_before_fit_and_on_short_input() {
        let mut model = TrendSeasonal::default();
        assert!(matches!(model.predict(1), Err(Error::FitRequired)));
        assert!(matches!(
            model.fit(&MonthlySeries::consecutive(start(), &[1.0])),
            Err(Error::InsufficientData { needed: 2, got: 1 })
        ));
    }
}
