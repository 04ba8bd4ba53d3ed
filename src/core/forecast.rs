//! Forecast structures: raw model output and the dated result handed to callers.

use crate::core::monthly::add_months;
use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Raw model output: point predictions with optional interval bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions only.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with prediction intervals.
    pub fn from_values_with_intervals(values: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }
}

/// A dated forecast step with its uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub period_start: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastPoint {
    /// Build a point, ordering the bounds so that `lower <= point <= upper`.
    pub fn new(period_start: NaiveDate, point_estimate: f64, lower: f64, upper: f64) -> Self {
        let (lo, hi) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        Self {
            period_start,
            point_estimate,
            lower_bound: lo.min(point_estimate),
            upper_bound: hi.max(point_estimate),
        }
    }

    /// Width of the uncertainty band.
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// A forecast for consecutive months following the last observed month.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    backend: String,
    interval_level: f64,
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Attach calendar months to a model forecast.
    ///
    /// The first step is dated the month after `last_observed`. The model
    /// output must carry intervals.
    pub fn from_forecast(
        backend: &str,
        interval_level: f64,
        last_observed: NaiveDate,
        forecast: &Forecast,
    ) -> Result<Self> {
        let (lower, upper) = match (forecast.lower(), forecast.upper()) {
            (Some(lower), Some(upper)) => (lower, upper),
            _ => {
                return Err(Error::ComputationError(format!(
                    "{backend} produced no prediction interval"
                )))
            }
        };
        if lower.len() != forecast.horizon() || upper.len() != forecast.horizon() {
            return Err(Error::ComputationError(format!(
                "{backend} interval length does not match horizon"
            )));
        }

        let all_finite = forecast
            .point()
            .iter()
            .chain(lower)
            .chain(upper)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::ComputationError(format!(
                "{backend} produced non-finite forecast values"
            )));
        }

        let points = forecast
            .point()
            .iter()
            .zip(lower.iter().zip(upper))
            .enumerate()
            .map(|(i, (&point, (&lo, &hi)))| {
                ForecastPoint::new(add_months(last_observed, i as i32 + 1), point, lo, hi)
            })
            .collect();

        Ok(Self {
            backend: backend.to_string(),
            interval_level,
            points,
        })
    }

    /// Name of the backend that produced the forecast.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Interval level the backend computed internally (e.g. 0.95).
    pub fn interval_level(&self) -> f64 {
        self.interval_level
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn horizon(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn forecast_from_values_has_no_intervals() {
        let forecast = Forecast::from_values(vec![1.0, 2.0, 3.0]);
        assert_eq!(forecast.horizon(), 3);
        assert!(!forecast.has_intervals());
        assert!(Forecast::new().is_empty());
    }

    #[test]
    fn forecast_point_orders_bounds() {
        let point = ForecastPoint::new(date(2024, 1), 10.0, 12.0, 8.0);
        assert_eq!(point.lower_bound, 8.0);
        assert_eq!(point.upper_bound, 12.0);

        let outside = ForecastPoint::new(date(2024, 1), 20.0, 8.0, 12.0);
        assert!(outside.lower_bound <= outside.point_estimate);
        assert!(outside.point_estimate <= outside.upper_bound);
    }

    #[test]
    fn result_dates_start_after_last_observation() {
        let forecast = Forecast::from_values_with_intervals(
            vec![2.0, 3.0, 4.0],
            vec![1.0, 2.0, 3.0],
            vec![3.0, 4.0, 5.0],
        );
        let result = ForecastResult::from_forecast("ARIMA", 0.8, date(2024, 11), &forecast).unwrap();

        let months: Vec<_> = result.points().iter().map(|p| p.period_start).collect();
        assert_eq!(months, vec![date(2024, 12), date(2025, 1), date(2025, 2)]);
        assert_eq!(result.backend(), "ARIMA");
        assert_eq!(result.horizon(), 3);
    }

    #[test]
    fn result_requires_intervals() {
        let forecast = Forecast::from_values(vec![2.0]);
        assert!(ForecastResult::from_forecast("ARIMA", 0.8, date(2024, 1), &forecast).is_err());
    }

    #[test]
    fn result_rejects_non_finite_values() {
        let forecast =
            Forecast::from_values_with_intervals(vec![f64::NAN], vec![0.0], vec![1.0]);
        assert!(matches!(
            ForecastResult::from_forecast("Prophet", 0.95, date(2024, 1), &forecast),
            Err(Error::ComputationError(_))
        ));
    }
}
