//! Forecaster trait defining the common interface for all models.

use crate::core::{Forecast, MonthlySeries};
use crate::error::Result;

/// Common interface for the monthly forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to a monthly series.
    fn fit(&mut self, series: &MonthlySeries) -> Result<()>;

    /// Generate point predictions for the next `horizon` months.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with intervals at the given coverage level.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample predictions.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use kpi_forecast::models::{BoxedForecaster, Forecaster};
/// use kpi_forecast::models::arima::ARIMA;
///
/// let model: BoxedForecaster = Box::new(ARIMA::arima_111());
/// assert_eq!(model.name(), "ARIMA");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster + Send + Sync>;
