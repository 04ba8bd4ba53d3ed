//! ARIMA(1,1,1) backend.

use crate::backend::{check_horizon, ForecastBackend};
use crate::core::{ForecastResult, MonthlySeries};
use crate::error::{Error, Result};
use crate::models::arima::{ARIMASpec, ARIMA};
use crate::models::Forecaster;
use crate::transform::interpolate_gaps;

/// Interval coverage of ARIMA forecasts (alpha = 0.20).
pub const ARIMA_INTERVAL_LEVEL: f64 = 0.80;

/// Fits an ARIMA model on the series regularized to a monthly grid.
///
/// Missing months are linearly interpolated; leading and trailing gaps
/// cannot occur because the grid spans first to last observation.
#[derive(Debug, Clone, Copy)]
pub struct ArimaBackend {
    spec: ARIMASpec,
}

impl ArimaBackend {
    pub fn new() -> Self {
        Self {
            spec: ARIMASpec::default(),
        }
    }

    pub fn spec(&self) -> ARIMASpec {
        self.spec
    }
}

impl Default for ArimaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastBackend for ArimaBackend {
    fn name(&self) -> &str {
        "arima"
    }

    fn fit_and_forecast(&self, series: &MonthlySeries, horizon: usize) -> Result<ForecastResult> {
        check_horizon(horizon)?;
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (first.period_start, last.period_start),
            _ => return Err(Error::EmptyData),
        };

        let regular = if series.has_gaps() {
            let filled = interpolate_gaps(&series.regular_values(), true);
            tracing::debug!(
                observed = series.len(),
                months = filled.len(),
                "interpolated missing months before ARIMA fit"
            );
            MonthlySeries::consecutive(first, &filled)
        } else {
            series.clone()
        };

        let mut model = ARIMA::new(self.spec.p, self.spec.d, self.spec.q);
        model.fit(&regular)?;
        let forecast = model.predict_with_intervals(horizon, ARIMA_INTERVAL_LEVEL)?;
        ForecastResult::from_forecast(self.name(), ARIMA_INTERVAL_LEVEL, last, &forecast)
    }
}
