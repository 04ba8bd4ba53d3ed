//! Prophet-style backend: piecewise-linear trend plus yearly seasonality.

use crate::backend::{check_horizon, ForecastBackend};
use crate::core::{ForecastResult, MonthlySeries};
use crate::error::{Error, Result};
use crate::models::{Forecaster, TrendSeasonal, TrendSeasonalConfig};

/// Interval width used unless configured otherwise.
pub const DEFAULT_INTERVAL_WIDTH: f64 = 0.95;

/// Fits [`TrendSeasonal`] on the series as observed, gaps included.
#[derive(Debug, Clone, Copy)]
pub struct ProphetBackend {
    config: TrendSeasonalConfig,
    interval_width: f64,
}

impl ProphetBackend {
    pub fn new() -> Self {
        Self::with_interval_width(DEFAULT_INTERVAL_WIDTH)
    }

    pub fn with_interval_width(interval_width: f64) -> Self {
        Self {
            config: TrendSeasonalConfig::default(),
            interval_width,
        }
    }

    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }
}

impl Default for ProphetBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastBackend for ProphetBackend {
    fn name(&self) -> &str {
        "prophet"
    }

    fn fit_and_forecast(&self, series: &MonthlySeries, horizon: usize) -> Result<ForecastResult> {
        check_horizon(horizon)?;
        let last = series.last().ok_or(Error::EmptyData)?.period_start;

        let mut model = TrendSeasonal::new(self.config);
        model.fit(series)?;
        let forecast = model.predict_with_intervals(horizon, self.interval_width)?;
        ForecastResult::from_forecast(self.name(), self.interval_width, last, &forecast)
    }
}
