//! Forecasting models.

mod traits;

pub mod arima;
pub mod trend_season;

pub use arima::ARIMA;
pub use traits::{BoxedForecaster, Forecaster};
pub use trend_season::{TrendSeasonal, TrendSeasonalConfig};
