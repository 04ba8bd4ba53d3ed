//! Core data structures: observations, monthly series and forecasts.

mod forecast;
mod monthly;
mod observation;

pub use forecast::{Forecast, ForecastPoint, ForecastResult};
pub use monthly::{add_months, month_start, months_between, quarter_of, MonthlyPoint, MonthlySeries};
pub use observation::{normalize_identifier, Observation};
