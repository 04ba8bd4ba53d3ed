//! # kpi-forecast
//!
//! Monthly KPI lookups and forecasts for a conversational assistant.
//!
//! Resolves loose period expressions ("ytd", "last 2 quarters",
//! "2024-Q1", "March 2024") against a monthly series, and runs forecasts
//! through interchangeable backends (a Prophet-style trend/seasonality
//! model and ARIMA(1,1,1)), substituting one for the other when a backend
//! is unavailable.

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod backend;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod format;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod period;
pub mod slicer;
pub mod transform;
pub mod utils;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::backend::{BackendAvailability, Backends, ForecastBackend};
    pub use crate::core::{ForecastPoint, ForecastResult, MonthlyPoint, MonthlySeries, Observation};
    pub use crate::data::{CsvSource, InMemorySource, ObservationSource};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{ForecastHandler, QueryHandler, Response, SlotEvent, Slots};
    pub use crate::orchestrator::{ForecastOrchestrator, ForecastOutcome, Selection};
    pub use crate::period::{resolve, PeriodSelection};
    pub use crate::slicer::slice_series;
}
