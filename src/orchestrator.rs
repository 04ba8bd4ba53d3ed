//! Backend selection with graceful degradation.
//!
//! The orchestrator checks history length, picks a backend from the caller's
//! preference and what is available, and reports which backend served the
//! request. It never branches on a backend's identity beyond that.

use crate::backend::{BackendAvailability, Backends, SharedBackend};
use crate::core::{ForecastResult, MonthlySeries};

/// Fewest monthly points a forecast is attempted on.
pub const MIN_HISTORY: usize = 6;

/// Preference value that selects the Prophet-style backend.
pub const PROPHET: &str = "prophet";

/// How the serving backend relates to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Prophet was requested and served.
    Preferred,
    /// A non-prophet model was requested; ARIMA served it.
    ExplicitArima,
    /// Prophet was requested but unavailable; ARIMA substituted.
    ProphetUnavailable,
}

impl Selection {
    /// Value recorded in the dialogue's `model` slot, if any.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Selection::Preferred => None,
            Selection::ExplicitArima => Some("arima"),
            Selection::ProphetUnavailable => Some("prophet_unavailable"),
        }
    }
}

/// Result of a forecast request.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Forecast {
        result: ForecastResult,
        selection: Selection,
    },
    InsufficientHistory {
        needed: usize,
        got: usize,
    },
    NoBackendAvailable,
    /// The chosen backend failed while fitting or forecasting.
    BackendFailed {
        backend: String,
        message: String,
    },
}

/// Chooses and runs a forecast backend.
#[derive(Debug, Clone)]
pub struct ForecastOrchestrator {
    backends: Backends,
    min_history: usize,
}

impl ForecastOrchestrator {
    pub fn new(backends: Backends) -> Self {
        Self {
            backends,
            min_history: MIN_HISTORY,
        }
    }

    /// Override the minimum history length.
    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history.max(1);
        self
    }

    pub fn availability(&self) -> BackendAvailability {
        self.backends.availability()
    }

    pub fn min_history(&self) -> usize {
        self.min_history
    }

    /// Pick the backend for `preferred` (default `"prophet"`).
    fn select(&self, preferred: Option<&str>) -> Option<(&SharedBackend, Selection)> {
        let wants_prophet = preferred
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .map_or(true, |p| p == PROPHET);

        if wants_prophet {
            if let Some(prophet) = self.backends.prophet() {
                return Some((prophet, Selection::Preferred));
            }
        }
        let selection = if wants_prophet {
            Selection::ProphetUnavailable
        } else {
            Selection::ExplicitArima
        };
        self.backends.arima().map(|arima| (arima, selection))
    }

    /// Forecast `horizon` months past the end of `series`.
    pub fn forecast(
        &self,
        series: &MonthlySeries,
        horizon: usize,
        preferred: Option<&str>,
    ) -> ForecastOutcome {
        if series.len() < self.min_history {
            tracing::debug!(
                got = series.len(),
                needed = self.min_history,
                "not enough history to forecast"
            );
            return ForecastOutcome::InsufficientHistory {
                needed: self.min_history,
                got: series.len(),
            };
        }

        let Some((backend, selection)) = self.select(preferred) else {
            tracing::warn!(preferred = ?preferred, "no forecast backend available");
            return ForecastOutcome::NoBackendAvailable;
        };

        if selection == Selection::ProphetUnavailable {
            tracing::warn!(backend = backend.name(), "prophet unavailable, substituting");
        }
        tracing::debug!(backend = backend.name(), horizon, points = series.len(), "running forecast");

        match backend.fit_and_forecast(series, horizon) {
            Ok(result) => ForecastOutcome::Forecast { result, selection },
            Err(err) => {
                tracing::warn!(backend = backend.name(), error = %err, "forecast backend failed");
                ForecastOutcome::BackendFailed {
                    backend: backend.name().to_string(),
                    message: err.to_string(),
                }
            }
        }
    }
}
