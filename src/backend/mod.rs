//! Forecast backends and their availability.
//!
//! A backend turns a monthly series into a dated [`ForecastResult`]. Which
//! backends exist is decided once at startup: a backend must be compiled in
//! (Cargo features `prophet` and `arima`) and enabled in configuration.

#[cfg(feature = "arima")]
mod arima;
#[cfg(feature = "prophet")]
mod prophet;

#[cfg(feature = "arima")]
pub use arima::{ArimaBackend, ARIMA_INTERVAL_LEVEL};
#[cfg(feature = "prophet")]
pub use prophet::{ProphetBackend, DEFAULT_INTERVAL_WIDTH};

use std::fmt;
use std::sync::Arc;

use crate::core::{ForecastResult, MonthlySeries};
use crate::error::{Error, Result};

/// A statistical forecasting engine.
pub trait ForecastBackend: Send + Sync {
    /// Short identifier, e.g. `"prophet"` or `"arima"`.
    fn name(&self) -> &str;

    /// Fit on `series` and forecast `horizon` months past its last month.
    fn fit_and_forecast(&self, series: &MonthlySeries, horizon: usize) -> Result<ForecastResult>;
}

/// Shared handle to a backend.
pub type SharedBackend = Arc<dyn ForecastBackend>;

pub(crate) fn check_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(Error::InvalidParameter(
            "horizon must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Which backends may be used for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendAvailability {
    pub prophet: bool,
    pub arima: bool,
}

impl BackendAvailability {
    /// Backends compiled into this build.
    pub fn compiled() -> Self {
        Self {
            prophet: cfg!(feature = "prophet"),
            arima: cfg!(feature = "arima"),
        }
    }

    /// Compiled backends further restricted by runtime flags.
    pub fn from_flags(prophet_enabled: bool, arima_enabled: bool) -> Self {
        let compiled = Self::compiled();
        Self {
            prophet: compiled.prophet && prophet_enabled,
            arima: compiled.arima && arima_enabled,
        }
    }

    pub fn none() -> Self {
        Self {
            prophet: false,
            arima: false,
        }
    }

    pub fn any(&self) -> bool {
        self.prophet || self.arima
    }
}

/// The backend instances available to the orchestrator.
#[derive(Clone, Default)]
pub struct Backends {
    prophet: Option<SharedBackend>,
    arima: Option<SharedBackend>,
}

impl Backends {
    /// No backends.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prophet(mut self, backend: SharedBackend) -> Self {
        self.prophet = Some(backend);
        self
    }

    pub fn with_arima(mut self, backend: SharedBackend) -> Self {
        self.arima = Some(backend);
        self
    }

    /// Instantiate the built-in backends allowed by `availability`.
    #[cfg_attr(
        not(all(feature = "prophet", feature = "arima")),
        allow(unused_mut, unused_variables)
    )]
    pub fn from_availability(availability: BackendAvailability, prophet_interval_width: f64) -> Self {
        let mut backends = Self::new();

        #[cfg(feature = "prophet")]
        if availability.prophet {
            backends = backends.with_prophet(Arc::new(ProphetBackend::with_interval_width(
                prophet_interval_width,
            )));
        }
        #[cfg(feature = "arima")]
        if availability.arima {
            backends = backends.with_arima(Arc::new(ArimaBackend::new()));
        }

        backends
    }

    pub fn prophet(&self) -> Option<&SharedBackend> {
        self.prophet.as_ref()
    }

    pub fn arima(&self) -> Option<&SharedBackend> {
        self.arima.as_ref()
    }

    pub fn availability(&self) -> BackendAvailability {
        BackendAvailability {
            prophet: self.prophet.is_some(),
            arima: self.arima.is_some(),
        }
    }
}

impl fmt::Debug for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backends")
            .field("prophet", &self.prophet.as_ref().map(|b| b.name()))
            .field("arima", &self.arima.as_ref().map(|b| b.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_restrict_compiled_backends() {
        let all = BackendAvailability::from_flags(true, true);
        assert_eq!(all, BackendAvailability::compiled());

        let only_arima = BackendAvailability::from_flags(false, true);
        assert!(!only_arima.prophet);
        assert_eq!(only_arima.arima, cfg!(feature = "arima"));

        assert!(!BackendAvailability::none().any());
    }

    #[test]
    fn backends_follow_availability() {
        let backends = Backends::from_availability(BackendAvailability::none(), 0.95);
        assert!(backends.prophet().is_none());
        assert!(backends.arima().is_none());
        assert_eq!(backends.availability(), BackendAvailability::none());
    }

    #[cfg(all(feature = "prophet", feature = "arima"))]
    #[test]
    fn default_build_has_both_backends() {
        let backends = Backends::from_availability(BackendAvailability::from_flags(true, true), 0.95);
        assert_eq!(backends.prophet().map(|b| b.name()), Some("prophet"));
        assert_eq!(backends.arima().map(|b| b.name()), Some("arima"));
        assert!(format!("{backends:?}").contains("prophet"));
    }

    #[test]
    fn zero_horizon_is_rejected() {
        assert!(matches!(check_horizon(0), Err(Error::InvalidParameter(_))));
        assert!(check_horizon(1).is_ok());
    }
}
