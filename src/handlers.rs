//! Request handlers for the dialogue layer.
//!
//! Handlers take loosely typed slot values, reload the history from their
//! source, and answer with text plus any slot updates. Every user-level
//! problem (missing slots, no history, no backend) is a text reply; only a
//! failing data source is returned as an error.

use std::sync::Arc;

use crate::core::normalize_identifier;
use crate::data::ObservationSource;
use crate::error::Result;
use crate::format;
use crate::orchestrator::{ForecastOrchestrator, ForecastOutcome};
use crate::period::resolve;
use crate::slicer::slice_series;

/// Horizon used when the slot is missing or not a number.
pub const DEFAULT_HORIZON: usize = 3;

/// Largest horizon a forecast is computed for; longer requests are cut
/// and the reply says so.
pub const MAX_HORIZON: usize = 120;

/// Name of the slot that records which backend served a forecast.
pub const MODEL_SLOT: &str = "model";

pub const MISSING_QUERY_SLOTS: &str = "I need both KPI and segment to look that up.";
pub const MISSING_FORECAST_SLOTS: &str = "I need a KPI and segment before I can run a forecast.";
pub const NO_BACKEND: &str = "Forecasting libraries are not available on the server right now.";

/// Slot values as filled by the dialogue layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    pub kpi: Option<String>,
    pub segment: Option<String>,
    pub period: Option<String>,
    pub horizon: Option<String>,
    pub model: Option<String>,
}

impl Slots {
    pub fn new(kpi: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            kpi: Some(kpi.into()),
            segment: Some(segment.into()),
            ..Default::default()
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_horizon(mut self, horizon: impl Into<String>) -> Self {
        self.horizon = Some(horizon.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Normalized kpi and segment, if both are present and non-blank.
    fn identifiers(&self) -> Option<(String, String)> {
        let kpi = normalize_identifier(self.kpi.as_deref().unwrap_or_default());
        let segment = normalize_identifier(self.segment.as_deref().unwrap_or_default());
        (!kpi.is_empty() && !segment.is_empty()).then_some((kpi, segment))
    }
}

/// A slot update returned alongside the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEvent {
    Set { name: String, value: String },
}

/// Reply text plus slot updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub events: Vec<SlotEvent>,
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            events: vec![],
        }
    }

    pub fn with_slot(mut self, name: &str, value: &str) -> Self {
        self.events.push(SlotEvent::Set {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }
}

/// Interpret a horizon slot: numbers round up with a floor of 1, anything
/// else falls back to `default`.
pub fn coerce_horizon(raw: Option<&str>, default: usize) -> usize {
    let parsed = raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite());
    match parsed {
        Some(value) => value.ceil().max(1.0) as usize,
        None => default,
    }
}

/// Answers "what was KPI X for segment Y over period Z".
pub struct QueryHandler {
    source: Arc<dyn ObservationSource>,
}

impl QueryHandler {
    pub fn new(source: Arc<dyn ObservationSource>) -> Self {
        Self { source }
    }

    pub fn handle(&self, slots: &Slots) -> Result<Response> {
        let Some((kpi, segment)) = slots.identifiers() else {
            return Ok(Response::text(MISSING_QUERY_SLOTS));
        };
        tracing::info!(%kpi, %segment, period = ?slots.period, "kpi query");

        let observations = self.source.load()?;
        let series = slice_series(&observations, &kpi, &segment);
        let Some(latest) = series.last().copied() else {
            return Ok(Response::text(format!(
                "I could not find any history for {kpi} in the {segment} segment."
            )));
        };

        let selection = resolve(&series, slots.period.as_deref());
        if selection.subset.is_empty() {
            return Ok(Response::text(format::no_period_data(&latest)));
        }
        Ok(Response::text(format::query_summary(&kpi, &segment, &selection)))
    }
}

/// Answers "forecast KPI X for segment Y over the next N months".
pub struct ForecastHandler {
    source: Arc<dyn ObservationSource>,
    orchestrator: ForecastOrchestrator,
    default_horizon: usize,
}

impl ForecastHandler {
    pub fn new(source: Arc<dyn ObservationSource>, orchestrator: ForecastOrchestrator) -> Self {
        Self {
            source,
            orchestrator,
            default_horizon: DEFAULT_HORIZON,
        }
    }

    pub fn with_default_horizon(mut self, horizon: usize) -> Self {
        self.default_horizon = horizon.clamp(1, MAX_HORIZON);
        self
    }

    pub fn handle(&self, slots: &Slots) -> Result<Response> {
        let Some((kpi, segment)) = slots.identifiers() else {
            return Ok(Response::text(MISSING_FORECAST_SLOTS));
        };
        let requested = coerce_horizon(slots.horizon.as_deref(), self.default_horizon);
        let horizon = requested.min(MAX_HORIZON);
        tracing::info!(%kpi, %segment, horizon, model = ?slots.model, "kpi forecast");
        if horizon < requested {
            tracing::warn!(requested, horizon, "horizon capped");
        }

        let observations = self.source.load()?;
        let series = slice_series(&observations, &kpi, &segment);

        let response = match self.orchestrator.forecast(&series, horizon, slots.model.as_deref()) {
            ForecastOutcome::Forecast { result, selection } => {
                let mut text = format::forecast_summary(&kpi, &segment, &result);
                if horizon < requested {
                    text.push('\n');
                    text.push_str(&format::horizon_capped(requested, horizon));
                }
                let response = Response::text(text);
                match selection.marker() {
                    Some(marker) => response.with_slot(MODEL_SLOT, marker),
                    None => response,
                }
            }
            ForecastOutcome::InsufficientHistory { needed, .. } => Response::text(format!(
                "I need at least {needed} months of data to forecast reliably."
            )),
            ForecastOutcome::NoBackendAvailable => Response::text(NO_BACKEND),
            ForecastOutcome::BackendFailed { backend, .. } => Response::text(format!(
                "The {} forecast could not be computed right now.",
                format::backend_display_name(&backend)
            )),
        };
        Ok(response)
    }
}
