//! Raw KPI observations as delivered by the data source.

use chrono::NaiveDate;

/// Normalize a KPI or segment identifier for comparison.
///
/// Identifiers are case-insensitive; surrounding whitespace is ignored.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A single dated reading of a KPI within a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    date: NaiveDate,
    kpi: String,
    segment: String,
    value: f64,
}

impl Observation {
    /// Create an observation, normalizing the identifiers.
    pub fn new(date: NaiveDate, kpi: &str, segment: &str, value: f64) -> Self {
        Self {
            date,
            kpi: normalize_identifier(kpi),
            segment: normalize_identifier(segment),
            value,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Normalized KPI identifier.
    pub fn kpi(&self) -> &str {
        &self.kpi
    }

    /// Normalized segment identifier.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether this observation belongs to the given (kpi, segment) pair.
    ///
    /// Both arguments must already be normalized with [`normalize_identifier`].
    pub fn matches(&self, kpi: &str, segment: &str) -> bool {
        self.kpi == kpi && self.segment == segment
    }
}
