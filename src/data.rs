//! Observation sources.
//!
//! The history is a flat table with at least the columns `date`, `kpi`,
//! `segment` and `value`. Sources are read fresh for every request; a source
//! that cannot be read is a fatal error for the host, not a user message.

use crate::core::Observation;
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const REQUIRED_COLUMNS: [&str; 4] = ["date", "kpi", "segment", "value"];

/// Something that can produce the full observation history.
pub trait ObservationSource: Send + Sync {
    /// Load every observation. Identifiers come back normalized.
    fn load(&self) -> Result<Vec<Observation>>;
}

/// CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ObservationSource for CsvSource {
    fn load(&self) -> Result<Vec<Observation>> {
        let file = File::open(&self.path)
            .map_err(|e| Error::DataSource(format!("{}: {}", self.path.display(), e)))?;
        let observations = read_csv(BufReader::new(file))?;
        tracing::debug!(
            path = %self.path.display(),
            rows = observations.len(),
            "loaded observations"
        );
        Ok(observations)
    }
}

/// Observations held in memory; useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    observations: Vec<Observation>,
}

impl InMemorySource {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }
}

impl ObservationSource for InMemorySource {
    fn load(&self) -> Result<Vec<Observation>> {
        Ok(self.observations.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Row {
    date: String,
    kpi: String,
    segment: String,
    // Empty cells are missing readings, not schema errors.
    value: Option<f64>,
}

/// Parse observations from CSV text with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.eq_ignore_ascii_case(column)) {
            return Err(Error::Schema(format!("missing column '{column}'")));
        }
    }
    // Header names are matched case-insensitively.
    let lowered: csv::StringRecord = headers.iter().map(|h| h.to_lowercase()).collect();
    reader.set_headers(lowered);

    let mut observations = Vec::new();
    for (index, row) in reader.deserialize::<Row>().enumerate() {
        let row = row?;
        let date = parse_record_date(&row.date).ok_or_else(|| {
            // +2: one for the header, one for 1-based line numbers
            Error::Schema(format!("line {}: invalid date '{}'", index + 2, row.date))
        })?;
        let value = row.value.unwrap_or(f64::NAN);
        observations.push(Observation::new(date, &row.kpi, &row.segment, value));
    }
    Ok(observations)
}

fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
