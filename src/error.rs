//! Error types for the kpi-forecast crate.
//!
//! Request-level problems (missing slots, no history, too little history,
//! no backend) are modelled as outcomes, not errors. The variants here cover
//! invalid inputs to the numeric layer and failures the host must handle:
//! a data source that cannot be loaded or a bad configuration.

use thiserror::Error;

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data or computing forecasts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model must be fitted before prediction.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Dates out of order or not aligned to a month start.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// The observation source could not be read.
    #[error("data source error: {0}")]
    DataSource(String),

    /// The observation source does not have the expected columns or types.
    #[error("schema error: {0}")]
    Schema(String),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => Error::DataSource(err.to_string()),
            _ => Error::Schema(err.to_string()),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
