//! Runtime settings.
//!
//! Loaded from an optional TOML file, then `KPI_FORECAST__*` environment
//! variables (`KPI_FORECAST__BACKENDS__PROPHET_ENABLED=false`). Every field
//! has a default, so an empty configuration is valid.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::backend::BackendAvailability;
use crate::error::{Error, Result};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "KPI_FORECAST";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub backends: BackendConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file with `date,kpi,segment,value` columns.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_true")]
    pub prophet_enabled: bool,
    #[serde(default = "default_true")]
    pub arima_enabled: bool,
    /// Interval coverage the Prophet-style backend computes.
    #[serde(default = "default_interval_width")]
    pub prophet_interval_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_horizon")]
    pub default_horizon: usize,
    #[serde(default = "default_min_history")]
    pub min_history: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/kpi_history.csv")
}

fn default_true() -> bool {
    true
}

fn default_interval_width() -> f64 {
    0.95
}

fn default_horizon() -> usize {
    3
}

fn default_min_history() -> usize {
    6
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            prophet_enabled: true,
            arima_enabled: true,
            prophet_interval_width: default_interval_width(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_horizon: default_horizon(),
            min_history: default_min_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(
            path,
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(env);

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let width = self.backends.prophet_interval_width;
        if !(width > 0.0 && width < 1.0) {
            return Err(Error::Config(format!(
                "backends.prophet_interval_width must be in (0, 1), got {width}"
            )));
        }
        if self.forecast.default_horizon == 0 {
            return Err(Error::Config(
                "forecast.default_horizon must be at least 1".to_string(),
            ));
        }
        if self.forecast.min_history == 0 {
            return Err(Error::Config(
                "forecast.min_history must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Compiled backends restricted by the `backends.*_enabled` flags.
    pub fn availability(&self) -> BackendAvailability {
        BackendAvailability::from_flags(self.backends.prophet_enabled, self.backends.arima_enabled)
    }
}
