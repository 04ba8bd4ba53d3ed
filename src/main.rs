//! # kpi-forecast
//!
//! Command-line host for KPI lookups and forecasts.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use kpi_forecast::backend::Backends;
use kpi_forecast::config::Settings;
use kpi_forecast::data::CsvSource;
use kpi_forecast::handlers::{ForecastHandler, QueryHandler, Response, SlotEvent, Slots};
use kpi_forecast::orchestrator::ForecastOrchestrator;

#[derive(Parser)]
#[command(name = "kpi-forecast")]
#[command(about = "Monthly KPI lookups and forecasts", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History CSV; overrides data.path
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show KPI values for a period
    Query {
        #[arg(short, long)]
        kpi: String,

        #[arg(short, long)]
        segment: String,

        /// Period expression, e.g. "ytd", "last 2 quarters", "2024-Q1"
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Forecast a KPI
    Forecast {
        #[arg(short, long)]
        kpi: String,

        #[arg(short, long)]
        segment: String,

        /// Months ahead; fractional values round up
        #[arg(long)]
        horizon: Option<String>,

        /// Preferred model (prophet, arima)
        #[arg(short, long)]
        model: Option<String>,
    },
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("kpi_forecast={}", settings.logging.level).into());

    let fmt_layer = if settings.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_response(response: &Response) {
    println!("{}", response.text);
    for event in &response.events {
        match event {
            SlotEvent::Set { name, value } => println!("[slot] {name} = {value}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(path) = cli.data {
        settings.data.path = path;
    }
    init_tracing(&settings);

    let availability = settings.availability();
    tracing::info!(
        prophet = availability.prophet,
        arima = availability.arima,
        data = %settings.data.path.display(),
        "starting"
    );

    let source = Arc::new(CsvSource::new(settings.data.path.clone()));

    let response = match cli.command {
        Commands::Query {
            kpi,
            segment,
            period,
        } => {
            let slots = Slots {
                period,
                ..Slots::new(kpi, segment)
            };
            QueryHandler::new(source).handle(&slots)
        }
        Commands::Forecast {
            kpi,
            segment,
            horizon,
            model,
        } => {
            let backends = Backends::from_availability(
                availability,
                settings.backends.prophet_interval_width,
            );
            let orchestrator =
                ForecastOrchestrator::new(backends).with_min_history(settings.forecast.min_history);
            let slots = Slots {
                horizon,
                model,
                ..Slots::new(kpi, segment)
            };
            ForecastHandler::new(source, orchestrator)
                .with_default_horizon(settings.forecast.default_horizon)
                .handle(&slots)
        }
    }
    .context("failed to load KPI history")?;

    print_response(&response);
    Ok(())
}
