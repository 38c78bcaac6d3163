//! CLI entry point for the railway journeys dashboard.
//!
//! Loads the journey table once, then filters and aggregates it according to
//! the picker flags: logging a summary, writing a JSON report, listing the
//! available filter options, or exporting the filtered journeys.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use railway_dashboard::config::DashboardConfig;
use railway_dashboard::dataset::{DataSource, DatasetCell, load};
use railway_dashboard::filter::{ALL, FilterOptions, RawSelection, apply};
use railway_dashboard::output::{log_view, print_json, print_pretty, write_report, write_subset_csv};
use railway_dashboard::session::{DashboardSession, resolve};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static DATASET: DatasetCell = DatasetCell::new();

#[derive(Parser)]
#[command(name = "railway_dashboard")]
#[command(about = "Filter and aggregate railway journey data", long_about = None)]
struct Cli {
    /// Path or URL of the journey CSV, optionally gzip-compressed
    #[arg(long, global = true, value_name = "FILE_OR_URL")]
    data: Option<String>,

    /// JSON file with dashboard settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log the KPIs and every chart projection for the selection
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the dashboard view for the selection as JSON
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// File to write the report to
        #[arg(short, long, default_value = "dashboard.json")]
        output: PathBuf,

        /// Gzip compress the report
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// List the values each filter accepts
    Options,
    /// Write the journeys matching the selection as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "filtered_journeys.csv")]
        output: PathBuf,
    },
}

/// Picker selections. Each list flag is repeatable; `All` means unrestricted.
#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// First journey date to include (defaults to the earliest in the data)
    #[arg(long, value_name = "YYYY-MM-DD")]
    from: Option<NaiveDate>,

    /// Last journey date to include (defaults to the latest in the data)
    #[arg(long, value_name = "YYYY-MM-DD")]
    to: Option<NaiveDate>,

    /// Hour bucket, e.g. "09 AM"
    #[arg(long = "hour", default_value = ALL)]
    hours: Vec<String>,

    /// Day of week, e.g. "Monday"
    #[arg(long = "day", default_value = ALL)]
    days: Vec<String>,

    /// Departure station
    #[arg(long = "departure", default_value = ALL)]
    departures: Vec<String>,

    /// Arrival station
    #[arg(long = "arrival", default_value = ALL)]
    arrivals: Vec<String>,
}

impl From<FilterArgs> for RawSelection {
    fn from(args: FilterArgs) -> Self {
        RawSelection {
            start: args.from,
            end: args.to,
            hours: args.hours,
            days: args.days,
            departures: args.departures,
            arrivals: args.arrivals,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_env_overrides(|key| std::env::var(key).ok());
    if let Some(data) = &cli.data {
        config.data_source = data.clone();
    }

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("railway_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let source = DataSource::parse(&config.data_source);
    let (store, _summary) = load(&source)
        .await
        .with_context(|| format!("loading dataset from {source}"))?;
    let store = DATASET.init(store)?;

    match cli.command {
        Commands::Summary { filters } => {
            let mut session = DashboardSession::new(store, config.top_routes);
            let view = session.refresh(&filters.into())?;
            print_pretty(&view);
            log_view(&view);
        }
        Commands::Report {
            filters,
            output,
            gzip,
        } => {
            let mut session = DashboardSession::new(store, config.top_routes);
            let view = session.refresh(&filters.into())?;
            write_report(&output, &view, gzip)
                .with_context(|| format!("writing report to {}", output.display()))?;
            info!(
                path = %output.display(),
                gzip,
                journeys = view.kpis.total_journeys,
                "Report written"
            );
        }
        Commands::Options => {
            print_json(&FilterOptions::from_store(&store))?;
        }
        Commands::Export { filters, output } => {
            let criteria = resolve(&store, &filters.into())?;
            let subset = apply(&store, &criteria);
            let rows = write_subset_csv(&output, &subset)
                .with_context(|| format!("exporting journeys to {}", output.display()))?;
            info!(path = %output.display(), rows, "Filtered journeys exported");
        }
    }

    Ok(())
}
