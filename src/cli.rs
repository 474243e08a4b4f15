//! Command-line interface.
//!
//! `serve` runs the dashboard server and is the default when no subcommand
//! is given. `generate` synthesizes flight data offline and prints it.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::export::to_csv;
use crate::flights::{FlightSynthesizer, SearchCriteria, SearchForm, DATE_FORMAT};
use crate::insights::fallback_insights;
use crate::stats::summarize;

/// Flight price dashboard
#[derive(Parser, Debug)]
#[command(name = "flight-insights", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the dashboard HTTP server
    Serve {
        /// Interface to bind (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Fixed synthesis seed (overrides FLIGHT_DATA_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate flight data and print it
    Generate {
        /// Origin city
        #[arg(long)]
        from: String,

        /// Destination city
        #[arg(long)]
        to: String,

        /// First travel date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last travel date, YYYY-MM-DD
        #[arg(long)]
        end: String,

        /// Fixed synthesis seed
        #[arg(long)]
        seed: Option<u64>,

        /// Booking date for advance-purchase pricing, YYYY-MM-DD (default today)
        #[arg(long)]
        booked_on: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

/// Output format for `generate`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Summary,
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

/// Apply `serve` flag overrides on top of environment configuration.
pub fn apply_serve_overrides(
    config: &mut Config,
    host: Option<String>,
    port: Option<u16>,
    seed: Option<u64>,
) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if seed.is_some() {
        config.synthesis.seed = seed;
    }
}

/// Execute the `generate` command.
pub fn execute_generate(
    form: SearchForm,
    seed: Option<u64>,
    booked_on: Option<&str>,
    format: OutputFormat,
) -> CliResult {
    let criteria = match SearchCriteria::try_from(form) {
        Ok(c) => c,
        Err(e) => return CliResult::error(format!("{} ({})", e, e.field())),
    };

    let booked_on = match booked_on {
        Some(text) => match NaiveDate::parse_from_str(text, DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => return CliResult::error(format!("Invalid booking date: {}", text)),
        },
        None => Local::now().date_naive(),
    };

    let synthesizer = match seed {
        Some(seed) => FlightSynthesizer::seeded(seed),
        None => FlightSynthesizer::default(),
    };
    let records = synthesizer.generate(&criteria, booked_on);

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&records) {
            Ok(json) => CliResult::success(json),
            Err(e) => CliResult::error(format!("Failed to serialize records: {}", e)),
        },
        OutputFormat::Csv => match to_csv(&records) {
            Ok(csv) => CliResult::success(csv),
            Err(e) => CliResult::error(e.to_string()),
        },
        OutputFormat::Summary => {
            let summary = summarize(&records);
            let insights = fallback_insights(&summary);
            let mut out = format!(
                "{} flights from {} to {}, {} to {}\n",
                summary.total_flights,
                criteria.origin,
                criteria.destination,
                criteria.start_date,
                criteria.end_date
            );
            out.push_str(&format!(
                "Average ${:.2}, range ${} to ${}\n",
                summary.average_price,
                summary.min_price.unwrap_or_default(),
                summary.max_price.unwrap_or_default()
            ));
            out.push_str(&format!(
                "Cheapest day: {}, most expensive day: {}\n",
                insights.key_statistics.cheapest_day, insights.key_statistics.most_expensive_day
            ));
            for recommendation in &insights.recommendations {
                out.push_str(&format!("- {}\n", recommendation));
            }
            CliResult::success(out.trim_end())
        }
    }
}
