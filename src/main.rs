use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flight_insights::{
    cli::{apply_serve_overrides, execute_generate, Cli, Command},
    config::{Config, LogFormat},
    flights::SearchForm,
    server::{AppState, DashboardServer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    let command = cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
        seed: None,
    });

    match command {
        Command::Generate {
            from,
            to,
            start,
            end,
            seed,
            booked_on,
            format,
        } => {
            let form = SearchForm {
                from_city: from,
                to_city: to,
                start_date: start,
                end_date: end,
            };
            let result = execute_generate(form, seed, booked_on.as_deref(), format);
            if result.exit_code == 0 {
                println!("{}", result.message);
            } else {
                eprintln!("{}", result.message);
            }
            std::process::exit(result.exit_code);
        }
        Command::Serve { host, port, seed } => {
            apply_serve_overrides(&mut config, host, port, seed);
        }
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Flight Insights starting..."
    );

    if config.uses_default_session_secret() {
        warn!("SESSION_SECRET not set, flash cookies are signed with the development key");
    }

    let state = Arc::new(AppState::new(config));
    let server = DashboardServer::new(state);

    if let Err(e) = server.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
