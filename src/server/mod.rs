//! HTTP server for the flight dashboard.
//!
//! This module provides:
//! - Page and API handlers
//! - Chart specification and HTML rendering
//! - Signed flash messages for form errors
//! - Shared application state

mod charts;
mod flash;
mod handlers;
mod render;

pub use charts::*;
pub use flash::*;
pub use handlers::*;
pub use render::*;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::dashboard::REFRESH_PATH;
use crate::error::{AppError, AppResult};
use crate::flights::FlightSynthesizer;
use crate::insights::InsightGenerator;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Flight data generator.
    pub synthesizer: FlightSynthesizer,
    /// AI insights with static fallback.
    pub insights: InsightGenerator,
    /// Flash cookie signer keyed from the session secret.
    pub flash: FlashSigner,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Self {
        let synthesizer = FlightSynthesizer::new(&config.synthesis);
        let insights = InsightGenerator::new(&config);
        Self::with_parts(config, synthesizer, insights)
    }

    /// Assemble state from explicit parts
    pub fn with_parts(
        config: Config,
        synthesizer: FlightSynthesizer,
        insights: InsightGenerator,
    ) -> Self {
        if let Some(seed) = synthesizer.seed() {
            info!(seed, "Flight data synthesis is seeded");
        }
        let flash = FlashSigner::new(&config.server.session_secret);
        Self {
            config,
            synthesizer,
            insights,
            flash,
        }
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route(
            "/dashboard",
            get(handle_dashboard_redirect).post(handle_dashboard),
        )
        .route(REFRESH_PATH, post(handle_refresh_insights))
        .route("/static/dashboard.js", get(handle_dashboard_script))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Dashboard HTTP server
pub struct DashboardServer {
    state: SharedState,
}

impl DashboardServer {
    /// Create a new server
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Socket address from the configured host and port
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        let server = &self.state.config.server;
        format!("{}:{}", server.host, server.port)
            .parse()
            .map_err(|e| AppError::Config {
                message: format!(
                    "Invalid listen address {}:{}: {}",
                    server.host, server.port, e
                ),
            })
    }

    /// Serve until Ctrl-C
    pub async fn run(&self) -> AppResult<()> {
        let addr = self.bind_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Server {
                message: format!("Failed to bind {}: {}", addr, e),
            })?;

        info!(address = %addr, "Dashboard listening");

        axum::serve(listener, router(Arc::clone(&self.state)))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Server {
                message: e.to_string(),
            })
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5050,
                session_secret: "test-secret".to_string(),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_app_state_new_without_key() {
        let state = AppState::new(test_config());
        assert!(!state.insights.is_ai_enabled());
        assert_eq!(state.synthesizer.seed(), None);
    }

    #[test]
    fn test_app_state_clone() {
        let state = AppState::with_parts(
            test_config(),
            FlightSynthesizer::seeded(9),
            InsightGenerator::fallback_only(),
        );
        let cloned = state.clone();
        assert_eq!(cloned.synthesizer.seed(), Some(9));
        assert_eq!(cloned.config.server.port, 5050);
    }

    #[test]
    fn test_flash_signer_uses_session_secret() {
        let state = AppState::new(test_config());
        let value = FlashSigner::new("test-secret").sign("hello");
        assert_eq!(state.flash.verify(&value), Some("hello".to_string()));
    }

    #[test]
    fn test_bind_addr() {
        let server = DashboardServer::new(Arc::new(AppState::new(test_config())));
        assert_eq!(
            server.bind_addr().unwrap(),
            "127.0.0.1:5050".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_bind_addr_rejects_bad_host() {
        let mut config = test_config();
        config.server.host = "not a host".to_string();
        let server = DashboardServer::new(Arc::new(AppState::new(config)));
        assert!(matches!(
            server.bind_addr(),
            Err(AppError::Config { .. })
        ));
    }
}
