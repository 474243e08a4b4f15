//! # Flight Insights
//!
//! A flight price dashboard. A search synthesizes a plausible set of flights
//! for a route and date range, summarizes them, asks OpenAI for analyst-style
//! insights and renders everything as a single interactive page.
//!
//! ## Features
//!
//! - **Synthetic flight data**: seasonal, weekday, time-of-day and
//!   advance-purchase pricing over a configurable seed
//! - **Statistics**: price extremes, weekday averages, route and airline counts
//! - **AI insights**: OpenAI chat completions in JSON mode with a static
//!   fallback whenever the service is unavailable
//! - **Dashboard**: Plotly charts, a filterable table, CSV export and
//!   on-demand insight refresh
//!
//! ## Architecture
//!
//! ```text
//! Browser → axum (Rust) → FlightSynthesizer → summarize
//!                       ↘ InsightGenerator → OpenAI (HTTP)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flight_insights::{AppState, Config, DashboardServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let state = Arc::new(AppState::new(config));
//!     DashboardServer::new(state).run().await?;
//!     Ok(())
//! }
//! ```

/// Command-line interface.
pub mod cli;
/// Configuration management.
pub mod config;
/// Client-side dashboard controller, table model and refresh transport.
pub mod dashboard;
/// Error types and result aliases for the application.
pub mod error;
/// CSV export of flight records.
pub mod export;
/// Flight record types and the synthetic data generator.
pub mod flights;
/// Insight generation with static fallback.
pub mod insights;
/// OpenAI API client and types.
pub mod openai;
/// System prompts for the insight model.
pub mod prompts;
/// HTTP server, handlers and page rendering.
pub mod server;
/// Summary statistics over flight records.
pub mod stats;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, DashboardServer, SharedState};
