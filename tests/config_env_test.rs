//! Config environment variable tests
//!
//! These tests verify that Config::from_env() correctly reads and applies
//! environment variable overrides.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use flight_insights::config::{Config, LogFormat, DEFAULT_SESSION_SECRET};
use flight_insights::AppError;
use serial_test::serial;
use std::env;

const VARS: [&str; 10] = [
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "OPENAI_MODEL",
    "SESSION_SECRET",
    "HOST",
    "PORT",
    "REQUEST_TIMEOUT_MS",
    "FLIGHT_DATA_SEED",
    "LOG_LEVEL",
    "LOG_FORMAT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_config_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config.openai.api_key, None);
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.session_secret, DEFAULT_SESSION_SECRET);
    assert_eq!(config.request.timeout_ms, 30000);
    assert_eq!(config.synthesis.seed, None);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_config_from_env_openai_overrides() {
    clear_env();
    env::set_var("OPENAI_API_KEY", "sk-test");
    env::set_var("OPENAI_BASE_URL", "http://localhost:9999");
    env::set_var("OPENAI_MODEL", "gpt-4o-mini");

    let config = Config::from_env().unwrap();
    assert!(config.has_openai_credentials());
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.openai.base_url, "http://localhost:9999");
    assert_eq!(config.openai.model, "gpt-4o-mini");

    clear_env();
}

#[test]
#[serial]
fn test_config_from_env_blank_key_is_absent() {
    clear_env();
    env::set_var("OPENAI_API_KEY", "   ");

    let config = Config::from_env().unwrap();
    assert!(!config.has_openai_credentials());

    clear_env();
}

#[test]
#[serial]
fn test_config_from_env_server_overrides() {
    clear_env();
    env::set_var("HOST", "127.0.0.1");
    env::set_var("PORT", "8081");
    env::set_var("SESSION_SECRET", "s3cret");

    let config = Config::from_env().unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8081);
    assert!(!config.uses_default_session_secret());

    clear_env();
}

#[test]
#[serial]
fn test_config_from_env_invalid_port() {
    clear_env();
    env::set_var("PORT", "eighty");

    let result = Config::from_env();
    assert!(matches!(result, Err(AppError::Config { .. })));

    clear_env();
}

#[test]
#[serial]
fn test_config_from_env_seed() {
    clear_env();
    env::set_var("FLIGHT_DATA_SEED", "1234");
    assert_eq!(Config::from_env().unwrap().synthesis.seed, Some(1234));

    env::set_var("FLIGHT_DATA_SEED", "-1");
    assert!(matches!(Config::from_env(), Err(AppError::Config { .. })));

    clear_env();
}

#[test]
#[serial]
fn test_config_from_env_json_log_format() {
    clear_env();
    env::set_var("LOG_FORMAT", "JSON");
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.level, "debug");

    clear_env();
}

#[test]
#[serial]
fn test_config_from_env_bad_timeout_uses_default() {
    clear_env();
    env::set_var("REQUEST_TIMEOUT_MS", "soon");

    assert_eq!(Config::from_env().unwrap().request.timeout_ms, 30000);

    clear_env();
}
