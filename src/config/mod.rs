use std::env;

use crate::error::AppError;

/// Session secret used when `SESSION_SECRET` is not set.
pub const DEFAULT_SESSION_SECRET: &str = "dev-secret-key";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
    pub synthesis: SynthesisConfig,
}

/// OpenAI API configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Absent key means insights always come from the static fallback.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session_secret: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
}

/// Flight data synthesis configuration
#[derive(Debug, Clone, Default)]
pub struct SynthesisConfig {
    /// Fixed RNG seed; `None` draws from entropy on every search.
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let openai = OpenAiConfig {
            api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
        };

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match env::var("PORT") {
                Ok(raw) => raw.parse().map_err(|_| AppError::Config {
                    message: format!("PORT must be a valid port number, got '{}'", raw),
                })?,
                Err(_) => 5000,
            },
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| DEFAULT_SESSION_SECRET.to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30000),
        };

        let synthesis = SynthesisConfig {
            seed: match env::var("FLIGHT_DATA_SEED") {
                Ok(raw) => Some(raw.parse().map_err(|_| AppError::Config {
                    message: format!("FLIGHT_DATA_SEED must be an unsigned integer, got '{}'", raw),
                })?),
                Err(_) => None,
            },
        };

        Ok(Config {
            openai,
            server,
            logging,
            request,
            synthesis,
        })
    }

    /// Whether an OpenAI key is available.
    pub fn has_openai_credentials(&self) -> bool {
        self.openai.api_key.is_some()
    }

    /// Whether the session secret is still the development default.
    pub fn uses_default_session_secret(&self) -> bool {
        self.server.session_secret == DEFAULT_SESSION_SECRET
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai: OpenAiConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            request: RequestConfig::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_credentials() {
        let config = Config::default();
        assert!(!config.has_openai_credentials());
        assert!(config.uses_default_session_secret());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.request.timeout_ms, 30000);
        assert!(config.synthesis.seed.is_none());
    }

    #[test]
    fn test_custom_secret_is_not_default() {
        let mut config = Config::default();
        config.server.session_secret = "a-real-secret".to_string();
        assert!(!config.uses_default_session_secret());
    }
}
