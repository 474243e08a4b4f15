use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] OpenAiError),

    #[error("Export failed: {message}")]
    Export { message: String },

    #[error("Server error: {message}")]
    Server { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Search criteria validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingField { field: String },

    #[error("Invalid date format")]
    InvalidDate { field: String, value: String },

    #[error("End date must not be before start date")]
    InvertedRange { start: String, end: String },

    #[error("Date range must not exceed {max_days} days")]
    RangeTooLong { days: i64, max_days: i64 },
}

/// OpenAI API errors
#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("OpenAI credentials not configured")]
    MissingCredentials,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised by the dashboard refresh transport
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Refresh request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Refresh response could not be decoded: {message}")]
    Decode { message: String },

    #[error("Refresh transport error: {message}")]
    Transport { message: String },
}

impl ValidationError {
    /// Name of the form field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::InvalidDate { field, .. } => field,
            ValidationError::InvertedRange { .. } => "end_date",
            ValidationError::RangeTooLong { .. } => "end_date",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal {
            message: format!("JSON serialization error: {}", err),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport {
            message: err.to_string(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for OpenAI operations
pub type OpenAiResult<T> = Result<T, OpenAiError>;

/// Result type alias for refresh transport operations
pub type ClientResult<T> = Result<T, ClientError>;
