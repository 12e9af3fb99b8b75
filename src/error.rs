//! Error types for the TransIP DNS client

use thiserror::Error;

/// Result type alias for transip-dns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the library and CLI
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl Error {
    /// HTTP status carried by the error, if it came from an API response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status_code(),
            _ => None,
        }
    }
}

/// API and transport related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {message}")]
    Unauthorized { message: String },

    #[error("API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response type: {0}")]
    UnexpectedContentType(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Failed to sign authentication request: {0}")]
    Signing(String),
}

impl ApiError {
    /// The HTTP status code preserved from the response, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Network(format!("Failed to connect to API: {err}"))
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Login not configured. Set `login` in the configuration file.")]
    MissingLogin,

    #[error("Invalid private key: {0}")]
    PrivateKey(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Token persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token storage I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Token storage lock poisoned")]
    Poisoned,
}
