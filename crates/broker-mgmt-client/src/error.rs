//! Error types for the management API client

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the management API client
#[derive(Debug, Error)]
pub enum Error {
    /// The management API could not be reached, or the exchange broke off
    /// mid-request (refused connection, DNS failure, timeout, truncated body)
    #[error("Connection failed: {0}")]
    ConnectionError(#[source] reqwest::Error),

    /// The API answered with a status other than success or 404
    #[error("Management API returned {status}: {body}")]
    StatusError { status: StatusCode, body: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    AuthError(String),
}

impl Error {
    /// True for transport-level failures, as opposed to anything the API
    /// itself answered with
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::ConnectionError(_))
    }
}

/// Result type alias for the management API client
pub type Result<T> = std::result::Result<T, Error>;
