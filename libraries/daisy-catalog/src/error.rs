//! Error types for the remote catalog clients.

use thiserror::Error;

/// Authentication failures, kept separate so callers can prompt for login.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No token to authenticate with
    #[error("Not connected: no token available")]
    MissingToken,

    /// The service rejected a previously valid token; it has been cleared
    #[error("Session expired, please reconnect")]
    SessionExpired,

    /// The service refused an authorization or refresh attempt
    #[error("Authorization rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur when talking to a remote catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Authentication problem
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Service returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// A required setting is missing
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    /// Invalid base URL in configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse a response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl CatalogError {
    /// Check if the error means the user has to (re)connect
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
