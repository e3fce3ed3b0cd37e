/// Core error types for Daisy Player
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Daisy Player
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Form or argument validation failed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The authentication collaborator rejected the request
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}
