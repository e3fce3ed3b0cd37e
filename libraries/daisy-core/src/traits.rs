/// Collaborator traits for Daisy Player
use crate::auth::{Credentials, Session, SignUpRequest};
use crate::error::Result;
use async_trait::async_trait;

/// Authentication backend
///
/// Implementers talk to the hosted authentication service. The player only
/// consumes whether a session is active; everything else is opaque.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Sign in with email and password
    ///
    /// # Errors
    /// Returns `CoreError::Auth` with the service's message when rejected
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session>;

    /// Create a new account
    ///
    /// Returns `None` when the service requires confirmation before issuing a
    /// session.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Option<Session>>;

    /// End the current session on the service
    async fn sign_out(&self) -> Result<()>;

    /// Session persisted by the service from an earlier run, if any
    async fn current_session(&self) -> Result<Option<Session>>;
}
