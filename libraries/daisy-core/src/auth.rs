//! Session gate
//!
//! `SessionService` owns the current authentication session. It is built once
//! at startup and handed to whatever needs the "is someone signed in" gate.

use crate::error::{CoreError, Result};
use crate::traits::AuthBackend;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Active authentication session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Service-side user id
    pub user_id: String,

    /// Account email
    pub email: String,

    /// Bearer token issued by the service
    pub access_token: String,

    /// First name from sign-up metadata
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name from sign-up metadata
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Sign-in form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are required
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(CoreError::invalid_input("Please fill in all fields"));
        }
        Ok(())
    }
}

/// Sign-up form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignUpRequest {
    /// All four fields are required
    pub fn validate(&self) -> Result<()> {
        let missing = [&self.email, &self.first_name, &self.last_name]
            .iter()
            .any(|field| field.trim().is_empty())
            || self.password.is_empty();

        if missing {
            return Err(CoreError::invalid_input("Please fill in all fields"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    loading: bool,
}

/// Owns the current session and gates access to the app
///
/// `loading` is only true until the first `restore()` finishes; sign-in and
/// sign-up never toggle it.
pub struct SessionService {
    backend: Arc<dyn AuthBackend>,
    state: RwLock<SessionState>,
}

impl SessionService {
    /// Create a service that has not restored its session yet
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(SessionState {
                session: None,
                loading: true,
            }),
        }
    }

    /// Load the session persisted by the backend
    ///
    /// Failures are logged and leave the user signed out.
    pub async fn restore(&self) {
        let restored = match self.backend.current_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to restore session");
                None
            }
        };

        let mut state = self.state.write().await;
        debug!(signed_in = restored.is_some(), "Session restored");
        state.session = restored;
        state.loading = false;
    }

    /// Sign in and keep the resulting session
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<()> {
        credentials.validate()?;
        let session = self.backend.sign_in(credentials).await?;
        info!(email = %session.email, "Signed in");
        self.state.write().await.session = Some(session);
        Ok(())
    }

    /// Create an account
    ///
    /// Returns whether a session was issued immediately.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<bool> {
        request.validate()?;
        let session = self.backend.sign_up(request).await?;
        let issued = session.is_some();
        if let Some(session) = session {
            info!(email = %session.email, "Signed up");
            self.state.write().await.session = Some(session);
        }
        Ok(issued)
    }

    /// Sign out
    ///
    /// The local session is cleared even if the backend call fails.
    pub async fn sign_out(&self) -> Result<()> {
        self.state.write().await.session = None;
        self.backend.sign_out().await
    }

    /// Check if a session is active
    pub async fn is_signed_in(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    /// Check if the initial restore is still running
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Get a copy of the current session
    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }
}
