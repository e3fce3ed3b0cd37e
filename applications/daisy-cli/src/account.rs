/// Local account store
///
/// Accounts and the signed-in session live in the preferences table, so a
/// session survives restarts the way a hosted service's persisted session
/// would. Passwords are stored as bcrypt hashes.
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use daisy_core::{AuthBackend, CoreError, Credentials, Session, SignUpRequest};
use daisy_storage::preferences;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Preference key holding every registered account
pub const KEY_ACCOUNTS: &str = "accounts";

/// Preference key holding the signed-in session
pub const KEY_SESSION: &str = "authSession";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    user_id: String,
    password_hash: String,
    first_name: String,
    last_name: String,
}

pub struct LocalAccounts {
    pool: SqlitePool,
}

impl LocalAccounts {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn accounts(&self) -> daisy_core::Result<BTreeMap<String, StoredAccount>> {
        match preferences::get_preference(&self.pool, KEY_ACCOUNTS)
            .await
            .map_err(storage_error)?
        {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| CoreError::auth(format!("Corrupt account store: {e}"))),
            None => Ok(BTreeMap::new()),
        }
    }

    async fn save_accounts(
        &self,
        accounts: &BTreeMap<String, StoredAccount>,
    ) -> daisy_core::Result<()> {
        let json = serde_json::to_string(accounts).map_err(|e| CoreError::auth(e.to_string()))?;
        preferences::set_preference(&self.pool, KEY_ACCOUNTS, &json)
            .await
            .map_err(storage_error)
    }

    async fn start_session(
        &self,
        email: &str,
        account: &StoredAccount,
    ) -> daisy_core::Result<Session> {
        let session = Session {
            user_id: account.user_id.clone(),
            email: email.to_string(),
            access_token: random_token(),
            first_name: Some(account.first_name.clone()),
            last_name: Some(account.last_name.clone()),
        };
        let json = serde_json::to_string(&session).map_err(|e| CoreError::auth(e.to_string()))?;
        preferences::set_preference(&self.pool, KEY_SESSION, &json)
            .await
            .map_err(storage_error)?;
        Ok(session)
    }
}

#[async_trait]
impl AuthBackend for LocalAccounts {
    async fn sign_in(&self, credentials: &Credentials) -> daisy_core::Result<Session> {
        let email = normalize(&credentials.email);
        let accounts = self.accounts().await?;

        let Some(account) = accounts.get(&email) else {
            return Err(CoreError::auth("Invalid login credentials"));
        };

        let verified = bcrypt::verify(&credentials.password, &account.password_hash)
            .map_err(|e| CoreError::auth(format!("Stored password unreadable: {e}")))?;
        if !verified {
            return Err(CoreError::auth("Invalid login credentials"));
        }
        self.start_session(&email, account).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> daisy_core::Result<Option<Session>> {
        let email = normalize(&request.email);
        let mut accounts = self.accounts().await?;
        if accounts.contains_key(&email) {
            return Err(CoreError::auth("User already registered"));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| CoreError::auth(e.to_string()))?;
        let account = StoredAccount {
            user_id: random_token(),
            password_hash,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
        };
        accounts.insert(email.clone(), account.clone());
        self.save_accounts(&accounts).await?;
        debug!(%email, "Account created");

        self.start_session(&email, &account).await.map(Some)
    }

    async fn sign_out(&self) -> daisy_core::Result<()> {
        preferences::delete_preference(&self.pool, KEY_SESSION)
            .await
            .map_err(storage_error)
    }

    async fn current_session(&self) -> daisy_core::Result<Option<Session>> {
        let Some(json) = preferences::get_preference(&self.pool, KEY_SESSION)
            .await
            .map_err(storage_error)?
        else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "Ignoring stored session");
                Ok(None)
            }
        }
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn random_token() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn storage_error(err: daisy_storage::StorageError) -> CoreError {
    CoreError::auth(format!("Account storage unavailable: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn accounts() -> LocalAccounts {
        LocalAccounts::new(daisy_storage::in_memory().await.unwrap())
    }

    fn ada() -> SignUpRequest {
        SignUpRequest {
            email: "Ada@Example.com ".to_string(),
            password: "engine".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn sign_up_issues_a_persisted_session() {
        let store = accounts().await;
        let session = store.sign_up(&ada()).await.unwrap().unwrap();

        assert_eq!(session.email, "ada@example.com");
        assert_eq!(session.first_name.as_deref(), Some("Ada"));
        assert_eq!(store.current_session().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let store = accounts().await;
        store.sign_up(&ada()).await.unwrap();
        assert!(matches!(store.sign_up(&ada()).await, Err(CoreError::Auth(_))));
    }

    #[tokio::test]
    async fn sign_in_checks_the_password() {
        let store = accounts().await;
        store.sign_up(&ada()).await.unwrap();
        store.sign_out().await.unwrap();
        assert_eq!(store.current_session().await.unwrap(), None);

        let wrong = Credentials::new("ada@example.com", "loom");
        assert!(matches!(store.sign_in(&wrong).await, Err(CoreError::Auth(_))));

        let unknown = Credentials::new("grace@example.com", "engine");
        assert!(store.sign_in(&unknown).await.is_err());

        let session = store
            .sign_in(&Credentials::new("ADA@example.com", "engine"))
            .await
            .unwrap();
        assert_eq!(session.email, "ada@example.com");
        assert!(store.current_session().await.unwrap().is_some());
    }
}
