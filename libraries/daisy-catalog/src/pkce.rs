//! PKCE (RFC 7636) verifier and S256 challenge.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// A code verifier and its derived challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge {
    /// Secret sent with the code exchange
    pub verifier: String,

    /// `BASE64URL(SHA256(verifier))`, sent with the authorize request
    pub challenge: String,
}

impl PkceChallenge {
    /// Generate a fresh verifier from 32 random bytes.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_verifier(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Derive the challenge for a known verifier.
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }

    /// Challenge method name for the authorize request.
    pub fn method(&self) -> &'static str {
        "S256"
    }
}
