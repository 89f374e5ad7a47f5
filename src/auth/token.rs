//! HS256 bearer tokens.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::error::AuthError;

/// Token payload. `id` names the user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub iat: u64,
    pub exp: u64,
}

/// Signs and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl Tokens {
    /// Returns `None` for an empty secret, which leaves admin routes closed.
    pub fn new(secret: &str, ttl: Duration) -> Option<Self> {
        if secret.is_empty() {
            return None;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Some(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Mints a token for `user_id` valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if signing fails.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let iat = now_secs();
        self.issue_claims(&Claims {
            id: user_id.to_string(),
            iat,
            exp: iat.saturating_add(self.ttl.as_secs()),
        })
    }

    /// Signs arbitrary claims. Used for tokens with a custom expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if signing fails.
    pub fn issue_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))
    }

    /// Checks signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for a bad signature, an expired
    /// token, or a malformed payload.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))
    }
}
