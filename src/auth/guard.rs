//! Bearer-token guard for mutating routes.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use std::sync::Arc;

use super::error::AuthError;
use super::token::Tokens;
use super::users::{Principal, UserDirectory};

/// Resolves the caller of a request and enforces the admin flag.
#[derive(Clone)]
pub struct AccessGuard {
    tokens: Option<Arc<Tokens>>,
    users: UserDirectory,
}

impl AccessGuard {
    /// `tokens` is `None` when no signing secret is configured; every
    /// authentication attempt then fails with [`AuthError::NotConfigured`].
    pub fn new(tokens: Option<Tokens>, users: UserDirectory) -> Self {
        Self {
            tokens: tokens.map(Arc::new),
            users,
        }
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn tokens(&self) -> Option<&Tokens> {
        self.tokens.as_deref()
    }

    /// Pulls the token out of `Authorization: Bearer <token>`.
    fn bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
        let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
        let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

        let (scheme, token) = value
            .trim()
            .split_once(' ')
            .ok_or(AuthError::MalformedHeader)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::MalformedHeader);
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(token)
    }

    /// Verifies the bearer token and loads its principal.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized [`AuthError`] for a missing, malformed, invalid
    /// or expired token and for a token whose user no longer exists.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = Self::bearer(headers)?;
        let tokens = self.tokens.as_ref().ok_or(AuthError::NotConfigured)?;
        let claims = tokens.verify(token)?;

        self.users
            .find(&claims.id)
            .await?
            .map(Principal::from)
            .ok_or(AuthError::UnknownPrincipal)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::NotAdmin`] unless the principal is an admin.
    pub fn require_admin(&self, principal: Principal) -> Result<Principal, AuthError> {
        if principal.is_admin {
            Ok(principal)
        } else {
            Err(AuthError::NotAdmin)
        }
    }
}
