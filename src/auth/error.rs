//! Access guard errors.

use crate::records::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not authorized, no token")]
    MissingToken,

    #[error("Not authorized, malformed authorization header")]
    MalformedHeader,

    #[error("Not authorized, token failed: {0}")]
    InvalidToken(String),

    #[error("Not authorized, token authentication is not configured")]
    NotConfigured,

    #[error("Not authorized, user not found")]
    UnknownPrincipal,

    #[error("Not authorized as an admin")]
    NotAdmin,

    #[error("User store error: {0}")]
    Store(#[from] RecordError),
}

impl AuthError {
    /// True for every variant that means "who are you?" rather than
    /// "you may not".
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, Self::NotAdmin | Self::Store(_))
    }

    /// Short machine-readable reason used in audit events.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::MalformedHeader => "malformed_header",
            Self::InvalidToken(_) => "invalid_token",
            Self::NotConfigured => "not_configured",
            Self::UnknownPrincipal => "unknown_principal",
            Self::NotAdmin => "not_admin",
            Self::Store(_) => "store_error",
        }
    }
}
