//! HTTP error mapping.
//!
//! Every failure renders as `{"message": "..."}` with a status code chosen
//! by error kind.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::gallery::GalleryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<GalleryError> for AppError {
    fn from(err: GalleryError) -> Self {
        let message = err.to_string();
        match err {
            GalleryError::MissingFile
            | GalleryError::PayloadTooLarge { .. }
            | GalleryError::UnsupportedMediaType(_) => Self::BadRequest(message),
            GalleryError::NotFound(_) => Self::NotFound(message),
            GalleryError::StorageUnavailable(_) | GalleryError::Store(_) => Self::Internal(message),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::NotAdmin => Self::Forbidden(message),
            AuthError::Store(_) => Self::Internal(message),
            _ => Self::Unauthorized(message),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::NotFound { .. } => Self::NotFound(message),
            CatalogError::Invalid(_) => Self::BadRequest(message),
            CatalogError::Store(_) => Self::Internal(message),
        }
    }
}
