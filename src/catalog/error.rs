//! Catalog errors.

use crate::records::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{what} not found")]
    NotFound { what: &'static str, id: String },

    #[error("{0}")]
    Invalid(String),

    #[error("Catalog store error: {0}")]
    Store(RecordError),
}

impl CatalogError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

impl From<RecordError> for CatalogError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound { collection, id } => Self::NotFound {
                what: match collection {
                    "products" => "Product",
                    "reviews" => "Review",
                    _ => "Record",
                },
                id,
            },
            RecordError::Invalid { reason, .. } => Self::Invalid(reason),
            other => Self::Store(other),
        }
    }
}
