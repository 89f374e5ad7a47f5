//! Gallery error taxonomy.

use crate::assets::AssetError;
use crate::records::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("No image file was provided")]
    MissingFile,

    #[error("Image exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },

    #[error("Unsupported file type '{0}', only images are accepted")]
    UnsupportedMediaType(String),

    #[error("Image not found")]
    NotFound(String),

    #[error("Image storage unavailable: {0}")]
    StorageUnavailable(#[from] AssetError),

    #[error("Gallery store error: {0}")]
    Store(RecordError),
}

impl From<RecordError> for GalleryError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound { id, .. } => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}
