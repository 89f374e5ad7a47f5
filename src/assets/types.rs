//! Types shared by the asset backends.

use bytes::Bytes;
use std::path::Path;

/// Errors surfaced by the asset store adapter.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The backend failed or timed out while storing an image.
    #[error("asset storage unavailable ({backend}): {reason}")]
    Unavailable {
        backend: &'static str,
        reason: String,
    },

    /// No asset identifier can be derived from the URL.
    #[error("cannot derive asset identifier from URL: {0}")]
    UnresolvableUrl(String),
}

/// An image held in memory on its way to the asset store.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl ImagePayload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
            file_name: None,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Declared content type, else guessed from the file name, else
    /// `application/octet-stream`. Parameters after `;` are dropped.
    pub fn resolved_content_type(&self) -> String {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
            .or_else(|| {
                self.file_name
                    .as_deref()
                    .and_then(|name| mime_guess::from_path(name).first())
                    .map(|mime| mime.essence_str().to_string())
            })
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }

    pub fn is_image(&self) -> bool {
        self.resolved_content_type().starts_with("image/")
    }

    /// Extension for raster types a browser renders inertly, `None` for
    /// anything else (including `image/svg+xml`).
    ///
    /// The client's file name only picks between spellings of the same type
    /// (`photo.jpeg` stays `jpeg`); it never overrides the content type.
    pub fn raster_extension(&self) -> Option<&'static str> {
        let content_type = self.resolved_content_type();
        let canonical = RASTER_EXTENSIONS
            .iter()
            .find(|(ct, _)| *ct == content_type)
            .map(|(_, ext)| *ext)?;

        let declared = self
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let alias = declared.and_then(|ext| {
            mime_guess::get_mime_extensions_str(&content_type)?
                .iter()
                .copied()
                .find(|known| *known == ext)
        });

        Some(alias.unwrap_or(canonical))
    }

    /// File extension used when the backend names the stored object.
    pub fn extension(&self) -> &'static str {
        self.raster_extension().unwrap_or("bin")
    }
}

/// Raster image types and their canonical extensions.
const RASTER_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
    ("image/avif", "avif"),
];

/// Result of a successful store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Absolute, publicly servable URL.
    pub url: String,
    /// Identifier the asset can later be removed by.
    pub public_id: super::PublicId,
    /// Size in bytes as reported by the backend.
    pub size: u64,
}
