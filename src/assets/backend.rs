//! Backend trait for the asset store.
//!
//! Defines the interface that all asset backends must implement,
//! enabling pluggable storage (Cloudinary, filesystem, memory).

use anyhow::Result;
use async_trait::async_trait;

use super::public_id::PublicId;
use super::types::{ImagePayload, StoredAsset};

/// Backend trait for image storage.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
/// Size and type checks happen before a backend is called; backends only
/// move bytes.
#[async_trait]
pub trait AssetStore: Send + Sync + 'static {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Stores an image and returns its public URL and identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the upload, times out, or
    /// cannot be reached.
    async fn store(&self, payload: &ImagePayload) -> Result<StoredAsset>;

    /// Deletes a stored image.
    ///
    /// # Returns
    /// * `Ok(true)` - Asset existed and was deleted
    /// * `Ok(false)` - Asset did not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is unsafe or the delete fails.
    async fn remove(&self, id: &PublicId) -> Result<bool>;
}
