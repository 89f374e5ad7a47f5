//! Gallery service: keeps the asset store and the record store in step.
//!
//! There is no cross-store transaction. Each mutation is a fixed sequence of
//! steps and a failure part-way leaves the stores in a known, logged state:
//!
//! | operation | steps                                           | on failure                                   |
//! |-----------|-------------------------------------------------|----------------------------------------------|
//! | upload    | store asset, create record                      | record failure: remove the new asset         |
//! | replace   | store new asset, remove old asset, save record  | save failure: new asset orphaned, logged     |
//! | remove    | remove asset, delete record                     | record failure: asset already gone, logged   |
//!
//! Asset removal is always best-effort and never aborts the sequence.

use serde::Serialize;
use tracing::{info, warn};

use super::error::GalleryError;
use super::model::{GalleryEntry, GalleryForm, GalleryPatch, normalize_alt_text};
use super::records::GalleryRecords;
use crate::assets::{AssetStorage, ImagePayload, RemovalOutcome};
use crate::constants::{DEFAULT_ALT_TEXT, MAX_UPLOAD_BYTES};

/// Acknowledgement returned by [`GalleryService::remove`].
#[derive(Debug, Clone, Serialize)]
pub struct RemovedEntry {
    pub message: String,
    pub id: String,
    #[serde(rename = "assetRemoved")]
    pub asset_removed: bool,
}

/// Orchestrates gallery mutations across both stores.
#[derive(Clone)]
pub struct GalleryService {
    records: GalleryRecords,
    assets: AssetStorage,
    max_upload_bytes: usize,
}

impl GalleryService {
    pub fn new(records: GalleryRecords, assets: AssetStorage) -> Self {
        Self {
            records,
            assets,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }

    /// Lowers the upload limit. Values above the 5 MiB ceiling are clamped.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit.min(MAX_UPLOAD_BYTES);
        self
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Checks presence, size and type. Runs before any store is touched.
    fn validate_image(&self, image: Option<ImagePayload>) -> Result<ImagePayload, GalleryError> {
        let image = image
            .filter(|image| !image.is_empty())
            .ok_or(GalleryError::MissingFile)?;

        if image.len() > self.max_upload_bytes {
            return Err(GalleryError::PayloadTooLarge {
                limit: self.max_upload_bytes,
            });
        }

        if !image.is_image() {
            return Err(GalleryError::UnsupportedMediaType(
                image.resolved_content_type(),
            ));
        }

        Ok(image)
    }

    /// Every entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Store`] if the record store fails.
    pub async fn list_all(&self) -> Result<Vec<GalleryEntry>, GalleryError> {
        Ok(self.records.list_all().await?)
    }

    /// # Errors
    ///
    /// Returns [`GalleryError::NotFound`] if `id` does not resolve.
    pub async fn get_by_id(&self, id: &str) -> Result<GalleryEntry, GalleryError> {
        Ok(self.records.get_by_id(id).await?)
    }

    /// Stores the image and creates an entry pointing at it.
    ///
    /// # Errors
    ///
    /// - [`GalleryError::MissingFile`], [`GalleryError::PayloadTooLarge`],
    ///   [`GalleryError::UnsupportedMediaType`] before any store is touched
    /// - [`GalleryError::StorageUnavailable`] if the asset store fails
    /// - [`GalleryError::Store`] if the record cannot be created
    pub async fn upload(&self, form: GalleryForm) -> Result<GalleryEntry, GalleryError> {
        let image = self.validate_image(form.image)?;
        let alt_text =
            normalize_alt_text(form.alt_text).unwrap_or_else(|| DEFAULT_ALT_TEXT.to_string());

        let stored = self.assets.store(&image).await?;

        match self.records.create(&stored.url, &alt_text).await {
            Ok(entry) => {
                info!(
                    entry_id = %entry.id,
                    image_url = %entry.image_url,
                    step = "record_created",
                    "Gallery image uploaded"
                );
                Ok(entry)
            },
            Err(err) => {
                warn!(
                    image_url = %stored.url,
                    error = %err,
                    step = "record_create_failed",
                    "Record create failed after upload, removing new asset"
                );
                self.assets.remove_by_url(&stored.url).await;
                Err(err.into())
            },
        }
    }

    /// Updates the caption and, when an image is given, swaps the asset.
    ///
    /// The old asset is removed only after the new one is stored.
    ///
    /// # Errors
    ///
    /// - image validation errors as for [`upload`](Self::upload)
    /// - [`GalleryError::NotFound`] if `id` does not resolve
    /// - [`GalleryError::StorageUnavailable`] if the new asset cannot be stored
    /// - [`GalleryError::Store`] if the record cannot be saved
    pub async fn replace(&self, id: &str, form: GalleryForm) -> Result<GalleryEntry, GalleryError> {
        let image = form
            .image
            .map(|image| self.validate_image(Some(image)))
            .transpose()?;

        let existing = self.records.get_by_id(id).await?;
        let mut patch = GalleryPatch {
            image_url: None,
            alt_text: normalize_alt_text(form.alt_text),
        };

        let mut old_asset = None;
        if let Some(image) = image {
            let stored = self.assets.store(&image).await?;
            let outcome = self.assets.remove_by_url(&existing.image_url).await;
            if outcome.may_be_orphaned() {
                warn!(
                    entry_id = %id,
                    image_url = %existing.image_url,
                    event_type = "asset_orphaned",
                    step = "old_asset_remove",
                    "Previous asset may still exist after replace"
                );
            }
            old_asset = Some(outcome);
            patch.image_url = Some(stored.url);
        }

        if patch.is_empty() {
            return Ok(existing);
        }

        let new_url = patch.image_url.clone();
        match self.records.update(id, patch).await {
            Ok(entry) => {
                info!(
                    entry_id = %entry.id,
                    image_replaced = new_url.is_some(),
                    old_asset_removed = old_asset.as_ref().is_some_and(RemovalOutcome::is_removed),
                    step = "record_updated",
                    "Gallery image updated"
                );
                Ok(entry)
            },
            Err(err) => {
                if let Some(url) = new_url {
                    warn!(
                        entry_id = %id,
                        image_url = %url,
                        error = %err,
                        event_type = "asset_orphaned",
                        step = "record_update_failed",
                        "Record update failed after asset swap, new asset orphaned"
                    );
                }
                Err(err.into())
            },
        }
    }

    /// Removes the entry's asset (best-effort) and then its record.
    ///
    /// # Errors
    ///
    /// - [`GalleryError::NotFound`] if `id` does not resolve
    /// - [`GalleryError::Store`] if the record cannot be deleted
    pub async fn remove(&self, id: &str) -> Result<RemovedEntry, GalleryError> {
        let existing = self.records.get_by_id(id).await?;

        let outcome = self.assets.remove_by_url(&existing.image_url).await;
        if outcome.may_be_orphaned() {
            warn!(
                entry_id = %id,
                image_url = %existing.image_url,
                event_type = "asset_orphaned",
                step = "asset_remove",
                "Asset may still exist after entry removal"
            );
        }

        if let Err(err) = self.records.delete(id).await {
            warn!(
                entry_id = %id,
                asset_removed = outcome.is_removed(),
                error = %err,
                step = "record_delete_failed",
                "Record delete failed after asset removal"
            );
            return Err(err.into());
        }

        info!(
            entry_id = %id,
            asset_removed = outcome.is_removed(),
            step = "record_deleted",
            "Gallery image removed"
        );

        Ok(RemovedEntry {
            message: "Image removed".to_string(),
            id: id.to_string(),
            asset_removed: outcome.is_removed(),
        })
    }
}
