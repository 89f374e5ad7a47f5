//! Gallery record store.

use chrono::Utc;

use super::model::{GalleryEntry, GalleryPatch};
use crate::records::{RecordError, RecordStore, new_id};

/// Document-collection access for gallery entries.
#[derive(Clone)]
pub struct GalleryRecords {
    store: RecordStore,
}

impl GalleryRecords {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Persists a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] for an empty URL or caption, and
    /// [`RecordError::Store`] if the write fails.
    pub async fn create(&self, image_url: &str, alt_text: &str) -> Result<GalleryEntry, RecordError> {
        if image_url.trim().is_empty() {
            return Err(RecordError::invalid::<GalleryEntry>("imageUrl is required"));
        }
        if alt_text.trim().is_empty() {
            return Err(RecordError::invalid::<GalleryEntry>("altText cannot be blank"));
        }

        let now = Utc::now();
        let entry = GalleryEntry {
            id: new_id(),
            image_url: image_url.to_string(),
            alt_text: alt_text.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&entry).await?;
        Ok(entry)
    }

    /// Every entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Store`] if the listing fails.
    pub async fn list_all(&self) -> Result<Vec<GalleryEntry>, RecordError> {
        let mut entries: Vec<GalleryEntry> = self.store.all().await?;
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if `id` does not resolve.
    pub async fn get_by_id(&self, id: &str) -> Result<GalleryEntry, RecordError> {
        self.store.get(id).await
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if `id` does not resolve and
    /// [`RecordError::Invalid`] if the patch blanks a required field.
    pub async fn update(&self, id: &str, patch: GalleryPatch) -> Result<GalleryEntry, RecordError> {
        let mut entry: GalleryEntry = self.store.get(id).await?;

        if let Some(image_url) = patch.image_url {
            if image_url.trim().is_empty() {
                return Err(RecordError::invalid::<GalleryEntry>("imageUrl cannot be blank"));
            }
            entry.image_url = image_url;
        }
        if let Some(alt_text) = patch.alt_text {
            if alt_text.trim().is_empty() {
                return Err(RecordError::invalid::<GalleryEntry>("altText cannot be blank"));
            }
            entry.alt_text = alt_text;
        }
        entry.updated_at = Utc::now();

        self.store.replace(&entry).await?;
        Ok(entry)
    }

    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if `id` does not resolve.
    pub async fn delete(&self, id: &str) -> Result<(), RecordError> {
        self.store.remove::<GalleryEntry>(id).await
    }
}
