//! In-memory asset backend.
//!
//! Provides a fast, non-persistent asset store using DashMap for
//! concurrent access. Ideal for testing and development.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use super::backend::AssetStore;
use super::public_id::PublicId;
use super::types::{ImagePayload, StoredAsset};

/// Entry stored in the memory backend.
#[derive(Clone)]
struct MemoryAsset {
    bytes: Bytes,
    content_type: String,
}

/// In-memory asset backend.
///
/// URLs take the form `memory://assets/<folder>/<uuid>.<ext>`. Every removal
/// attempt is recorded so callers can assert on delete behaviour.
#[derive(Default)]
pub struct MemoryAssetStore {
    folder: String,
    objects: DashMap<PublicId, MemoryAsset>,
    removals: Mutex<Vec<PublicId>>,
}

impl MemoryAssetStore {
    pub fn new(folder: &str) -> Self {
        Self {
            folder: folder.to_string(),
            ..Self::default()
        }
    }

    /// Returns the number of stored assets.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns true if an asset with this identifier is stored.
    pub fn contains(&self, id: &PublicId) -> bool {
        self.objects.contains_key(id)
    }

    /// Returns the content type and bytes of a stored asset.
    pub fn get(&self, id: &PublicId) -> Option<(String, Bytes)> {
        self.objects
            .get(id)
            .map(|entry| (entry.content_type.clone(), entry.bytes.clone()))
    }

    /// Every identifier `remove` was called with, in call order.
    pub fn removal_attempts(&self) -> Vec<PublicId> {
        self.removals.lock().clone()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn store(&self, payload: &ImagePayload) -> Result<StoredAsset> {
        let id = PublicId::new(&self.folder, Uuid::now_v7().simple().to_string());
        let url = format!("memory://assets/{id}.{}", payload.extension());

        self.objects.insert(
            id.clone(),
            MemoryAsset {
                bytes: payload.bytes.clone(),
                content_type: payload.resolved_content_type(),
            },
        );

        Ok(StoredAsset {
            url,
            public_id: id,
            size: payload.len() as u64,
        })
    }

    async fn remove(&self, id: &PublicId) -> Result<bool> {
        self.removals.lock().push(id.clone());
        Ok(self.objects.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_get() {
        let store = MemoryAssetStore::new("gallery");
        let payload = ImagePayload::new(&b"jpeg-bytes"[..]).with_file_name("photo.jpg");

        let stored = store.store(&payload).await.unwrap();
        assert_eq!(stored.size, 10);
        assert_eq!(stored.public_id.folder(), "gallery");
        assert!(stored.url.ends_with(".jpg"));

        let (content_type, bytes) = store.get(&stored.public_id).unwrap();
        assert_eq!(content_type, "image/jpeg");
        assert_eq!(&bytes[..], b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_url_derives_back_to_public_id() {
        let store = MemoryAssetStore::new("gallery");
        let stored = store
            .store(&ImagePayload::new(&b"x"[..]).with_content_type("image/webp"))
            .await
            .unwrap();
        assert_eq!(PublicId::from_url(&stored.url).unwrap(), stored.public_id);
    }

    #[tokio::test]
    async fn test_each_store_gets_a_fresh_id() {
        let store = MemoryAssetStore::new("gallery");
        let payload = ImagePayload::new(&b"x"[..]).with_content_type("image/png");
        let a = store.store(&payload).await.unwrap();
        let b = store.store(&payload).await.unwrap();
        assert_ne!(a.url, b.url);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_records_attempts() {
        let store = MemoryAssetStore::new("gallery");
        let stored = store
            .store(&ImagePayload::new(&b"x"[..]).with_content_type("image/png"))
            .await
            .unwrap();

        assert!(store.remove(&stored.public_id).await.unwrap());
        assert!(!store.remove(&stored.public_id).await.unwrap());
        assert!(store.is_empty());
        assert_eq!(
            store.removal_attempts(),
            vec![stored.public_id.clone(), stored.public_id]
        );
    }
}
