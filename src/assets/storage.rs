//! High-level `AssetStorage` wrapper over backend implementations.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::backend::AssetStore;
use super::memory::MemoryAssetStore;
use super::public_id::PublicId;
use super::types::{AssetError, ImagePayload, StoredAsset};

/// What happened to a best-effort asset removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The asset existed and was deleted.
    Removed(PublicId),
    /// The backend had no such asset.
    Missing(PublicId),
    /// No identifier could be derived from the URL; nothing was attempted.
    Skipped { url: String },
    /// The backend delete failed.
    Failed { id: PublicId, reason: String },
}

impl RemovalOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }

    /// True when the asset may still exist in the backend.
    pub fn may_be_orphaned(&self) -> bool {
        matches!(self, Self::Skipped { .. } | Self::Failed { .. })
    }
}

/// High-level asset store handle.
///
/// `AssetStorage` is `Clone` and can be shared across request handlers.
#[derive(Clone)]
pub struct AssetStorage {
    backend: Arc<dyn AssetStore>,
}

impl AssetStorage {
    /// Creates an in-memory asset store storing under `folder`.
    pub fn memory(folder: &str) -> Self {
        Self::custom(MemoryAssetStore::new(folder))
    }

    /// Creates an asset store with a custom backend.
    pub fn custom<B: AssetStore>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Creates an asset store from a shared backend, keeping the caller's
    /// handle usable for inspection.
    pub fn from_shared(backend: Arc<dyn AssetStore>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Stores an image.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Unavailable`] if the backend fails; the caller
    /// must not persist a record in that case.
    pub async fn store(&self, payload: &ImagePayload) -> Result<StoredAsset, AssetError> {
        let backend = self.backend.name();
        match self.backend.store(payload).await {
            Ok(stored) => {
                info!(
                    backend,
                    public_id = %stored.public_id,
                    image_url = %stored.url,
                    size = stored.size,
                    "Asset stored"
                );
                Ok(stored)
            },
            Err(err) => {
                warn!(backend, error = %format!("{err:#}"), "Asset store failed");
                Err(AssetError::Unavailable {
                    backend,
                    reason: format!("{err:#}"),
                })
            },
        }
    }

    /// Removes the asset behind `url`, best-effort.
    ///
    /// Never fails: every problem is logged and reported in the outcome.
    pub async fn remove_by_url(&self, url: &str) -> RemovalOutcome {
        let backend = self.backend.name();
        let id = match PublicId::from_url(url) {
            Ok(id) => id,
            Err(err) => {
                warn!(backend, image_url = %url, error = %err, "Asset removal skipped");
                return RemovalOutcome::Skipped {
                    url: url.to_string(),
                };
            },
        };

        match self.backend.remove(&id).await {
            Ok(true) => {
                info!(backend, public_id = %id, "Asset removed");
                RemovalOutcome::Removed(id)
            },
            Ok(false) => {
                debug!(backend, public_id = %id, "Asset already absent");
                RemovalOutcome::Missing(id)
            },
            Err(err) => {
                let reason = format!("{err:#}");
                warn!(
                    backend,
                    public_id = %id,
                    error = %reason,
                    event_type = "asset_orphaned",
                    "Asset removal failed, asset left orphaned"
                );
                RemovalOutcome::Failed { id, reason }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl AssetStore for BrokenStore {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn store(&self, _payload: &ImagePayload) -> anyhow::Result<StoredAsset> {
            bail!("connection reset")
        }

        async fn remove(&self, _id: &PublicId) -> anyhow::Result<bool> {
            bail!("connection reset")
        }
    }

    fn png() -> ImagePayload {
        ImagePayload::new(vec![0x89, b'P', b'N', b'G']).with_content_type("image/png")
    }

    #[tokio::test]
    async fn test_store_and_remove_roundtrip() {
        let assets = AssetStorage::memory("gallery");
        let stored = assets.store(&png()).await.unwrap();
        assert!(stored.url.starts_with("memory://assets/gallery/"));

        let outcome = assets.remove_by_url(&stored.url).await;
        assert_eq!(outcome, RemovalOutcome::Removed(stored.public_id.clone()));

        let again = assets.remove_by_url(&stored.url).await;
        assert_eq!(again, RemovalOutcome::Missing(stored.public_id));
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let assets = AssetStorage::custom(BrokenStore);
        let err = assets.store(&png()).await.unwrap_err();
        assert!(matches!(err, AssetError::Unavailable { backend: "broken", .. }));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_remove_failure_is_reported_not_raised() {
        let assets = AssetStorage::custom(BrokenStore);
        let outcome = assets.remove_by_url("https://cdn/gallery/a.webp").await;
        assert!(matches!(outcome, RemovalOutcome::Failed { .. }));
        assert!(outcome.may_be_orphaned());
    }

    #[tokio::test]
    async fn test_remove_with_unresolvable_url_is_skipped() {
        let store = Arc::new(MemoryAssetStore::new("gallery"));
        let assets = AssetStorage::from_shared(store.clone());

        let outcome = assets.remove_by_url("not-a-url").await;
        assert!(matches!(outcome, RemovalOutcome::Skipped { .. }));
        assert!(store.removal_attempts().is_empty());
    }
}
