//! Shared application state.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::assets::{AssetStorage, CloudinaryAssetStore, FilesystemAssetStore};
use crate::auth::{AccessGuard, Tokens, UserDirectory};
use crate::catalog::{ProductCatalog, ReviewBoard, SettingsStore};
use crate::config::{AssetsBackendKind, Config, RecordsBackendKind};
use crate::gallery::{GalleryRecords, GalleryService};
use crate::paths;
use crate::records::RecordStore;

/// Handles shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub gallery: GalleryService,
    pub products: ProductCatalog,
    pub settings: SettingsStore,
    pub reviews: ReviewBoard,
    pub guard: AccessGuard,
    /// Directory served under `/uploads`, set for the filesystem backend.
    pub uploads_dir: Option<Arc<PathBuf>>,
}

impl AppState {
    /// Wires every service over one record store and one asset store.
    pub fn with_backends(
        records: RecordStore,
        assets: AssetStorage,
        tokens: Option<Tokens>,
        max_upload_bytes: usize,
    ) -> Self {
        let settings = SettingsStore::new(records.clone());
        let products = ProductCatalog::new(records.clone(), settings.clone());
        let reviews = ReviewBoard::new(records.clone(), products.clone());
        let gallery = GalleryService::new(GalleryRecords::new(records.clone()), assets)
            .with_max_upload_bytes(max_upload_bytes);
        let guard = AccessGuard::new(tokens, UserDirectory::new(records));

        Self {
            gallery,
            products,
            settings,
            reviews,
            guard,
            uploads_dir: None,
        }
    }

    #[must_use]
    pub fn with_uploads_dir(mut self, dir: PathBuf) -> Self {
        self.uploads_dir = Some(Arc::new(dir));
        self
    }

    /// Opens the configured backends.
    ///
    /// # Errors
    ///
    /// Returns an error if the record database or the asset backend cannot
    /// be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let records = open_records(config)?;
        let tokens = Tokens::new(
            &config.auth.jwt_secret,
            Duration::from_secs(config.auth.token_ttl_secs),
        );

        let assets_config = &config.assets;
        let (assets, uploads_dir) = match assets_config.backend {
            AssetsBackendKind::Memory => (AssetStorage::memory(&assets_config.folder), None),
            AssetsBackendKind::Filesystem => {
                let root = match &assets_config.filesystem.root {
                    Some(root) => root.clone(),
                    None => paths::get_uploads_dir()?,
                };
                let store = FilesystemAssetStore::open(
                    root,
                    &assets_config.folder,
                    &assets_config.filesystem.public_base_url,
                )?;
                let served = store.root().to_path_buf();
                (AssetStorage::custom(store), Some(served))
            },
            AssetsBackendKind::Cloudinary => {
                let store =
                    CloudinaryAssetStore::new(&assets_config.cloudinary, &assets_config.folder)?;
                (AssetStorage::custom(store), None)
            },
        };

        info!(
            records = ?config.records.backend,
            assets = assets.backend_name(),
            auth_enabled = tokens.is_some(),
            "Backends ready"
        );

        let state = Self::with_backends(records, assets, tokens, assets_config.max_upload_bytes);
        Ok(match uploads_dir {
            Some(dir) => state.with_uploads_dir(dir),
            None => state,
        })
    }
}

/// Opens the record store selected in `config`.
///
/// # Errors
///
/// Returns an error if the redb file cannot be created or opened.
pub fn open_records(config: &Config) -> Result<RecordStore> {
    match config.records.backend {
        RecordsBackendKind::Memory => Ok(RecordStore::memory()),
        RecordsBackendKind::Redb => {
            let path = match &config.records.path {
                Some(path) => path.clone(),
                None => paths::get_records_path()?,
            };
            RecordStore::file(&path)
                .with_context(|| format!("Failed to open record store {}", path.display()))
        },
    }
}
