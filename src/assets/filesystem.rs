//! Filesystem asset backend.
//!
//! Writes images to `<root>/<folder>/<uuid>.<ext>` and hands out URLs under a
//! configured public prefix which the HTTP layer serves `root` from. Images
//! are stored as uploaded; no format conversion happens locally. Only raster
//! types are accepted, and the stored extension always follows the content
//! type, so nothing under `root` is served as markup.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;
use uuid::Uuid;

use super::backend::AssetStore;
use super::public_id::PublicId;
use super::types::{ImagePayload, StoredAsset};
use super::validation::{validate_public_id, validate_segment};

/// Filesystem-backed asset store.
#[derive(Debug, Clone)]
pub struct FilesystemAssetStore {
    root: PathBuf,
    folder: String,
    public_base_url: Url,
}

impl FilesystemAssetStore {
    /// Opens (creating if needed) the upload directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder name is unsafe, the base URL does not
    /// parse, or the directory cannot be created.
    pub fn open<P: AsRef<Path>>(root: P, folder: &str, public_base_url: &str) -> Result<Self> {
        validate_segment(folder)?;

        let mut base = public_base_url.trim_end_matches('/').to_string();
        base.push('/');
        let public_base_url = Url::parse(&base)
            .with_context(|| format!("Invalid public base URL: {public_base_url}"))?;

        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join(folder)).with_context(|| {
            format!("Failed to create upload directory: {}", root.display())
        })?;

        Ok(Self {
            root,
            folder: folder.to_string(),
            public_base_url,
        })
    }

    /// Directory the HTTP layer should serve.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the file whose stem matches the identifier's name.
    async fn locate(&self, id: &PublicId) -> Result<Option<PathBuf>> {
        let dir = self.root.join(id.folder());
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read directory: {}", dir.display()));
            },
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let path = entry.path();
            let stem = path.file_stem().and_then(|s| s.to_str());
            if stem == Some(id.name()) {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl AssetStore for FilesystemAssetStore {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn store(&self, payload: &ImagePayload) -> Result<StoredAsset> {
        let Some(extension) = payload.raster_extension() else {
            bail!(
                "Refusing to store {} on the filesystem backend",
                payload.resolved_content_type()
            );
        };

        let id = PublicId::new(&self.folder, Uuid::now_v7().simple().to_string());
        let file_name = format!("{}.{extension}", id.name());
        let dir = self.root.join(&self.folder);
        let path = dir.join(&file_name);

        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        fs::write(&path, &payload.bytes)
            .await
            .with_context(|| format!("Failed to write asset: {}", path.display()))?;

        let url = self
            .public_base_url
            .join(&format!("{}/{file_name}", self.folder))
            .context("Failed to build asset URL")?;

        Ok(StoredAsset {
            url: url.to_string(),
            public_id: id,
            size: payload.len() as u64,
        })
    }

    async fn remove(&self, id: &PublicId) -> Result<bool> {
        validate_public_id(id)?;

        let Some(path) = self.locate(id).await? else {
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to delete asset: {}", path.display()))
            },
        }
    }
}
