//! Asset store adapter for gallery images.
//!
//! Turns an in-memory image buffer into a publicly addressable URL and
//! removes previously stored images again. Supports multiple backends:
//!
//! - **CloudinaryAssetStore**: Remote CDN with format normalisation (production)
//! - **FilesystemAssetStore**: Local directory served by the HTTP layer
//! - **MemoryAssetStore**: Non-persistent store (testing/development)
//!
//! Removal is always best-effort: [`AssetStorage::remove_by_url`] reports a
//! [`RemovalOutcome`] instead of an error so a failed delete never blocks the
//! record mutation that triggered it.
//!
//! # Example
//!
//! ```ignore
//! use showroom::assets::{AssetStorage, ImagePayload};
//!
//! let assets = AssetStorage::memory("gallery");
//! let stored = assets.store(&ImagePayload::new(bytes).with_content_type("image/png")).await?;
//! assets.remove_by_url(&stored.url).await;
//! ```

mod backend;
mod cloudinary;
mod filesystem;
mod memory;
mod public_id;
mod storage;
mod types;
mod validation;

pub use backend::AssetStore;
pub use cloudinary::CloudinaryAssetStore;
pub use filesystem::FilesystemAssetStore;
pub use memory::MemoryAssetStore;
pub use public_id::PublicId;
pub use storage::{AssetStorage, RemovalOutcome};
pub use types::{AssetError, ImagePayload, StoredAsset};
