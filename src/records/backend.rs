//! Backend trait for the record store.
//!
//! Defines the interface that all document backends must implement,
//! enabling pluggable storage (redb, memory, etc.).

use anyhow::Result;
use async_trait::async_trait;

/// Builds the flat storage key for a document.
pub(crate) fn document_key(collection: &str, id: &str) -> String {
    format!("{collection}/{id}")
}

/// Key prefix shared by every document of a collection.
pub(crate) fn collection_prefix(collection: &str) -> String {
    format!("{collection}/")
}

/// Backend trait for raw JSON documents.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
/// Writes to a single document are serialised by the backend; there are no
/// multi-document transactions.
#[async_trait]
pub trait DocumentBackend: Send + Sync + 'static {
    /// Retrieves a document.
    ///
    /// Returns `Ok(None)` if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>>;

    /// Inserts or overwrites a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn put(&self, collection: &str, id: &str, document: Vec<u8>) -> Result<()>;

    /// Deletes a document.
    ///
    /// Returns `Ok(true)` if it existed, `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// Lists every document of a collection in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn list(&self, collection: &str) -> Result<Vec<Vec<u8>>>;
}
