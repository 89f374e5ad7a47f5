//! High-level `RecordStore` wrapper with typed document access.

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::backend::DocumentBackend;
use super::memory::MemoryDocumentBackend;
use super::redb::RedbDocumentBackend;

/// A typed document living in one collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name, also the storage key prefix.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Errors returned by typed record access.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("{collection} '{id}' not found")]
    NotFound { collection: &'static str, id: String },

    #[error("invalid {collection} record: {reason}")]
    Invalid {
        collection: &'static str,
        reason: String,
    },

    #[error("record store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl RecordError {
    pub fn not_found<T: Document>(id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: T::COLLECTION,
            id: id.into(),
        }
    }

    pub fn invalid<T: Document>(reason: impl Into<String>) -> Self {
        Self::Invalid {
            collection: T::COLLECTION,
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Generates a new time-ordered document id.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// High-level record store.
///
/// `RecordStore` is `Clone` and can be shared across threads. The underlying
/// backend handles concurrent access safely.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn DocumentBackend>,
}

impl RecordStore {
    /// Creates a store backed by a redb database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self::custom(RedbDocumentBackend::open(path)?))
    }

    /// Creates a store backed by memory. All data is lost when the process exits.
    pub fn memory() -> Self {
        Self::custom(MemoryDocumentBackend::new())
    }

    /// Creates a store with a custom backend.
    pub fn custom<B: DocumentBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    fn decode<T: Document>(bytes: &[u8]) -> Result<T, RecordError> {
        serde_json::from_slice(bytes)
            .with_context(|| format!("Failed to decode {} document", T::COLLECTION))
            .map_err(RecordError::Store)
    }

    fn encode<T: Document>(doc: &T) -> Result<Vec<u8>, RecordError> {
        serde_json::to_vec(doc)
            .with_context(|| format!("Failed to encode {} document", T::COLLECTION))
            .map_err(RecordError::Store)
    }

    /// Looks up a document, returning `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Store`] if the backend fails or the stored
    /// document cannot be decoded.
    pub async fn find<T: Document>(&self, id: &str) -> Result<Option<T>, RecordError> {
        match self.backend.get(T::COLLECTION, id).await? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Loads a document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if `id` does not resolve.
    pub async fn get<T: Document>(&self, id: &str) -> Result<T, RecordError> {
        self.find(id)
            .await?
            .ok_or_else(|| RecordError::not_found::<T>(id))
    }

    /// Inserts or overwrites a document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Store`] if the backend write fails.
    pub async fn insert<T: Document>(&self, doc: &T) -> Result<(), RecordError> {
        let bytes = Self::encode(doc)?;
        self.backend.put(T::COLLECTION, doc.id(), bytes).await?;
        Ok(())
    }

    /// Overwrites an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if the document does not exist.
    pub async fn replace<T: Document>(&self, doc: &T) -> Result<(), RecordError> {
        if self.backend.get(T::COLLECTION, doc.id()).await?.is_none() {
            return Err(RecordError::not_found::<T>(doc.id()));
        }
        self.insert(doc).await
    }

    /// Deletes an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if the document does not exist.
    pub async fn remove<T: Document>(&self, id: &str) -> Result<(), RecordError> {
        if self.backend.delete(T::COLLECTION, id).await? {
            Ok(())
        } else {
            Err(RecordError::not_found::<T>(id))
        }
    }

    /// Loads every document of a collection in id order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Store`] if the backend fails or any document
    /// cannot be decoded.
    pub async fn all<T: Document>(&self) -> Result<Vec<T>, RecordError> {
        self.backend
            .list(T::COLLECTION)
            .await?
            .iter()
            .map(|bytes| Self::decode(bytes))
            .collect()
    }
}
