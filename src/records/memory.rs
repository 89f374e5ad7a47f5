//! In-memory document backend.
//!
//! Provides a fast, non-persistent store using DashMap for concurrent access.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{DocumentBackend, collection_prefix, document_key};

/// In-memory document backend using DashMap.
///
/// All data is lost when the process exits. Ideal for testing and
/// development.
#[derive(Default)]
pub struct MemoryDocumentBackend {
    data: DashMap<String, Vec<u8>>,
}

impl MemoryDocumentBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentBackend for MemoryDocumentBackend {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .data
            .get(&document_key(collection, id))
            .map(|entry| entry.value().clone()))
    }

    async fn put(&self, collection: &str, id: &str, document: Vec<u8>) -> Result<()> {
        self.data.insert(document_key(collection, id), document);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        Ok(self.data.remove(&document_key(collection, id)).is_some())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Vec<u8>>> {
        let prefix = collection_prefix(collection);
        let mut documents: Vec<(String, Vec<u8>)> = self
            .data
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        // Sort by key for consistent ordering
        documents.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(documents.into_iter().map(|(_, doc)| doc).collect())
    }
}
