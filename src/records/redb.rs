//! Redb-backed document backend.
//!
//! Provides persistent document storage using redb with ACID guarantees.
//! All collections share one table keyed by `<collection>/<id>`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;

use super::backend::{DocumentBackend, collection_prefix, document_key};

/// Table holding every document
pub(crate) const DOCUMENTS_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("documents");

/// Redb-backed document backend.
///
/// `RedbDocumentBackend` is `Clone` and can be shared across threads. The
/// underlying database handles concurrent access safely.
#[derive(Clone)]
pub struct RedbDocumentBackend {
    db: Arc<Database>,
}

impl RedbDocumentBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created (permissions, disk full, etc.)
    /// - Initialization transaction fails to begin or commit
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create records directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open records database: {}", path.display()))?;

        // Initialize table on first open to ensure it exists for reads
        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(DOCUMENTS_TABLE)
                .context("Failed to initialize documents table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self { db: Arc::new(db) })
    }

    fn get_sync(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(DOCUMENTS_TABLE)
            .context("Failed to open documents table")?;

        let value = table
            .get(key)
            .with_context(|| format!("Failed to read document '{key}'"))?;

        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn put_sync(&self, key: &str, document: &[u8]) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(DOCUMENTS_TABLE)
                .context("Failed to open documents table")?;
            table
                .insert(key, document)
                .with_context(|| format!("Failed to write document '{key}'"))?;
        }
        write_txn
            .commit()
            .context("Failed to commit put transaction")?;

        Ok(())
    }

    fn delete_sync(&self, key: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        let removed = {
            let mut table = write_txn
                .open_table(DOCUMENTS_TABLE)
                .context("Failed to open documents table")?;
            table
                .remove(key)
                .with_context(|| format!("Failed to remove document '{key}'"))?
                .is_some()
        };

        write_txn
            .commit()
            .context("Failed to commit delete transaction")?;

        Ok(removed)
    }

    fn list_sync(&self, prefix: &str) -> Result<Vec<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(DOCUMENTS_TABLE)
            .context("Failed to open documents table")?;

        // Keys are sorted, so a collection is one contiguous run.
        let mut documents = Vec::new();
        for item in table
            .range(prefix..)
            .context("Failed to iterate documents table")?
        {
            let (key, value) = item.context("Failed to read document entry")?;
            if !key.value().starts_with(prefix) {
                break;
            }
            documents.push(value.value().to_vec());
        }

        Ok(documents)
    }
}

#[async_trait]
impl DocumentBackend for RedbDocumentBackend {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>> {
        let backend = self.clone();
        let key = document_key(collection, id);
        tokio::task::spawn_blocking(move || backend.get_sync(&key))
            .await
            .context("Task join error")?
    }

    async fn put(&self, collection: &str, id: &str, document: Vec<u8>) -> Result<()> {
        let backend = self.clone();
        let key = document_key(collection, id);
        tokio::task::spawn_blocking(move || backend.put_sync(&key, &document))
            .await
            .context("Task join error")?
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let backend = self.clone();
        let key = document_key(collection, id);
        tokio::task::spawn_blocking(move || backend.delete_sync(&key))
            .await
            .context("Task join error")?
    }

    async fn list(&self, collection: &str) -> Result<Vec<Vec<u8>>> {
        let backend = self.clone();
        let prefix = collection_prefix(collection);
        tokio::task::spawn_blocking(move || backend.list_sync(&prefix))
            .await
            .context("Task join error")?
    }
}
