//! Document record store with pluggable backends.
//!
//! Stores JSON documents grouped into collections and keyed by id.
//! Supports multiple backends:
//!
//! - **RedbDocumentBackend**: Persistent storage with ACID guarantees (default)
//! - **MemoryDocumentBackend**: Fast, non-persistent storage (testing/embedding)
//!
//! Typed access goes through [`RecordStore`] and the [`Document`] trait:
//!
//! ```ignore
//! use showroom::records::RecordStore;
//!
//! let store = RecordStore::memory();
//! store.insert(&entry).await?;
//! let entry: GalleryEntry = store.get(&id).await?;
//! ```

mod backend;
mod memory;
mod redb;
mod store;


pub use backend::DocumentBackend;
pub use memory::MemoryDocumentBackend;
pub use redb::RedbDocumentBackend;
pub use store::{Document, RecordError, RecordStore, new_id};
