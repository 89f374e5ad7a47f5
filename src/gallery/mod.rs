//! Gallery asset lifecycle.
//!
//! A gallery entry pairs a caption with an image held in the asset store.
//! [`GalleryRecords`] persists entries; [`GalleryService`] keeps the two
//! stores in step across upload, replace and delete.

mod error;
mod model;
mod records;
mod service;

pub use error::GalleryError;
pub use model::{GalleryEntry, GalleryForm, GalleryPatch, normalize_alt_text};
pub use records::GalleryRecords;
pub use service::{GalleryService, RemovedEntry};
