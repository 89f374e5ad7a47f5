//! showroom: storefront backend for a hair-export business.
//!
//! The core is the gallery asset lifecycle: images go to an asset store
//! (Cloudinary, local filesystem or memory), their URLs and captions to a
//! record store, and [`gallery::GalleryService`] keeps the two in step.
//! Around it sit the product catalog, site settings and reviews the
//! storefront pages read, an admin access guard, and the HTTP API.

pub mod assets;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod gallery;
pub mod http;
pub mod paths;
pub mod records;
pub mod telemetry;
