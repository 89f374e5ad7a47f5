//! HTTP API handlers organized by resource.

pub mod gallery;
pub mod health;
pub mod products;
pub mod reviews;
pub mod settings;

// Re-export all handlers for use in routing
pub(crate) use gallery::{gallery_delete, gallery_list, gallery_replace, gallery_upload};
pub(crate) use health::health;
pub(crate) use products::{
    product_create, product_delete, product_detail, product_get, product_list, product_related,
};
pub(crate) use reviews::{review_create, review_moderate, reviews_featured, reviews_for_product};
pub(crate) use settings::{settings_get, settings_update};
