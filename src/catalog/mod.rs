//! Storefront catalog: products, site settings and reviews.
//!
//! These are plain document collections in the same record store as the
//! gallery. The product detail page's fetch sequence (product, related
//! products, settings) is served in one call by [`ProductCatalog::detail`].

mod error;
mod products;
mod reviews;
mod settings;

pub use error::CatalogError;
pub use products::{NewProduct, Product, ProductCatalog, ProductDetail, ProductQuery, Shipping, Variant};
pub use reviews::{NewReview, Review, ReviewBoard, ReviewModeration, ReviewType};
pub use settings::{
    SettingsStore, SiteSettings, SettingsUpdate, Socials, SocialsUpdate, Telegram, TelegramUpdate,
    Whatsapp, WhatsappUpdate,
};
