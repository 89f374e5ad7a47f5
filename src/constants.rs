//! Shared constants for the showroom service.

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Hard ceiling for a single uploaded image (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Extra body allowance on top of the upload limit for multipart framing
/// and the text fields that travel with the image.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Caption used when an upload arrives without alt text.
pub const DEFAULT_ALT_TEXT: &str = "Gallery Image";

/// Logical folder gallery assets are stored under.
pub const DEFAULT_ASSET_FOLDER: &str = "gallery";

/// Canonical image format requested from the remote asset service.
pub const DEFAULT_ASSET_FORMAT: &str = "webp";

/// Default lifetime of tokens minted by `showroom token` (30 days).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Default per-request timeout for the HTTP server.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default timeout for calls to the remote asset service.
pub const DEFAULT_ASSET_TIMEOUT_SECS: u64 = 30;

/// Number of related products shown on a product detail page.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Maximum number of extra images attached to a product.
pub const MAX_PRODUCT_GALLERY_IMAGES: usize = 5;
