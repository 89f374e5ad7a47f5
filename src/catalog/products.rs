//! Product documents and catalog queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::CatalogError;
use super::settings::{SettingsStore, SiteSettings};
use crate::constants::{MAX_PRODUCT_GALLERY_IMAGES, RELATED_PRODUCTS_LIMIT};
use crate::records::{Document, RecordStore, new_id};

/// One purchasable length and its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub length: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shipping {
    pub from: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
}

impl Default for Shipping {
    fn default() -> Self {
        Self {
            from: "Beldanga, West Bengal".to_string(),
            kind: "International Shipping".to_string(),
            time: "3-5 Days".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub is_best_seller: bool,
    /// Main image URL.
    pub image: String,
    /// Extra image URLs.
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Rich-text HTML.
    #[serde(default)]
    pub highlights: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub shipping: Shipping,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Product {
    fn matches(&self, query: &ProductQuery) -> bool {
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty())
            && !self.category.eq_ignore_ascii_case(category)
        {
            return false;
        }

        match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let q = q.to_lowercase();
                self.name.to_lowercase().contains(&q) || self.category.to_lowercase().contains(&q)
            },
            None => true,
        }
    }
}

/// Product creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub variants: Vec<Variant>,
    pub stock: u32,
    pub is_best_seller: bool,
    pub image: String,
    pub gallery: Vec<String>,
    pub colors: Vec<String>,
    pub highlights: Option<String>,
    pub description: Option<String>,
    pub shipping: Option<Shipping>,
}

impl NewProduct {
    fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::invalid("name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(CatalogError::invalid("category is required"));
        }
        if self.image.trim().is_empty() {
            return Err(CatalogError::invalid("image is required"));
        }
        if self.gallery.len() > MAX_PRODUCT_GALLERY_IMAGES {
            return Err(CatalogError::invalid(format!(
                "at most {MAX_PRODUCT_GALLERY_IMAGES} gallery images are allowed"
            )));
        }
        for variant in &self.variants {
            if variant.length.trim().is_empty() {
                return Err(CatalogError::invalid("variant length is required"));
            }
            if !variant.price.is_finite() || variant.price < 0.0 {
                return Err(CatalogError::invalid(format!(
                    "invalid price for variant '{}'",
                    variant.length
                )));
            }
        }
        Ok(())
    }
}

/// List filters. Both are optional and combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Exact category, case-insensitive.
    pub category: Option<String>,
    /// Substring of name or category, case-insensitive.
    pub q: Option<String>,
}

/// Everything the product detail page needs in one response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: Product,
    pub related: Vec<Product>,
    pub settings: SiteSettings,
    /// `None` when the stored number cannot form a link.
    pub whatsapp_link: Option<String>,
}

#[derive(Clone)]
pub struct ProductCatalog {
    store: RecordStore,
    settings: SettingsStore,
}

impl ProductCatalog {
    pub fn new(store: RecordStore, settings: SettingsStore) -> Self {
        Self { store, settings }
    }

    /// Products in creation order, filtered by `query`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the listing fails.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let products: Vec<Product> = self.store.all().await?;
        Ok(products
            .into_iter()
            .filter(|product| product.matches(query))
            .collect())
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` does not resolve.
    pub async fn get(&self, id: &str) -> Result<Product, CatalogError> {
        Ok(self.store.get(id).await?)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] if a required field is missing.
    pub async fn create(&self, new_product: NewProduct) -> Result<Product, CatalogError> {
        new_product.validate()?;

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            name: new_product.name.trim().to_string(),
            category: new_product.category.trim().to_string(),
            variants: new_product.variants,
            stock: new_product.stock,
            is_best_seller: new_product.is_best_seller,
            image: new_product.image,
            gallery: new_product.gallery,
            colors: new_product.colors,
            highlights: new_product.highlights,
            description: new_product.description,
            shipping: new_product.shipping.unwrap_or_default(),
            rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&product).await?;
        Ok(product)
    }

    /// Overwrites rating aggregates after a review is added.
    pub(crate) async fn set_rating(
        &self,
        id: &str,
        rating: f64,
        review_count: u32,
    ) -> Result<Product, CatalogError> {
        let mut product = self.get(id).await?;
        product.rating = rating;
        product.review_count = review_count;
        product.updated_at = Utc::now();
        self.store.replace(&product).await?;
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` does not resolve.
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        Ok(self.store.remove::<Product>(id).await?)
    }

    /// Up to four other products from the same category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` does not resolve.
    pub async fn related(&self, id: &str) -> Result<Vec<Product>, CatalogError> {
        let product = self.get(id).await?;
        self.related_to(&product).await
    }

    async fn related_to(&self, product: &Product) -> Result<Vec<Product>, CatalogError> {
        let all: Vec<Product> = self.store.all().await?;
        Ok(all
            .into_iter()
            .filter(|other| other.category == product.category && other.id != product.id)
            .take(RELATED_PRODUCTS_LIMIT)
            .collect())
    }

    /// Product, related products, public settings and a WhatsApp link.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` does not resolve.
    pub async fn detail(&self, id: &str) -> Result<ProductDetail, CatalogError> {
        let product = self.get(id).await?;
        let related = self.related_to(&product).await?;
        let settings = self.settings.get().await?.redacted();
        let whatsapp_link = match settings.whatsapp_link(Some(&product.name)) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                warn!(product_id = %product.id, error = %err, "Skipping WhatsApp link");
                None
            },
        };

        Ok(ProductDetail {
            product,
            related,
            settings,
            whatsapp_link,
        })
    }
}
