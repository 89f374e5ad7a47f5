//! Customer reviews of products and of the store itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use super::error::CatalogError;
use super::products::ProductCatalog;
use crate::records::{Document, RecordStore, new_id};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    #[default]
    Product,
    Website,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Author's user id.
    pub user: String,
    /// `None` for a review of the store itself.
    #[serde(default)]
    pub product: Option<String>,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub admin_reply: String,
    #[serde(default)]
    pub is_loved: bool,
    #[serde(default)]
    pub review_type: ReviewType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Review {
    const COLLECTION: &'static str = "reviews";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReview {
    pub product: Option<String>,
    pub rating: u8,
    pub comment: String,
}

/// Admin-only review flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewModeration {
    pub is_featured: Option<bool>,
    pub admin_reply: Option<String>,
    pub is_loved: Option<bool>,
}

#[derive(Clone)]
pub struct ReviewBoard {
    store: RecordStore,
    products: ProductCatalog,
    /// Serialises rating refreshes so a slower refresh cannot overwrite a
    /// newer aggregate.
    rating_lock: Arc<Mutex<()>>,
}

impl ReviewBoard {
    pub fn new(store: RecordStore, products: ProductCatalog) -> Self {
        Self {
            store,
            products,
            rating_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn newest_first(&self) -> Result<Vec<Review>, CatalogError> {
        let mut reviews: Vec<Review> = self.store.all().await?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(reviews)
    }

    /// Posts a review by `user_id` and refreshes the product's rating.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] for a rating outside 1..=5 or an
    /// empty comment, and [`CatalogError::NotFound`] for an unknown product.
    pub async fn create(&self, user_id: &str, new_review: NewReview) -> Result<Review, CatalogError> {
        if !(1..=5).contains(&new_review.rating) {
            return Err(CatalogError::invalid("rating must be between 1 and 5"));
        }
        let comment = new_review.comment.trim();
        if comment.is_empty() {
            return Err(CatalogError::invalid("comment is required"));
        }

        let product = new_review
            .product
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        if let Some(product_id) = &product {
            self.products.get(product_id).await?;
        }

        let now = Utc::now();
        let review = Review {
            id: new_id(),
            user: user_id.to_string(),
            review_type: if product.is_some() {
                ReviewType::Product
            } else {
                ReviewType::Website
            },
            product,
            rating: new_review.rating,
            comment: comment.to_string(),
            is_featured: false,
            admin_reply: String::new(),
            is_loved: false,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&review).await?;

        if let Some(product_id) = &review.product
            && let Err(err) = self.refresh_rating(product_id).await
        {
            warn!(
                review_id = %review.id,
                product_id = %product_id,
                error = %err,
                "Review saved but product rating not refreshed"
            );
        }
        Ok(review)
    }

    async fn refresh_rating(&self, product_id: &str) -> Result<(), CatalogError> {
        let _guard = self.rating_lock.lock().await;
        let reviews = self.for_product(product_id).await?;
        let count = reviews.len();
        let average = if count == 0 {
            0.0
        } else {
            reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / count as f64
        };
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.products.set_rating(product_id, average, count).await?;
        Ok(())
    }

    /// Reviews of one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the listing fails.
    pub async fn for_product(&self, product_id: &str) -> Result<Vec<Review>, CatalogError> {
        Ok(self
            .newest_first()
            .await?
            .into_iter()
            .filter(|review| review.product.as_deref() == Some(product_id))
            .collect())
    }

    /// Reviews flagged for the home page, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the listing fails.
    pub async fn featured(&self) -> Result<Vec<Review>, CatalogError> {
        Ok(self
            .newest_first()
            .await?
            .into_iter()
            .filter(|review| review.is_featured)
            .collect())
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` does not resolve.
    pub async fn moderate(&self, id: &str, moderation: ReviewModeration) -> Result<Review, CatalogError> {
        let mut review: Review = self.store.get(id).await?;
        if let Some(is_featured) = moderation.is_featured {
            review.is_featured = is_featured;
        }
        if let Some(reply) = moderation.admin_reply {
            review.admin_reply = reply.trim().to_string();
        }
        if let Some(is_loved) = moderation.is_loved {
            review.is_loved = is_loved;
        }
        review.updated_at = Utc::now();
        self.store.replace(&review).await?;
        Ok(review)
    }
}
