//! Review handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::super::error::AppError;
use super::super::extract::{AdminPrincipal, Authenticated};
use super::super::state::AppState;
use crate::catalog::{NewReview, Review, ReviewModeration};

/// GET /reviews/featured
pub(crate) async fn reviews_featured(
    State(state): State<AppState>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.reviews.featured().await?))
}

/// GET /products/{id}/reviews
pub(crate) async fn reviews_for_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.reviews.for_product(&id).await?))
}

/// POST /reviews - Any signed-in user.
pub(crate) async fn review_create(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Json(new_review): Json<NewReview>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let review = state.reviews.create(&principal.id, new_review).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// PATCH /reviews/{id} - Feature, love or reply to a review.
pub(crate) async fn review_moderate(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<String>,
    Json(moderation): Json<ReviewModeration>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(state.reviews.moderate(&id, moderation).await?))
}
