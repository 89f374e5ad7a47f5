//! Product handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::super::error::AppError;
use super::super::extract::AdminPrincipal;
use super::super::state::AppState;
use crate::catalog::{NewProduct, Product, ProductDetail, ProductQuery};

/// GET /products - List products, optionally by `category` and search `q`.
pub(crate) async fn product_list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.list(&query).await?))
}

/// GET /products/{id}
pub(crate) async fn product_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.products.get(&id).await?))
}

/// GET /products/{id}/related - Up to four products of the same category.
pub(crate) async fn product_related(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.related(&id).await?))
}

/// GET /products/{id}/details - Product page bundle.
pub(crate) async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>, AppError> {
    Ok(Json(state.products.detail(&id).await?))
}

/// POST /products
pub(crate) async fn product_create(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Json(new_product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products.create(new_product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// DELETE /products/{id}
pub(crate) async fn product_delete(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.products.delete(&id).await?;
    Ok(Json(serde_json::json!({ "message": "Product removed", "id": id })))
}
