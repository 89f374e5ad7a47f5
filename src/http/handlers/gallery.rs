//! Gallery handlers.
//!
//! Listing is public. Upload, replace and delete require an admin token,
//! checked before the multipart body is read.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};

use super::super::error::AppError;
use super::super::extract::AdminPrincipal;
use super::super::multipart::read_gallery_form;
use super::super::state::AppState;
use crate::gallery::{GalleryEntry, RemovedEntry};

/// GET /gallery - All entries, newest first.
pub(crate) async fn gallery_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryEntry>>, AppError> {
    Ok(Json(state.gallery.list_all().await?))
}

/// POST /gallery - Upload an image (`image` file, optional `altText`).
pub(crate) async fn gallery_upload(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    multipart: Multipart,
) -> Result<(StatusCode, Json<GalleryEntry>), AppError> {
    let form = read_gallery_form(multipart, state.gallery.max_upload_bytes()).await?;
    let entry = state.gallery.upload(form).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /gallery/{id} - Replace the image and/or caption.
pub(crate) async fn gallery_replace(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<GalleryEntry>, AppError> {
    let form = read_gallery_form(multipart, state.gallery.max_upload_bytes()).await?;
    Ok(Json(state.gallery.replace(&id, form).await?))
}

/// DELETE /gallery/{id} - Remove the entry and its image.
pub(crate) async fn gallery_delete(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<String>,
) -> Result<Json<RemovedEntry>, AppError> {
    Ok(Json(state.gallery.remove(&id).await?))
}
