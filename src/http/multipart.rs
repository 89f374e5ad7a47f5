//! Gallery form parsing.
//!
//! Reads `multipart/form-data` field by field. The image is collected chunk
//! by chunk and reading stops as soon as it passes the upload limit.

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use bytes::BytesMut;

use super::error::AppError;
use crate::assets::ImagePayload;
use crate::gallery::{GalleryError, GalleryForm};

const IMAGE_FIELD: &str = "image";
const ALT_TEXT_FIELD: &str = "altText";

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GalleryError::PayloadTooLarge { limit }.into()
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

async fn read_image(mut field: Field<'_>, limit: usize) -> Result<Option<ImagePayload>, AppError> {
    let content_type = field.content_type().map(str::to_string);
    let file_name = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.is_empty());

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(|err| multipart_error(err, limit))? {
        if buf.len() + chunk.len() > limit {
            return Err(GalleryError::PayloadTooLarge { limit }.into());
        }
        buf.extend_from_slice(&chunk);
    }

    // Browsers send an empty part with no file name when no file was picked.
    if buf.is_empty() && file_name.is_none() {
        return Ok(None);
    }

    let mut image = ImagePayload::new(buf.freeze());
    if let Some(content_type) = content_type {
        image = image.with_content_type(content_type);
    }
    if let Some(file_name) = file_name {
        image = image.with_file_name(file_name);
    }
    Ok(Some(image))
}

/// Parses the gallery form. Unknown fields are skipped.
///
/// # Errors
///
/// Returns a 400 [`AppError`] for a malformed body or an image over `limit`.
pub async fn read_gallery_form(mut multipart: Multipart, limit: usize) -> Result<GalleryForm, AppError> {
    let mut form = GalleryForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_error(err, limit))?
    {
        match field.name() {
            Some(IMAGE_FIELD) => {
                if let Some(image) = read_image(field, limit).await? {
                    form.image = Some(image);
                }
            },
            Some(ALT_TEXT_FIELD) => {
                let text = field.text().await.map_err(|err| multipart_error(err, limit))?;
                form.alt_text = Some(text);
            },
            _ => {},
        }
    }

    Ok(form)
}
