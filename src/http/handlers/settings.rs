//! Site settings handlers.

use axum::{Json, extract::State};

use super::super::error::AppError;
use super::super::extract::AdminPrincipal;
use super::super::state::AppState;
use crate::catalog::{SettingsUpdate, SiteSettings};

/// GET /settings - Public settings (Telegram bot token blanked).
pub(crate) async fn settings_get(
    State(state): State<AppState>,
) -> Result<Json<SiteSettings>, AppError> {
    Ok(Json(state.settings.get().await?.redacted()))
}

/// PUT /settings - Partial update.
pub(crate) async fn settings_update(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SiteSettings>, AppError> {
    Ok(Json(state.settings.update(update).await?.redacted()))
}
