//! Path utilities for showroom data.
//!
//! # Base Directory
//! - [`get_showroom_dir`] - `~/.showroom/` (base directory for all data)
//!
//! # Data Files
//! - [`get_records_path`] - `~/.showroom/records.redb` (record store database)
//! - [`get_uploads_dir`] - `~/.showroom/uploads/` (filesystem asset backend)

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the showroom base directory.
///
/// Resolution order:
/// 1. `SHOWROOM_HOME` environment variable (if set)
/// 2. `~/.showroom/` (default)
pub fn get_showroom_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("SHOWROOM_HOME")
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }

    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home.join(".showroom"))
}

/// Get the record store database path: `~/.showroom/records.redb`
pub fn get_records_path() -> Result<PathBuf> {
    Ok(get_showroom_dir()?.join("records.redb"))
}

/// Get the local uploads directory: `~/.showroom/uploads/`
pub fn get_uploads_dir() -> Result<PathBuf> {
    Ok(get_showroom_dir()?.join("uploads"))
}
