//! Identifier validation for backends that map identifiers onto paths.
//!
//! Identifiers come from URLs supplied by stored records, so every component
//! is checked before it touches the filesystem.

use anyhow::{Result, bail};
use std::path::{Component, Path};

use super::public_id::PublicId;

/// Validates a single path segment (folder or object name).
///
/// Rejects empty segments, `.`/`..`, separators and anything that does not
/// normalise to exactly one plain component.
pub(crate) fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        bail!("Asset path segment cannot be empty");
    }
    if segment.contains('/') || segment.contains('\\') {
        bail!("Asset path segment cannot contain separators: {segment}");
    }

    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        (Some(Component::ParentDir), _) => bail!("Asset path cannot contain '..': {segment}"),
        _ => bail!("Invalid asset path segment: {segment}"),
    }
}

/// Validates both halves of a [`PublicId`].
pub(crate) fn validate_public_id(id: &PublicId) -> Result<()> {
    validate_segment(id.folder())?;
    validate_segment(id.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_segments() {
        assert!(validate_segment("gallery").is_ok());
        assert!(validate_segment("0190a1b2c3").is_ok());
        assert!(validate_segment("name-with_dash").is_ok());
    }

    #[test]
    fn test_traversal_rejected() {
        for segment in ["", ".", "..", "../etc", "a/b", "a\\b", "/etc"] {
            assert!(validate_segment(segment).is_err(), "accepted {segment:?}");
        }
    }

    #[test]
    fn test_public_id_validation() {
        assert!(validate_public_id(&PublicId::new("gallery", "abc")).is_ok());
        assert!(validate_public_id(&PublicId::new("..", "abc")).is_err());
        assert!(validate_public_id(&PublicId::new("gallery", "..")).is_err());
    }
}
