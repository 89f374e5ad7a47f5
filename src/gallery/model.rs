//! Gallery data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::ImagePayload;
use crate::records::Document;

/// A persisted gallery entry.
///
/// Serialised with `_id` and camelCase field names, the shape the storefront
/// client reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub image_url: String,
    pub alt_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for GalleryEntry {
    const COLLECTION: &'static str = "gallery";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update of an entry. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryPatch {
    pub image_url: Option<String>,
    pub alt_text: Option<String>,
}

impl GalleryPatch {
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.alt_text.is_none()
    }
}

/// Submitted create/replace form, already parsed from the request.
#[derive(Debug, Clone, Default)]
pub struct GalleryForm {
    pub image: Option<ImagePayload>,
    pub alt_text: Option<String>,
}

impl GalleryForm {
    pub fn with_image(image: ImagePayload) -> Self {
        Self {
            image: Some(image),
            alt_text: None,
        }
    }

    #[must_use]
    pub fn alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = Some(alt_text.into());
        self
    }
}

/// Trims a caption; blank captions count as absent.
pub fn normalize_alt_text(alt_text: Option<String>) -> Option<String> {
    alt_text
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_shape() {
        let now = Utc::now();
        let entry = GalleryEntry {
            id: "abc".to_string(),
            image_url: "https://cdn/gallery/abc.webp".to_string(),
            alt_text: "Raw wavy bundle".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["_id"], "abc");
        assert_eq!(json["imageUrl"], "https://cdn/gallery/abc.webp");
        assert_eq!(json["altText"], "Raw wavy bundle");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_entry_accepts_plain_id() {
        let json = serde_json::json!({
            "id": "abc",
            "imageUrl": "u",
            "altText": "a",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        });
        let entry: GalleryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.id, "abc");
    }

    #[test]
    fn test_normalize_alt_text() {
        assert_eq!(normalize_alt_text(None), None);
        assert_eq!(normalize_alt_text(Some("   ".to_string())), None);
        assert_eq!(
            normalize_alt_text(Some("  Curly  ".to_string())),
            Some("Curly".to_string())
        );
    }
}
