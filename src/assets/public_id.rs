//! Asset identifier derivation.
//!
//! The asset service addresses stored images as `folder/name`. That pair is
//! recovered from a public URL by taking its last two path segments and
//! dropping the file extension. This relies on the URL layout staying stable;
//! it is not a general URL parser.

use std::fmt;
use url::Url;

use super::types::AssetError;

/// `folder/name` identifier of a stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicId {
    folder: String,
    name: String,
}

impl PublicId {
    pub fn new(folder: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
        }
    }

    /// Derives the identifier from a stored asset's URL.
    ///
    /// `https://host/anything/folder/name.webp` yields `folder/name`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::UnresolvableUrl`] if the URL does not parse or
    /// has fewer than two non-empty path segments.
    pub fn from_url(url: &str) -> Result<Self, AssetError> {
        let unresolvable = || AssetError::UnresolvableUrl(url.to_string());

        let parsed = Url::parse(url).map_err(|_| unresolvable())?;
        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let [.., folder, file] = segments.as_slice() else {
            return Err(unresolvable());
        };

        // Everything after the first dot is extension
        let name = file.split('.').next().unwrap_or_default();
        if name.is_empty() {
            return Err(unresolvable());
        }

        Ok(Self::new(*folder, name))
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.folder, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple_url() {
        let id = PublicId::from_url("https://host/folder/name.webp").unwrap();
        assert_eq!(id.to_string(), "folder/name");
        assert_eq!(id.folder(), "folder");
        assert_eq!(id.name(), "name");
    }

    #[test]
    fn test_cloudinary_style_url() {
        let id = PublicId::from_url(
            "https://res.cloudinary.com/demo/image/upload/v1712345678/gallery/k3j4h5.webp",
        )
        .unwrap();
        assert_eq!(id.to_string(), "gallery/k3j4h5");
    }

    #[test]
    fn test_query_and_trailing_slash_ignored() {
        let id = PublicId::from_url("https://host/a/folder/name.png?w=300#top").unwrap();
        assert_eq!(id.to_string(), "folder/name");

        assert!(PublicId::from_url("https://host/folder/").is_err());
    }

    #[test]
    fn test_name_without_extension() {
        let id = PublicId::from_url("memory://assets/gallery/abc").unwrap();
        assert_eq!(id.to_string(), "gallery/abc");
    }

    #[test]
    fn test_unresolvable_urls() {
        for url in [
            "",
            "not a url",
            "https://host/",
            "https://host/only.webp",
            "https://host/folder/.webp",
        ] {
            assert!(
                matches!(PublicId::from_url(url), Err(AssetError::UnresolvableUrl(_))),
                "expected failure for {url:?}"
            );
        }
    }

    proptest! {
        #[test]
        fn prop_derivation_is_pure(
            folder in "[a-z0-9_-]{1,16}",
            name in "[a-zA-Z0-9_-]{1,32}",
            ext in "(webp|png|jpg)",
            prefix in proptest::collection::vec("[a-z0-9]{1,8}", 0..4),
        ) {
            let mut path = prefix.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            let url = format!("https://cdn.example.com/{path}{folder}/{name}.{ext}");

            let first = PublicId::from_url(&url).unwrap();
            let second = PublicId::from_url(&url).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.to_string(), format!("{folder}/{name}"));
        }
    }
}
