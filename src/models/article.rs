//! Article record data structure.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// One news item scraped from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Article headline
    pub title: String,

    /// Absolute URL; identifies the article within a run
    pub url: String,

    /// Publish time, `None` when the source gives no usable date
    pub published_at: Option<DateTime<Utc>>,

    /// Absolute thumbnail image URL
    pub thumbnail_url: Option<String>,

    /// Short introductory excerpt
    pub lead: Option<String>,
}

impl ArticleRecord {
    /// Create a record with only the required fields set.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            published_at: None,
            thumbnail_url: None,
            lead: None,
        }
    }

    /// Stable feed GUID: hex SHA-256 of the article URL.
    pub fn guid(&self) -> String {
        hex::encode(Sha256::digest(self.url.as_bytes()))
    }

    /// MIME type of the thumbnail guessed from its extension.
    pub fn thumbnail_mime(&self) -> Option<&'static str> {
        self.thumbnail_url.as_deref().map(guess_image_mime)
    }
}

/// Guess an image MIME type from a URL's extension.
pub fn guess_image_mime(url: &str) -> &'static str {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .to_ascii_lowercase();

    if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "image/*"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_is_stable_per_url() {
        let a = ArticleRecord::new("A", "https://epiotrkow.pl/news/a,1");
        let b = ArticleRecord::new("B", "https://epiotrkow.pl/news/a,1");
        let c = ArticleRecord::new("A", "https://epiotrkow.pl/news/c,2");

        assert_eq!(a.guid(), b.guid());
        assert_ne!(a.guid(), c.guid());
        assert_eq!(a.guid().len(), 64);
    }

    #[test]
    fn test_guess_image_mime() {
        assert_eq!(guess_image_mime("https://x.pl/a.WEBP"), "image/webp");
        assert_eq!(guess_image_mime("https://x.pl/a.png?w=300"), "image/png");
        assert_eq!(guess_image_mime("https://x.pl/a.jpeg"), "image/jpeg");
        assert_eq!(guess_image_mime("https://x.pl/a.jpg"), "image/jpeg");
        assert_eq!(guess_image_mime("https://x.pl/thumb"), "image/*");
    }

    #[test]
    fn test_thumbnail_mime_absent_without_image() {
        let record = ArticleRecord::new("A", "https://epiotrkow.pl/news/a,1");
        assert_eq!(record.thumbnail_mime(), None);
    }
}
