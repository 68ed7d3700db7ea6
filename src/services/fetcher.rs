// src/services/fetcher.rs

//! Page fetching service.
//!
//! The pipeline only needs "give me the HTML behind this URL", so fetching
//! sits behind [`PageFetcher`]; [`HttpFetcher`] is the production backend.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::CrawlerConfig;
use crate::utils::http::{create_async_client, fetch_text};

/// Source of raw HTML for listing and article pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url`.
    ///
    /// Fails with `AppError::Fetch` on network failure, timeout or a
    /// non-2xx status.
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP with a shared client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with a client configured from `config`.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::with_client(create_async_client(config)?))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        fetch_text(&self.client, url).await
    }
}


#[cfg(test)]
mod tests {
    use super::stub::StaticFetcher;
    use super::*;

    #[test]
    fn test_http_fetcher_builds_from_defaults() {
        assert!(HttpFetcher::new(&CrawlerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_static_fetcher_serves_and_fails() {
        let fetcher = StaticFetcher::new().with_page("https://x.pl/a", "<html></html>");

        assert_eq!(
            fetcher.fetch_html("https://x.pl/a").await.unwrap(),
            "<html></html>"
        );
        let err = fetcher.fetch_html("https://x.pl/b").await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(fetcher.requests(), vec!["https://x.pl/a", "https://x.pl/b"]);
    }
}
