// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let language = HeaderValue::from_str(&config.accept_language)
        .map_err(|e| AppError::config(format!("crawler.accept_language: {e}")))?;
    headers.insert(ACCEPT_LANGUAGE, language);

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page and return its body, treating non-2xx statuses as errors.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::fetch(url, describe(&e)))?;

    let response = response
        .error_for_status()
        .map_err(|e| AppError::fetch(url, describe(&e)))?;

    response
        .text()
        .await
        .map_err(|e| AppError::fetch(url, describe(&e)))
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timed out: {error}")
    } else if let Some(status) = error.status() {
        format!("HTTP {status}")
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_from_defaults() {
        assert!(create_async_client(&CrawlerConfig::default()).is_ok());
    }

    #[test]
    fn test_create_client_rejects_bad_header() {
        let config = CrawlerConfig {
            accept_language: "pl\nPL".to_string(),
            ..CrawlerConfig::default()
        };
        assert!(matches!(
            create_async_client(&config),
            Err(AppError::Config(_))
        ));
    }
}
