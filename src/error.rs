// src/error.rs

//! Unified error handling for the feed scraper.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or a request could not be sent
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// RSS document could not be written or read back
    #[error("RSS error: {0}")]
    Rss(#[from] rss::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single page could not be fetched (network, status or timeout)
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// A single article block could not be turned into a record
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// The output feed could not be written
    #[error("Write error for {path}: {message}")]
    Write { path: String, message: String },

    /// Every listing page failed, so there is nothing to publish
    #[error("No listing pages could be fetched ({attempted} attempted)")]
    NoPagesFetched { attempted: usize },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for a URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a write error for an output path.
    pub fn write(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        Self::Write {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Whether the error only affects one page or one article.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_and_parse_are_recoverable() {
        assert!(AppError::fetch("https://example.com", "timeout").is_recoverable());
        assert!(AppError::parse("listing", "missing title").is_recoverable());
    }

    #[test]
    fn test_write_is_fatal() {
        let err = AppError::write("/nope/feed.xml", "permission denied");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Write error for /nope/feed.xml: permission denied"
        );
        assert!(!AppError::NoPagesFetched { attempted: 20 }.is_recoverable());
    }
}
