// src/models/mod.rs

//! Domain models for the feed scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod article;
mod config;
mod feed;
mod selectors;

// Re-export all public types
pub use article::{ArticleRecord, guess_image_mime};
pub use config::{
    CleaningConfig, Config, CrawlerConfig, DetailsConfig, FeedConfig, ListingConfig,
    normalize_whitespace,
};
pub use feed::{FeedDocument, FeedMeta};
pub use selectors::ArticleSelectors;
