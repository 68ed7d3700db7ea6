//! Storage abstractions for the published feed.
//!
//! The feed is rendered to RSS 2.0 in memory ([`rss::render`]) and handed to
//! a [`FeedStorage`] backend. [`LocalStorage`] replaces the output file
//! atomically, so readers never see a half-written feed and a failed run
//! leaves the previous one in place.

pub mod local;
pub mod rss;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FeedDocument;

pub use local::LocalStorage;

/// Metadata about a feed write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Where the feed was written
    pub path: PathBuf,
    /// Number of items in the feed
    pub item_count: usize,
    /// Size of the rendered document
    pub bytes_written: usize,
}

/// Trait for feed storage backends.
#[async_trait]
pub trait FeedStorage: Send + Sync {
    /// Render and persist the feed, replacing any previous one.
    async fn write_feed(&self, doc: &FeedDocument) -> Result<WriteMetadata>;

    /// Read back the currently published feed, if there is one.
    async fn load_feed(&self) -> Result<Option<::rss::Channel>>;
}
