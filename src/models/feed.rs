//! Assembled feed document.

use chrono::{DateTime, Utc};

use crate::models::{ArticleRecord, FeedConfig};

/// Channel-level metadata of the published feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: String,
    pub link: String,
    pub description: String,
    pub ttl_minutes: u32,
}

impl From<&FeedConfig> for FeedMeta {
    fn from(config: &FeedConfig) -> Self {
        Self {
            title: config.title.clone(),
            link: config.link.clone(),
            description: config.description.clone(),
            ttl_minutes: config.ttl_minutes,
        }
    }
}

/// The ready-to-serialize feed: metadata plus items, newest first.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub meta: FeedMeta,
    pub last_build: DateTime<Utc>,
    pub items: Vec<ArticleRecord>,
}

impl FeedDocument {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
