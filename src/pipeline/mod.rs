//! Pipeline entry points.
//!
//! - `run_scraper`: fetch listing pages, enrich articles and publish the feed
//! - `assemble`: dedup, order and cap records into a `FeedDocument`

pub mod assemble;
pub mod scrape;

pub use assemble::{assemble, dedup_by_url};
pub use scrape::{RunSummary, run_scraper};
