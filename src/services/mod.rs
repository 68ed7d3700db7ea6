//! Service layer for the scraper.
//!
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Listing page parsing (`ArticleParser`)
//! - Article page enrichment (`DetailEnricher`)

mod details;
mod fetcher;
mod parser;

use scraper::Selector;

use crate::error::{AppError, Result};

pub use details::{ArticleDetails, DetailEnricher, EnrichOutcome};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use parser::{ArticleParser, ListingParse};

#[cfg(test)]
pub(crate) use fetcher::stub;

/// Compile a CSS selector, keeping the offending text in the error.
pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
