// src/pipeline/scrape.rs

//! Scrape pipeline: listing pages → records → feed file.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{ArticleRecord, Config};
use crate::pipeline::assemble::{assemble, dedup_by_url};
use crate::services::{ArticleParser, DetailEnricher, PageFetcher};
use crate::storage::FeedStorage;

/// Counters and timing for one scraper run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub pages_total: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    /// Records parsed across all pages, before dedup
    pub articles_collected: usize,
    pub articles_unique: usize,
    pub details_enriched: usize,
    pub details_failed: usize,
    pub items_written: usize,
    pub bytes_written: usize,
    pub output_path: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Run the scraper once and publish the feed.
///
/// Individual page or article failures are logged and skipped. The run
/// fails only if no listing page could be fetched or the feed cannot be
/// written; in both cases the previously published feed is kept.
pub async fn run_scraper(
    config: &Config,
    fetcher: &dyn PageFetcher,
    storage: &dyn FeedStorage,
) -> Result<RunSummary> {
    let started_at = Utc::now();
    let parser = ArticleParser::from_config(config)?;
    let delay = Duration::from_millis(config.crawler.request_delay_ms);
    let concurrency = config.crawler.max_concurrent.max(1);
    let pages_total = config.listing.page_count as usize;

    log::info!("Fetching {} listing pages", pages_total);

    let mut pages_fetched = 0;
    let mut collected: Vec<ArticleRecord> = Vec::new();
    let mut page_stream = stream::iter(1..=config.listing.page_count)
        .map(|page| async move {
            let url = config.listing.page_url(page);
            let result = fetcher.fetch_html(&url).await;
            (page, url, result)
        })
        .buffered(concurrency);

    while let Some((page, url, result)) = page_stream.next().await {
        match result {
            Ok(html) => {
                pages_fetched += 1;
                let parsed = parser.parse_listing(&html);
                log::debug!(
                    "Page {}: {} articles, {} skipped",
                    page,
                    parsed.records.len(),
                    parsed.skipped
                );
                collected.extend(parsed.records);
            }
            Err(e) => log::warn!("Skipping listing page {} ({}): {}", page, url, e),
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    let pages_failed = pages_total - pages_fetched;
    if pages_fetched == 0 {
        log::error!("No listing pages fetched; keeping the existing feed");
        return Err(AppError::NoPagesFetched {
            attempted: pages_total,
        });
    }

    let articles_collected = collected.len();
    let mut records = dedup_by_url(collected);
    let articles_unique = records.len();
    log::info!(
        "Collected {} articles ({} unique) from {}/{} pages",
        articles_collected,
        articles_unique,
        pages_fetched,
        pages_total
    );

    let (details_enriched, details_failed) = if config.details.enabled {
        let enricher = DetailEnricher::new(fetcher, &config.details, delay)?;
        let outcome = enricher.enrich(&mut records, concurrency).await;
        log::info!(
            "Article details: {}/{} enriched, {} failed",
            outcome.enriched,
            outcome.attempted,
            outcome.failed
        );
        (outcome.enriched, outcome.failed)
    } else {
        (0, 0)
    };

    let doc = assemble(records, &config.feed, Utc::now());
    let written = storage.write_feed(&doc).await?;

    Ok(RunSummary {
        pages_total,
        pages_fetched,
        pages_failed,
        articles_collected,
        articles_unique,
        details_enriched,
        details_failed,
        items_written: written.item_count,
        bytes_written: written.bytes_written,
        output_path: written.path,
        started_at,
        finished_at: Utc::now(),
    })
}
