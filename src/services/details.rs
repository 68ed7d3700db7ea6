// src/services/details.rs

//! Article page enrichment.
//!
//! Listing pages carry no dates and at best a teaser, so the first N unique
//! articles have their own page fetched. Sources are tried in order:
//!
//! 1. JSON-LD `Article` objects (`datePublished`, `articleBody`/`description`)
//! 2. Meta tags (`article:published_time`, `datePublished`, `date`)
//! 3. Visible date labels (`.news-date`, `time`), Polish or numeric
//! 4. Body paragraphs for the lead
//! 5. AMP versions of the page (`<link rel="amphtml">` and the usual URL
//!    patterns) while the date is missing or the lead is short
//! 6. The `/galeria/` twin of the article when the lead is still short

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::models::{ArticleRecord, DetailsConfig, normalize_whitespace};
use crate::services::parser::element_text;
use crate::services::{PageFetcher, parse_selector};
use crate::utils::date::{parse_date_text, parse_iso_datetime};
use crate::utils::{amp_variants, gallery_variant, resolve_absolute};
use crate::utils::text::{build_lead, char_len, ends_sentence, truncate_on_word};

/// JSON-LD text shorter than this is not a lead.
const JSONLD_MIN_CHARS: usize = 40;
/// Paragraphs shorter than this are captions or bylines.
const PARAGRAPH_MIN_CHARS: usize = 30;
/// Leads shorter than this must end like a sentence to be kept.
const SHORT_LEAD_CHARS: usize = 80;

const META_DATE_SELECTORS: [&str; 4] = [
    "meta[property='article:published_time']",
    "meta[name='article:published_time']",
    "meta[itemprop='datePublished']",
    "meta[name='date']",
];

/// Date and lead found on an article page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDetails {
    pub published_at: Option<DateTime<Utc>>,
    pub lead: Option<String>,
}

/// Counters for one enrichment pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOutcome {
    pub attempted: usize,
    pub enriched: usize,
    pub failed: usize,
}

/// Fetches article pages and extracts dates and leads.
pub struct DetailEnricher<'a> {
    fetcher: &'a dyn PageFetcher,
    config: DetailsConfig,
    delay: Duration,
    jsonld_sel: Selector,
    amp_link_sel: Selector,
    meta_sels: Vec<Selector>,
    date_sels: Vec<Selector>,
    lead_sels: Vec<Selector>,
    fallback_lead_sels: Vec<Selector>,
}

impl<'a> DetailEnricher<'a> {
    /// Create an enricher; fails if a configured selector is invalid.
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        config: &DetailsConfig,
        delay: Duration,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            config: config.clone(),
            delay,
            jsonld_sel: parse_selector("script[type='application/ld+json']")?,
            amp_link_sel: parse_selector("link[rel~='amphtml']")?,
            meta_sels: META_DATE_SELECTORS
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_>>()?,
            date_sels: compile_all(&config.date_selectors)?,
            lead_sels: compile_all(&config.lead_selectors)?,
            fallback_lead_sels: vec![parse_selector("main p")?, parse_selector("p")?],
        })
    }

    /// Enrich the first `config.limit` records in place.
    ///
    /// Pages are fetched with at most `concurrency` requests in flight; a
    /// failed page leaves its record as parsed from the listing.
    pub async fn enrich(&self, records: &mut [ArticleRecord], concurrency: usize) -> EnrichOutcome {
        let limit = self.config.limit.min(records.len());
        let mut outcome = EnrichOutcome {
            attempted: limit,
            ..EnrichOutcome::default()
        };

        let urls: Vec<String> = records[..limit].iter().map(|r| r.url.clone()).collect();
        let mut detail_stream = stream::iter(urls.into_iter().enumerate())
            .map(|(index, url)| async move {
                let result = self.fetch_details(&url).await;
                (index, url, result)
            })
            .buffered(concurrency.max(1));

        while let Some((index, url, result)) = detail_stream.next().await {
            match result {
                Ok(details) => {
                    apply(&mut records[index], details);
                    outcome.enriched += 1;
                }
                Err(e) => {
                    outcome.failed += 1;
                    log::warn!("Failed to fetch article details for {}: {}", url, e);
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        outcome
    }

    /// Fetch one article (and its AMP or gallery twins if needed) and
    /// extract details.
    pub async fn fetch_details(&self, url: &str) -> Result<ArticleDetails> {
        let html = self.fetcher.fetch_html(url).await?;
        let (mut details, amp_link) = self.extract_page(&html);

        if !self.is_complete(&details) {
            for amp_url in amp_candidates(url, amp_link) {
                if self.is_complete(&details) {
                    break;
                }
                match self.fetcher.fetch_html(&amp_url).await {
                    Ok(amp_html) => {
                        let amp = self.extract(&amp_html);
                        details.published_at = details.published_at.or(amp.published_at);
                        if !self.lead_is_good(details.lead.as_deref())
                            && self.lead_is_good(amp.lead.as_deref())
                        {
                            details.lead = amp.lead;
                        }
                    }
                    Err(e) => log::debug!("AMP fetch failed for {}: {}", amp_url, e),
                }
            }
        }

        if !self.lead_is_good(details.lead.as_deref()) {
            if let Some(gallery_url) = gallery_variant(url) {
                match self.fetcher.fetch_html(&gallery_url).await {
                    Ok(gallery_html) => {
                        let gallery = self.extract(&gallery_html);
                        details.published_at = details.published_at.or(gallery.published_at);
                        if details.lead.is_none() || self.lead_is_good(gallery.lead.as_deref()) {
                            details.lead = gallery.lead.or(details.lead);
                        }
                    }
                    Err(e) => log::debug!("Gallery fetch failed for {}: {}", gallery_url, e),
                }
            }
        }

        details.lead = details
            .lead
            .filter(|lead| char_len(lead) >= SHORT_LEAD_CHARS || ends_sentence(lead));
        Ok(details)
    }

    /// Extract date and lead from one article page.
    pub fn extract(&self, html: &str) -> ArticleDetails {
        self.extract_page(html).0
    }

    /// Date and lead, plus the page's `rel="amphtml"` link if it has one.
    fn extract_page(&self, html: &str) -> (ArticleDetails, Option<String>) {
        let document = Html::parse_document(html);
        let (jsonld_date, jsonld_lead) = self.extract_jsonld(&document);

        let published_at = jsonld_date
            .or_else(|| self.extract_meta_date(&document))
            .or_else(|| self.extract_visible_date(&document));

        let mut lead = jsonld_lead;
        if !self.lead_is_good(lead.as_deref()) {
            if let Some(built) = self.extract_paragraph_lead(&document) {
                if lead.is_none() || self.lead_is_good(Some(&built)) {
                    lead = Some(built);
                }
            }
        }

        let amp_link = document
            .select(&self.amp_link_sel)
            .find_map(|link| link.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty());

        (ArticleDetails { published_at, lead }, amp_link)
    }

    fn is_complete(&self, details: &ArticleDetails) -> bool {
        details.published_at.is_some() && self.lead_is_good(details.lead.as_deref())
    }

    fn lead_is_good(&self, lead: Option<&str>) -> bool {
        lead.is_some_and(|l| char_len(l) >= self.config.lead_min_chars)
    }

    fn extract_jsonld(&self, document: &Html) -> (Option<DateTime<Utc>>, Option<String>) {
        for script in document.select(&self.jsonld_sel) {
            let raw: String = script.text().collect();
            let Ok(data) = serde_json::from_str::<Value>(raw.trim()) else {
                log::debug!("Ignoring malformed JSON-LD block");
                continue;
            };

            let mut date = None;
            let mut lead = None;
            for object in jsonld_objects(&data) {
                if !is_article(object) {
                    continue;
                }
                if date.is_none() {
                    date = ["datePublished", "dateCreated"]
                        .iter()
                        .filter_map(|key| object.get(*key).and_then(Value::as_str))
                        .find_map(parse_iso_datetime);
                }
                if lead.is_none() {
                    lead = ["articleBody", "description"]
                        .iter()
                        .filter_map(|key| object.get(*key).and_then(Value::as_str))
                        .map(html_to_text)
                        .find(|text| char_len(text) >= JSONLD_MIN_CHARS)
                        .map(|text| truncate_on_word(&text, self.config.lead_max_chars));
                }
            }

            if date.is_some() || lead.is_some() {
                return (date, lead);
            }
        }
        (None, None)
    }

    fn extract_meta_date(&self, document: &Html) -> Option<DateTime<Utc>> {
        self.meta_sels.iter().find_map(|sel| {
            document
                .select(sel)
                .filter_map(|meta| meta.value().attr("content"))
                .find_map(parse_iso_datetime)
        })
    }

    fn extract_visible_date(&self, document: &Html) -> Option<DateTime<Utc>> {
        self.date_sels.iter().find_map(|sel| {
            document.select(sel).find_map(|el| {
                el.value()
                    .attr("datetime")
                    .and_then(parse_date_text)
                    .or_else(|| parse_date_text(&element_text(el)))
            })
        })
    }

    fn extract_paragraph_lead(&self, document: &Html) -> Option<String> {
        let paragraphs = self
            .lead_sels
            .iter()
            .chain(&self.fallback_lead_sels)
            .map(|sel| document.select(sel).map(element_text).collect::<Vec<_>>())
            .find(|found| !found.is_empty())?;

        build_lead(
            paragraphs.iter().map(String::as_str),
            self.config.lead_max_chars,
            PARAGRAPH_MIN_CHARS,
        )
    }
}

/// The page's own AMP link first, then the guessed AMP URLs.
fn amp_candidates(url: &str, amp_link: Option<String>) -> Vec<String> {
    let linked = amp_link.and_then(|href| {
        let base = Url::parse(url).ok()?;
        resolve_absolute(&base, &href)
    });

    let mut candidates: Vec<String> = linked.into_iter().collect();
    for variant in amp_variants(url) {
        if !candidates.contains(&variant) {
            candidates.push(variant);
        }
    }
    candidates.retain(|c| c != url);
    candidates
}

fn compile_all(list: &[String]) -> Result<Vec<Selector>> {
    list.iter().map(|s| parse_selector(s)).collect()
}

/// Overlay details from the article page onto a listing record.
fn apply(record: &mut ArticleRecord, details: ArticleDetails) {
    if details.published_at.is_some() {
        record.published_at = details.published_at;
    }
    if details.lead.is_some() {
        record.lead = details.lead;
    }
}

/// Top-level objects, array members and `@graph` members of a JSON-LD value.
fn jsonld_objects(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(jsonld_objects).collect(),
        Value::Object(map) => {
            let mut objects = vec![value];
            if let Some(graph) = map.get("@graph") {
                objects.extend(jsonld_objects(graph));
            }
            objects
        }
        _ => Vec::new(),
    }
}

fn is_article(object: &Value) -> bool {
    let kind = object.get("@type").or_else(|| object.get("type"));
    match kind {
        Some(Value::String(s)) => s.contains("Article"),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.contains("Article")),
        _ => false,
    }
}

/// Plain text of a string that may hold markup or entities.
fn html_to_text(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    normalize_whitespace(&fragment.root_element().text().collect::<Vec<_>>().join(" "))
}
