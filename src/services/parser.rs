// src/services/parser.rs

//! Listing page parser.
//!
//! Turns the HTML of one listing page into [`ArticleRecord`]s using the
//! configured CSS selectors. An article block is the matched anchor plus a
//! few of its ancestors; titles, thumbnails, dates and leads are looked up
//! in that scope, closest element first.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ArticleRecord, ArticleSelectors, CleaningConfig, Config, normalize_whitespace};
use crate::services::parse_selector;
use crate::utils::date::parse_date_text;
use crate::utils::resolve_absolute;

/// Records extracted from one listing page.
#[derive(Debug, Default)]
pub struct ListingParse {
    /// Articles in document order
    pub records: Vec<ArticleRecord>,
    /// Article blocks dropped as malformed
    pub skipped: usize,
    /// The page ended before `</html>`
    pub truncated: bool,
}

/// Parser for listing pages, with selectors compiled once per run.
pub struct ArticleParser {
    link_sel: Selector,
    link_pattern: Regex,
    title_sel: Selector,
    img_sel: Selector,
    date_sel: Option<Selector>,
    lead_sel: Option<Selector>,
    image_attrs: Vec<String>,
    ancestor_depth: usize,
    cleaning: CleaningConfig,
    base_url: Url,
}

impl ArticleParser {
    /// Compile a parser from selector settings.
    pub fn new(
        selectors: &ArticleSelectors,
        cleaning: &CleaningConfig,
        base_url: &str,
    ) -> Result<Self> {
        let link_sel = parse_selector(&selectors.link_selectors.join(", "))?;
        let link_pattern = Regex::new(&selectors.link_pattern)
            .map_err(|e| AppError::selector(&selectors.link_pattern, e))?;

        Ok(Self {
            link_sel,
            link_pattern,
            title_sel: parse_selector(&selectors.title_selector)?,
            img_sel: parse_selector("img")?,
            date_sel: selectors
                .date_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            lead_sel: selectors
                .lead_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            image_attrs: selectors.image_attrs.clone(),
            ancestor_depth: selectors.ancestor_depth,
            cleaning: cleaning.clone(),
            base_url: Url::parse(base_url)?,
        })
    }

    /// Compile a parser from the full application config.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.selectors, &config.cleaning, &config.listing.base_url)
    }

    /// Extract all article records from a listing page.
    ///
    /// Malformed blocks are skipped with a warning; an empty page yields an
    /// empty result.
    pub fn parse_listing(&self, html: &str) -> ListingParse {
        let document = Html::parse_document(html);
        let mut outcome = ListingParse {
            truncated: !looks_complete(html),
            ..ListingParse::default()
        };

        if outcome.truncated {
            log::warn!("Listing page looks truncated; keeping the blocks that parsed");
        }

        let mut seen_href = HashSet::new();
        for anchor in document.select(&self.link_sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if !seen_href.insert(href.to_string()) || !self.link_pattern.is_match(href) {
                continue;
            }

            match self.parse_block(href, anchor) {
                Ok(record) => outcome.records.push(record),
                Err(e) => {
                    outcome.skipped += 1;
                    log::warn!("Skipping article block: {}", e);
                }
            }
        }

        outcome
    }

    fn parse_block(&self, href: &str, anchor: ElementRef<'_>) -> Result<ArticleRecord> {
        let url = resolve_absolute(&self.base_url, href)
            .ok_or_else(|| AppError::parse(href, "link does not resolve to an http(s) URL"))?;
        let scope = self.block_scope(anchor, href);
        let title = self
            .extract_title(&scope)
            .ok_or_else(|| AppError::parse(&url, "article block has no title"))?;

        let mut record = ArticleRecord::new(title, url);
        record.thumbnail_url = self.extract_image(&scope);
        record.published_at = self
            .date_sel
            .as_ref()
            .and_then(|sel| find_text(&scope, sel))
            .and_then(|text| {
                let parsed = parse_date_text(&text);
                if parsed.is_none() {
                    log::debug!("Unparseable date '{}' for {}", text, record.url);
                }
                parsed
            });
        record.lead = self.lead_sel.as_ref().and_then(|sel| find_text(&scope, sel));

        Ok(record)
    }

    /// The anchor followed by its enclosing elements, closest first.
    ///
    /// Stops after `ancestor_depth` levels or at the first ancestor that also
    /// holds a link to a different article.
    fn block_scope<'a>(&self, anchor: ElementRef<'a>, href: &str) -> Vec<ElementRef<'a>> {
        std::iter::once(anchor)
            .chain(
                anchor
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .take(self.ancestor_depth)
                    .take_while(|el| !self.links_other_article(*el, href)),
            )
            .collect()
    }

    fn links_other_article(&self, element: ElementRef<'_>, href: &str) -> bool {
        element.select(&self.link_sel).any(|a| {
            a.value()
                .attr("href")
                .map(str::trim)
                .is_some_and(|other| other != href && self.link_pattern.is_match(other))
        })
    }

    fn extract_title(&self, scope: &[ElementRef<'_>]) -> Option<String> {
        let clean = |text: String| Some(self.cleaning.clean_title(&text)).filter(|t| !t.is_empty());
        let anchor = scope[0];

        anchor
            .select(&self.title_sel)
            .next()
            .and_then(|el| clean(element_text(el)))
            .or_else(|| clean(element_text(anchor)))
            .or_else(|| {
                scope[1..]
                    .iter()
                    .find_map(|el| el.select(&self.title_sel).next())
                    .and_then(|el| clean(element_text(el)))
            })
            .or_else(|| {
                anchor
                    .select(&self.img_sel)
                    .find_map(|img| img.value().attr("alt"))
                    .and_then(|alt| clean(alt.to_string()))
            })
    }

    fn extract_image(&self, scope: &[ElementRef<'_>]) -> Option<String> {
        scope.iter().find_map(|el| {
            el.select(&self.img_sel).find_map(|img| {
                self.image_attrs
                    .iter()
                    .filter_map(|attr| img.value().attr(attr))
                    .map(str::trim)
                    .find(|src| !src.is_empty() && !src.starts_with("data:"))
                    .and_then(|src| resolve_absolute(&self.base_url, src))
            })
        })
    }
}

/// First non-empty text for `selector` within the block scope.
fn find_text(scope: &[ElementRef<'_>], selector: &Selector) -> Option<String> {
    scope
        .iter()
        .find_map(|el| el.select(selector).next())
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Whitespace-normalized text content of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn looks_complete(html: &str) -> bool {
    html.to_ascii_lowercase().contains("</html>")
}
