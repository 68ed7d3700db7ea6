//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ArticleSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Listing pages to scrape
    #[serde(default)]
    pub listing: ListingConfig,

    /// CSS selectors for article blocks on a listing page
    #[serde(default)]
    pub selectors: ArticleSelectors,

    /// Article page enrichment
    #[serde(default)]
    pub details: DetailsConfig,

    /// Feed metadata and output
    #[serde(default)]
    pub feed: FeedConfig,

    /// Text preprocessing settings
    #[serde(default)]
    pub cleaning: CleaningConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.listing.page_count == 0 {
            return Err(AppError::validation("listing.page_count must be > 0"));
        }
        if !self.listing.page_url_template.contains("{page}") {
            return Err(AppError::validation(
                "listing.page_url_template must contain {page}",
            ));
        }
        url::Url::parse(&self.listing.base_url)?;
        url::Url::parse(&self.listing.first_page_url)?;
        if self.selectors.link_selectors.is_empty() {
            return Err(AppError::validation("selectors.link_selectors is empty"));
        }
        Regex::new(&self.selectors.link_pattern)
            .map_err(|e| AppError::validation(format!("selectors.link_pattern: {e}")))?;
        if self.details.lead_min_chars > self.details.lead_max_chars {
            return Err(AppError::validation(
                "details.lead_min_chars must not exceed details.lead_max_chars",
            ));
        }
        if self.feed.output_path.as_os_str().is_empty() {
            return Err(AppError::validation("feed.output_path is empty"));
        }
        if self.feed.max_items == 0 {
            return Err(AppError::validation("feed.max_items must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept-Language header for HTTP requests
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Which listing pages make up one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Number of listing pages to scrape
    #[serde(default = "defaults::page_count")]
    pub page_count: u32,

    /// Base URL relative links are resolved against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// URL of page 1
    #[serde(default = "defaults::first_page_url")]
    pub first_page_url: String,

    /// URL of pages 2.. with `{page}` as the index placeholder
    #[serde(default = "defaults::page_url_template")]
    pub page_url_template: String,
}

impl ListingConfig {
    /// URL of the listing page with the given 1-based index.
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.first_page_url.clone()
        } else {
            self.page_url_template.replace("{page}", &page.to_string())
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_count: defaults::page_count(),
            base_url: defaults::base_url(),
            first_page_url: defaults::first_page_url(),
            page_url_template: defaults::page_url_template(),
        }
    }
}

/// Article page enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailsConfig {
    /// Fetch article pages for dates and leads
    #[serde(default = "defaults::details_enabled")]
    pub enabled: bool,

    /// How many unique articles to enrich
    #[serde(default = "defaults::details_limit")]
    pub limit: usize,

    /// Paragraph selectors tried in order when building a lead
    #[serde(default = "defaults::lead_selectors")]
    pub lead_selectors: Vec<String>,

    /// Elements holding a human-readable publish date
    #[serde(default = "defaults::date_selectors")]
    pub date_selectors: Vec<String>,

    /// Target lead length in characters
    #[serde(default = "defaults::lead_max_chars")]
    pub lead_max_chars: usize,

    /// Leads shorter than this trigger the next fallback
    #[serde(default = "defaults::lead_min_chars")]
    pub lead_min_chars: usize,
}

impl Default for DetailsConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::details_enabled(),
            limit: defaults::details_limit(),
            lead_selectors: defaults::lead_selectors(),
            date_selectors: defaults::date_selectors(),
            lead_max_chars: defaults::lead_max_chars(),
            lead_min_chars: defaults::lead_min_chars(),
        }
    }
}

/// Static feed metadata and output location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "defaults::feed_title")]
    pub title: String,

    #[serde(default = "defaults::feed_link")]
    pub link: String,

    #[serde(default = "defaults::feed_description")]
    pub description: String,

    /// Destination file, replaced atomically on every run
    #[serde(default = "defaults::output_path")]
    pub output_path: PathBuf,

    /// `<ttl>` hint for readers, in minutes
    #[serde(default = "defaults::ttl_minutes")]
    pub ttl_minutes: u32,

    /// Upper bound on items in the feed
    #[serde(default = "defaults::max_items")]
    pub max_items: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: defaults::feed_title(),
            link: defaults::feed_link(),
            description: defaults::feed_description(),
            output_path: defaults::output_path(),
            ttl_minutes: defaults::ttl_minutes(),
            max_items: defaults::max_items(),
        }
    }
}

/// Text cleaning/preprocessing settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CleaningConfig {
    /// Patterns to remove from titles
    #[serde(default)]
    pub title_remove_patterns: Vec<String>,
}

impl CleaningConfig {
    /// Clean a title string.
    pub fn clean_title(&self, text: &str) -> String {
        let mut result = normalize_whitespace(text);
        for pattern in &self.title_remove_patterns {
            result = result.replace(pattern, "");
        }
        normalize_whitespace(&result)
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

mod defaults {
    use std::path::PathBuf;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (+https://github.com/) RSS static builder".into()
    }
    pub fn accept_language() -> String {
        "pl-PL,pl;q=0.9,en;q=0.8".into()
    }
    pub fn timeout() -> u64 {
        25
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Listing defaults
    pub fn page_count() -> u32 {
        20
    }
    pub fn base_url() -> String {
        "https://epiotrkow.pl".into()
    }
    pub fn first_page_url() -> String {
        "https://epiotrkow.pl/news/".into()
    }
    pub fn page_url_template() -> String {
        "https://epiotrkow.pl/news/wydarzenia-p{page}".into()
    }

    // Details defaults
    pub fn details_enabled() -> bool {
        true
    }
    pub fn details_limit() -> usize {
        500
    }
    pub fn lead_selectors() -> Vec<String> {
        [
            "[itemprop='articleBody'] p",
            ".news-body p",
            ".news-content p",
            ".article-body p",
            ".article-content p",
            ".entry-content p",
            "article .content p",
            "article p",
            ".post-content p",
            ".post-text p",
            ".content p",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn date_selectors() -> Vec<String> {
        vec![".news-date".into(), "time".into()]
    }
    pub fn lead_max_chars() -> usize {
        1000
    }
    pub fn lead_min_chars() -> usize {
        250
    }

    // Feed defaults
    pub fn feed_title() -> String {
        "epiotrkow.pl – Wydarzenia".into()
    }
    pub fn feed_link() -> String {
        "https://epiotrkow.pl/news/".into()
    }
    pub fn feed_description() -> String {
        "Automatyczny RSS z list newsów epiotrkow.pl.".into()
    }
    pub fn output_path() -> PathBuf {
        PathBuf::from("feed.xml")
    }
    pub fn ttl_minutes() -> u32 {
        60
    }
    pub fn max_items() -> usize {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let mut config = Config::default();
        config.listing.page_url_template = "https://epiotrkow.pl/news/p".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_link_pattern() {
        let mut config = Config::default();
        config.selectors.link_pattern = "(".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn page_url_uses_first_page_then_template() {
        let listing = ListingConfig::default();
        assert_eq!(listing.page_url(1), "https://epiotrkow.pl/news/");
        assert_eq!(
            listing.page_url(2),
            "https://epiotrkow.pl/news/wydarzenia-p2"
        );
        assert_eq!(
            listing.page_url(20),
            "https://epiotrkow.pl/news/wydarzenia-p20"
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [listing]
            page_count = 3

            [feed]
            output_path = "public/feed.xml"
            "#,
        )
        .unwrap();

        assert_eq!(config.listing.page_count, 3);
        assert_eq!(config.feed.output_path, PathBuf::from("public/feed.xml"));
        assert_eq!(config.feed.ttl_minutes, 60);
        assert_eq!(config.crawler.timeout_secs, 25);
        assert_eq!(config.selectors.link_selectors.len(), 3);
    }

    #[test]
    fn clean_title_strips_patterns_and_whitespace() {
        let cleaning = CleaningConfig {
            title_remove_patterns: vec!["[ZDJĘCIA]".to_string()],
        };
        assert_eq!(
            cleaning.clean_title("  Festyn   w parku [ZDJĘCIA] \n"),
            "Festyn w parku"
        );
    }
}
