// src/models/selectors.rs

//! CSS selectors for scraping article blocks off a listing page.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSelectors {
    /// Selectors for article anchors, tried in order
    #[serde(default = "default_link_selectors")]
    pub link_selectors: Vec<String>,

    /// Regex an anchor's raw `href` must match to count as an article
    #[serde(default = "default_link_pattern")]
    pub link_pattern: String,

    /// Selector for the title element within an article block
    #[serde(default = "default_title_selector")]
    pub title_selector: String,

    /// Image attributes holding the thumbnail URL, in priority order
    #[serde(default = "default_image_attrs")]
    pub image_attrs: Vec<String>,

    /// How many ancestors of the anchor belong to the same article block
    #[serde(default = "default_ancestor_depth")]
    pub ancestor_depth: usize,

    /// Selector for the date element within an article block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_selector: Option<String>,

    /// Selector for the lead text within an article block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_selector: Option<String>,
}

fn default_link_selectors() -> Vec<String> {
    vec![
        ".tn-img a[href^='/news/']".to_string(),
        ".bg-white a[href^='/news/']".to_string(),
        "a[href^='/news/']".to_string(),
    ]
}

fn default_link_pattern() -> String {
    r"^/news/.+,\d+$".to_string()
}

fn default_title_selector() -> String {
    ".tn-title".to_string()
}

fn default_image_attrs() -> Vec<String> {
    vec!["data-src".to_string(), "src".to_string()]
}

fn default_ancestor_depth() -> usize {
    4
}

impl Default for ArticleSelectors {
    fn default() -> Self {
        Self {
            link_selectors: default_link_selectors(),
            link_pattern: default_link_pattern(),
            title_selector: default_title_selector(),
            image_attrs: default_image_attrs(),
            ancestor_depth: default_ancestor_depth(),
            date_selector: None,
            lead_selector: None,
        }
    }
}
