//! Utility functions and helpers.

pub mod date;
pub mod http;
pub mod text;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// Returns `None` when the result is not an http(s) URL.
pub fn resolve_absolute(base: &Url, href: &str) -> Option<String> {
    let joined = base.join(href.trim()).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}

/// Map an article URL `/news/slug,ID` to its gallery twin `/galeria/slug,ID`.
pub fn gallery_variant(url: &str) -> Option<String> {
    if !url.contains(',') {
        return None;
    }
    let (before, after) = url.split_once("/news/")?;
    Some(format!("{before}/galeria/{after}"))
}

/// Candidate AMP URLs for an article: `?amp`, `?amp=1`, `?output=amp`
/// and a trailing `/amp` path segment.
pub fn amp_variants(url: &str) -> Vec<String> {
    let Ok(parsed) = Url::parse(url) else {
        return Vec::new();
    };

    let with_query = |key: &str, value: &str| {
        let kept: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(k, _)| k != key)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let mut variant = parsed.clone();
        variant
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(key, value);
        variant.to_string()
    };

    let mut candidates = vec![
        with_query("amp", ""),
        with_query("amp", "1"),
        with_query("output", "amp"),
    ];
    if !parsed.path().ends_with("/amp") {
        let mut variant = parsed.clone();
        variant.set_path(&format!("{}/amp", parsed.path().trim_end_matches('/')));
        candidates.push(variant.to_string());
    }

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| c != url && seen.insert(c.clone()));
    candidates
}
