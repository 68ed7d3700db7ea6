// src/pipeline/assemble.rs

//! Feed assembly: dedup, order and cap scraped records.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{ArticleRecord, FeedConfig, FeedDocument, FeedMeta};

/// Drop records whose URL was already seen, keeping the first occurrence.
pub fn dedup_by_url(records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.url.clone()))
        .collect()
}

/// Newest first; undated records after every dated one.
fn newest_first(a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
    match (a.published_at, b.published_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Build the feed document from all records collected in one run.
///
/// Equal dates keep their collection order, so identical input always
/// yields an identical feed.
pub fn assemble(
    records: Vec<ArticleRecord>,
    config: &FeedConfig,
    now: DateTime<Utc>,
) -> FeedDocument {
    let mut items = dedup_by_url(records);
    items.sort_by(newest_first);
    items.truncate(config.max_items);

    FeedDocument {
        meta: FeedMeta::from(config),
        last_build: now,
        items,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn dated(title: &str, url: &str, day: u32) -> ArticleRecord {
        let mut record = ArticleRecord::new(title, url);
        record.published_at = Some(Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap());
        record
    }

    fn titles(doc: &FeedDocument) -> Vec<&str> {
        doc.items.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let records = vec![
            ArticleRecord::new("pierwszy", "a"),
            ArticleRecord::new("inny", "b"),
            ArticleRecord::new("drugi", "a"),
        ];

        let unique = dedup_by_url(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "pierwszy");
        assert_eq!(unique[1].url, "b");
    }

    #[test]
    fn test_assemble_orders_newest_first_with_undated_last() {
        let records = vec![
            ArticleRecord::new("bez daty 1", "u1"),
            dated("stary", "s", 1),
            dated("nowy", "n", 20),
            ArticleRecord::new("bez daty 2", "u2"),
            dated("środek", "m", 10),
        ];

        let doc = assemble(records, &FeedConfig::default(), Utc::now());
        assert_eq!(
            titles(&doc),
            vec!["nowy", "środek", "stary", "bez daty 1", "bez daty 2"]
        );
    }

    #[test]
    fn test_assemble_is_stable_for_equal_dates() {
        let records = vec![
            dated("b", "2", 5),
            dated("a", "1", 5),
            dated("c", "3", 5),
        ];

        let doc = assemble(records, &FeedConfig::default(), Utc::now());
        assert_eq!(titles(&doc), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_assemble_caps_and_fills_meta() {
        let config = FeedConfig {
            max_items: 2,
            ttl_minutes: 30,
            ..FeedConfig::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 3, 21, 6, 0, 0).unwrap();
        let records = (1..=5)
            .map(|day| dated(&format!("d{day}"), &format!("u{day}"), day))
            .collect();

        let doc = assemble(records, &config, now);
        assert_eq!(titles(&doc), vec!["d5", "d4"]);
        assert_eq!(doc.last_build, now);
        assert_eq!(doc.meta.ttl_minutes, 30);
        assert_eq!(doc.meta.title, config.title);
    }

    #[test]
    fn test_assemble_empty() {
        let doc = assemble(Vec::new(), &FeedConfig::default(), Utc::now());
        assert!(doc.is_empty());
    }
}
