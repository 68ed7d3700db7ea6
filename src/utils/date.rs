// src/utils/date.rs

//! Publish-date parsing for the formats the site uses.
//!
//! Article pages expose ISO 8601 timestamps (JSON-LD, meta tags) while
//! visible date labels are Polish (`18 października 2026`) or numeric
//! (`18.10.2026 14:30`). Dates without a time of day are pinned to 12:00 UTC.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

static POLISH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s+(\p{L}+)\s+(\d{4})(?:\D{1,5}(\d{1,2}):(\d{2}))?")
        .expect("valid polish date regex")
});

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[./-](\d{1,2})[./-](\d{4})(?:\D{1,5}(\d{1,2}):(\d{2}))?")
        .expect("valid numeric date regex")
});

/// Parse any supported date representation.
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_iso_datetime(text)
        .or_else(|| parse_polish_date(text))
        .or_else(|| parse_numeric_date(text))
}

/// Parse an ISO 8601 / RFC 3339 timestamp, with or without offset.
pub fn parse_iso_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(at_noon)
}

/// Parse a Polish date label such as `5 maja 2025` or `5 maja 2025, 14:30`.
pub fn parse_polish_date(text: &str) -> Option<DateTime<Utc>> {
    let caps = POLISH_DATE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = polish_month(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    build(year, month, day, caps.get(4), caps.get(5))
}

/// Parse a numeric `DD.MM.YYYY` date with an optional `HH:MM`.
pub fn parse_numeric_date(text: &str) -> Option<DateTime<Utc>> {
    let caps = NUMERIC_DATE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    build(year, month, day, caps.get(4), caps.get(5))
}

/// Map a Polish month name in the genitive (with or without diacritics).
fn polish_month(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "stycznia" => 1,
        "lutego" => 2,
        "marca" => 3,
        "kwietnia" => 4,
        "maja" => 5,
        "czerwca" => 6,
        "lipca" => 7,
        "sierpnia" => 8,
        "września" | "wrzesnia" => 9,
        "października" | "pazdziernika" => 10,
        "listopada" => 11,
        "grudnia" => 12,
        _ => return None,
    };
    Some(month)
}

fn build(
    year: i32,
    month: u32,
    day: u32,
    hour: Option<regex::Match<'_>>,
    minute: Option<regex::Match<'_>>,
) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    match (hour, minute) {
        (Some(h), Some(m)) => {
            let time = NaiveTime::from_hms_opt(h.as_str().parse().ok()?, m.as_str().parse().ok()?, 0)?;
            Some(date.and_time(time).and_utc())
        }
        _ => Some(at_noon(date)),
    }
}

fn at_noon(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_iso_datetime("2025-03-10T08:15:00+01:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 10, 7, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_iso_zulu_and_naive() {
        assert_eq!(
            parse_iso_datetime("2025-03-10T08:15:00Z"),
            Some(Utc.with_ymd_and_hms(2025, 3, 10, 8, 15, 0).unwrap())
        );
        assert_eq!(
            parse_iso_datetime("2025-03-10 08:15:00"),
            Some(Utc.with_ymd_and_hms(2025, 3, 10, 8, 15, 0).unwrap())
        );
        assert_eq!(
            parse_iso_datetime("2025-03-10"),
            Some(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_polish_date() {
        assert_eq!(
            parse_polish_date("Dodano: 5 października 2024"),
            Some(Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap())
        );
        assert_eq!(
            parse_polish_date("12 WRZESNIA 2023"),
            Some(Utc.with_ymd_and_hms(2023, 9, 12, 12, 0, 0).unwrap())
        );
        assert_eq!(
            parse_polish_date("1 maja 2025, 14:30"),
            Some(Utc.with_ymd_and_hms(2025, 5, 1, 14, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_polish_date_rejects_unknown_month() {
        assert_eq!(parse_polish_date("5 foo 2024"), None);
        assert_eq!(parse_polish_date("31 lutego 2024"), None);
    }

    #[test]
    fn test_parse_numeric_date() {
        assert_eq!(
            parse_numeric_date("18.10.2026 14:05"),
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap())
        );
        assert_eq!(
            parse_numeric_date("18.10.2026"),
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_date_text_fallbacks() {
        assert!(parse_date_text("2024-01-02T10:00:00Z").is_some());
        assert!(parse_date_text("2 stycznia 2024").is_some());
        assert!(parse_date_text("02.01.2024").is_some());
        assert_eq!(parse_date_text("wczoraj"), None);
        assert_eq!(parse_date_text("   "), None);
    }
}
