// src/utils/text.rs

//! Lead text helpers.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::normalize_whitespace;

/// Length of a string in user-perceived characters.
pub fn char_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Cut `text` to at most `max_chars` characters on a word boundary,
/// appending `…` when anything was removed.
pub fn truncate_on_word(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }

    let cut: String = text.graphemes(true).take(max_chars).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}

/// Join paragraph texts into a lead of roughly `max_chars` characters.
///
/// Paragraphs shorter than `min_paragraph` characters (captions, bylines)
/// are skipped. Returns `None` when nothing usable remains.
pub fn build_lead<'a, I>(paragraphs: I, max_chars: usize, min_paragraph: usize) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut chunks = Vec::new();
    let mut total = 0;

    for paragraph in paragraphs {
        let text = normalize_whitespace(paragraph);
        let len = char_len(&text);
        if len < min_paragraph {
            continue;
        }
        chunks.push(text);
        total += len + 1;
        if total >= max_chars {
            break;
        }
    }

    if chunks.is_empty() {
        return None;
    }
    Some(truncate_on_word(&chunks.join(" "), max_chars))
}

/// Whether a short lead ends like a finished sentence.
pub fn ends_sentence(text: &str) -> bool {
    text.trim_end().ends_with(['.', '!', '?', '…'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_on_word("Krótki tekst.", 100), "Krótki tekst.");
    }

    #[test]
    fn test_truncate_cuts_on_word_boundary() {
        let text = "Ala ma kota a kot ma Alę";
        assert_eq!(truncate_on_word(text, 10), "Ala ma…");
    }

    #[test]
    fn test_truncate_counts_polish_characters_once() {
        let text = "źdźbło źdźbło";
        assert_eq!(char_len(text), 13);
        assert_eq!(truncate_on_word(text, 13), text);
        assert_eq!(truncate_on_word(text, 8), "źdźbło…");
    }

    #[test]
    fn test_build_lead_skips_short_paragraphs() {
        let paragraphs = [
            "Fot. Redakcja",
            "  Mieszkańcy   Piotrkowa spotkali się na rynku, aby wspólnie świętować.  ",
            "Impreza trwała do późnych godzin wieczornych i przyciągnęła tłumy.",
        ];
        let lead = build_lead(paragraphs, 1000, 30).unwrap();
        assert!(lead.starts_with("Mieszkańcy Piotrkowa"));
        assert!(lead.ends_with("tłumy."));
        assert!(!lead.contains("Fot."));
    }

    #[test]
    fn test_build_lead_none_when_nothing_usable() {
        assert_eq!(build_lead(["krótko", ""], 1000, 30), None);
    }

    #[test]
    fn test_build_lead_truncates() {
        let long = "słowo ".repeat(100);
        let lead = build_lead([long.as_str()], 50, 30).unwrap();
        assert!(char_len(&lead) <= 51);
        assert!(lead.ends_with('…'));
    }

    #[test]
    fn test_ends_sentence() {
        assert!(ends_sentence("Koniec."));
        assert!(ends_sentence("Naprawdę?"));
        assert!(ends_sentence("I tak dalej…"));
        assert!(!ends_sentence("Czytaj więcej"));
    }
}
