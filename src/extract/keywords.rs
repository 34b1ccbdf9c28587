//! Bold keyword extraction
//!
//! Emphasis markup in lesson content marks the taught vocabulary. Every
//! `<b>`/`<strong>` tag becomes a keyword with its parent element's full
//! text as the context sentence.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// A bold keyword with the sentence it appeared in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoldWord {
    pub word: String,

    /// Full text of the tag's immediate parent element
    pub context: String,
}

/// Keywords outside this length range are markup noise (single characters,
/// whole bolded paragraphs)
const MIN_WORD_LEN: usize = 2;
const MAX_WORD_LEN: usize = 100;

/// Extracts bold keywords with context from content HTML
///
/// Keywords are deduplicated case-insensitively, keeping the first
/// occurrence and its context.
pub fn extract_bold_words(html: &str) -> Vec<BoldWord> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("b, strong") else {
        return Vec::new();
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut words = Vec::new();

    for element in document.select(&selector) {
        let word = element.text().collect::<String>().trim().to_string();
        if word.len() < MIN_WORD_LEN || word.len() > MAX_WORD_LEN {
            continue;
        }

        if !seen.insert(word.to_lowercase()) {
            continue;
        }

        let context = parent_text(&element).unwrap_or_else(|| word.clone());
        words.push(BoldWord { word, context });
    }

    words
}

/// Full text of the element's parent, if the parent is an element
fn parent_text(element: &ElementRef) -> Option<String> {
    let parent = element.parent().and_then(ElementRef::wrap)?;
    let text = parent.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_word_and_context() {
        let html = "<p>She was <strong>resilient</strong> after the setback.</p>";
        let words = extract_bold_words(html);

        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "resilient");
        assert_eq!(words[0].context, "She was resilient after the setback.");
    }

    #[test]
    fn test_b_tag_also_matches() {
        let html = "<p>A <b>frugal</b> shopper.</p>";
        let words = extract_bold_words(html);
        assert_eq!(words[0].word, "frugal");
    }

    #[test]
    fn test_case_insensitive_dedup_keeps_first() {
        let html = "<p>First <strong>Keen</strong> use.</p>\
                    <p>Second <strong>keen</strong> use.</p>";
        let words = extract_bold_words(html);

        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "Keen");
        assert!(words[0].context.contains("First"));
    }

    #[test]
    fn test_order_preserved() {
        let html = "<p><strong>alpha</strong></p><p><strong>beta</strong></p>\
                    <p><strong>gamma</strong></p>";
        let words = extract_bold_words(html);
        let list: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(list, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_single_characters_skipped() {
        let html = "<p><strong>a</strong> and <strong>ok</strong></p>";
        let words = extract_bold_words(html);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "ok");
    }

    #[test]
    fn test_overlong_bold_skipped() {
        let long = "x".repeat(120);
        let html = format!("<p><strong>{long}</strong></p>");
        assert!(extract_bold_words(&html).is_empty());
    }

    #[test]
    fn test_empty_tags_skipped() {
        let html = "<p><strong>  </strong>text</p>";
        assert!(extract_bold_words(html).is_empty());
    }
}
