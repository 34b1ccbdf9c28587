//! Vocabulary sidebar extraction
//!
//! Sidebars carry vocabulary in two incompatible encodings that changed
//! over the years of course content:
//!
//! - rule form: `"adjective + noun → a sunny day"` (grammar/usage pattern
//!   with an example)
//! - definition form: `"headword — its gloss"`, or a bold headword
//!   followed by the definition text
//!
//! Items matching neither pattern are silently dropped; source markup is
//! too inconsistent to treat a mismatch as an error.

use scraper::{ElementRef, Html, Selector};

/// A vocabulary item in one of its two mutually exclusive shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabItem {
    /// A grammar/usage rule with an example
    Rule { rule: String, example: String },

    /// A headword with its gloss
    Definition { word: String, definition: String },
}

impl VocabItem {
    /// Returns true for the rule form
    pub fn is_example(&self) -> bool {
        matches!(self, VocabItem::Rule { .. })
    }
}

const CONTAINER_SELECTORS: &[&str] = &[
    ".vocabulary",
    "#vocabulary",
    r#"[class*="vocabulary"]"#,
    ".sidebar",
    r#"[class*="sidebar"]"#,
];

/// Extracts vocabulary items from the sidebar container
///
/// Returns an empty list when no container is present. Items keep their
/// document order; the persistence layer records that order explicitly.
pub fn extract_vocabulary(html: &str) -> Vec<VocabItem> {
    let document = Html::parse_document(html);

    let Some(container) = find_container(&document) else {
        return Vec::new();
    };

    let Ok(item_selector) = Selector::parse("li, p") else {
        return Vec::new();
    };

    let mut items = Vec::new();

    for element in container.select(&item_selector) {
        let text = element.text().collect::<String>().trim().to_string();
        if text.is_empty() {
            continue;
        }

        if let Some(item) = classify_item(&text, &element) {
            items.push(item);
        }
    }

    items
}

/// Finds the vocabulary container, trying the known selector variants in
/// order of specificity
fn find_container(document: &Html) -> Option<ElementRef<'_>> {
    for selector_str in CONTAINER_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

/// Classifies one sidebar item into its vocabulary shape
///
/// Rule form wins when a directional separator is present: an arrow, or a
/// `+` connective combined with an em-dash. Otherwise an em/en dash splits
/// the item into (word, definition), and failing that a bold child names
/// the headword.
fn classify_item(text: &str, element: &ElementRef) -> Option<VocabItem> {
    let bold_text = first_bold_text(element);

    if text.contains('→') {
        return split_rule(text, '→', bold_text);
    }

    if text.contains('+') && text.contains('—') {
        return split_rule(text, '—', bold_text);
    }

    if let Some((word, definition)) = split_on_dash(text) {
        let word = word.replace("**", "").trim().to_string();
        if word.is_empty() || definition.is_empty() {
            return None;
        }
        return Some(VocabItem::Definition { word, definition });
    }

    // No divider at all: a bold headword followed by its definition
    if let Some(word) = bold_text {
        let definition = text.replacen(&word, "", 1).trim().to_string();
        if definition.is_empty() {
            return None;
        }
        return Some(VocabItem::Definition { word, definition });
    }

    None
}

fn split_rule(text: &str, separator: char, bold_text: Option<String>) -> Option<VocabItem> {
    let mut parts = text.splitn(2, separator);
    let rule = parts.next()?.trim().to_string();
    let trailing = parts.next()?.trim().to_string();

    if rule.is_empty() {
        return None;
    }

    // A bold child marks the example; otherwise the trailing text is it
    let example = bold_text.unwrap_or(trailing);
    if example.is_empty() {
        return None;
    }

    Some(VocabItem::Rule { rule, example })
}

/// Splits on the first em-dash or en-dash
fn split_on_dash(text: &str) -> Option<(String, String)> {
    let index = text.find(['—', '–'])?;
    let (left, right) = text.split_at(index);
    let right = right.trim_start_matches(['—', '–']);
    Some((left.trim().to_string(), right.trim().to_string()))
}

fn first_bold_text(element: &ElementRef) -> Option<String> {
    let selector = Selector::parse("b, strong").ok()?;
    element
        .select(&selector)
        .next()
        .map(|bold| bold.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}
