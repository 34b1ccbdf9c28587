//! Page-level metadata extraction

use scraper::{Html, Selector};

use crate::extract::richtext::element_text;

/// Words an activity instruction paragraph tends to open with
const INSTRUCTION_KEYWORDS: &[&str] = &["listen", "read", "watch", "complete", "choose"];

/// Extracts a unit page's title
///
/// Falls back to `"Unit {N}"` when the dedicated title span is missing.
pub fn extract_unit_title(html: &str, unit_number: u32) -> String {
    let document = Html::parse_document(html);

    if let Ok(selector) = Selector::parse("span.bbcle-unit-title") {
        if let Some(element) = document.select(&selector).next() {
            let title = element.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                return title;
            }
        }
    }

    format!("Unit {unit_number}")
}

/// Extracts a page's main heading (first `h1`, then `h2`)
pub fn extract_page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("h1, h2").ok()?;

    document
        .select(&selector)
        .map(|el| element_text(&el))
        .find(|t| !t.is_empty())
}

/// Extracts an activity's instruction line
///
/// The instruction is the first paragraph opening with an imperative the
/// course uses ("Listen to...", "Read the...", "Complete the...").
pub fn extract_instruction(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p").ok()?;

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| {
            let lowered = text.to_lowercase();
            INSTRUCTION_KEYWORDS
                .iter()
                .any(|keyword| lowered.starts_with(keyword))
        })
}

/// Extracts session titles from a unit overview page's `h3` headings
///
/// Overview pages head each session summary with an `h3`; the list is in
/// document order, so index `n` belongs to session `n + 1`.
pub fn extract_overview_titles(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("h3") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
