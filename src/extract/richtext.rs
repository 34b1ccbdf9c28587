//! Transcript and content-block extraction
//!
//! Course pages carry their transcript in a rich-text container that the
//! site hides with CSS (`widget-richtext-hideable`); the remaining
//! rich-text containers hold the visible lesson content. Both are filtered
//! by a minimum length so empty placeholder widgets are dropped.

use scraper::{ElementRef, Html, Selector};

/// Containers shorter than this are treated as empty placeholders
pub const MIN_CONTENT_LEN: usize = 50;

const HIDEABLE_CLASS: &str = "widget-richtext-hideable";

/// An extracted transcript, both as markup and as plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// Inner HTML of the transcript container (preserves <p>, <strong>, …)
    pub html: String,

    /// Plain text with line breaks between text nodes
    pub text: String,
}

/// Extracts the transcript from a hideable rich-text container
///
/// Returns `None` if the container is absent or its content is below
/// [`MIN_CONTENT_LEN`] characters.
pub fn extract_transcript(html: &str) -> Option<Transcript> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("div.widget-richtext-hideable div.widget-richtext").ok()?;

    let element = document.select(&selector).next()?;
    let inner = element.inner_html().trim().to_string();

    if inner.len() < MIN_CONTENT_LEN {
        return None;
    }

    Some(Transcript {
        html: inner,
        text: element_text(&element),
    })
}

/// Extracts standalone rich-text blocks, excluding any nested inside the
/// hideable transcript container
///
/// Blocks below [`MIN_CONTENT_LEN`] are dropped. Blocks are returned in
/// document order.
pub fn extract_content_blocks(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("div.widget-richtext") else {
        return Vec::new();
    };

    let mut blocks = Vec::new();

    for element in document.select(&selector) {
        if inside_hideable(&element) {
            continue;
        }

        let inner = element.inner_html().trim().to_string();
        if inner.len() >= MIN_CONTENT_LEN {
            blocks.push(inner);
        }
    }

    blocks
}

/// Joins content blocks with a blank-line separator
///
/// Returns `None` when no blocks were found, so callers can distinguish
/// "no content" from empty content.
pub fn combine_content_blocks(blocks: &[String]) -> Option<String> {
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

/// Checks whether any ancestor carries the hideable container class
fn inside_hideable(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        ElementRef::wrap(node)
            .and_then(|el| el.value().attr("class"))
            .map(|classes| classes.contains(HIDEABLE_CLASS))
            .unwrap_or(false)
    })
}

/// Plain text of an HTML fragment, one line per text node
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let root = fragment.root_element();
    element_text(&root)
}

/// Collects the element's text nodes, trimmed, joined with newlines
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_PARAGRAPH: &str =
        "<p>This transcript paragraph is comfortably longer than fifty characters in total.</p>";

    #[test]
    fn test_transcript_extracted() {
        let html = format!(
            r#"<div class="widget-richtext-hideable">
                 <div class="widget-richtext">{LONG_PARAGRAPH}</div>
               </div>"#
        );

        let transcript = extract_transcript(&html).unwrap();
        assert!(transcript.html.contains("fifty characters"));
        assert!(transcript.text.contains("fifty characters"));
        assert!(!transcript.text.contains("<p>"));
    }

    #[test]
    fn test_no_hideable_container() {
        let html = format!(r#"<div class="widget-richtext">{LONG_PARAGRAPH}</div>"#);
        assert!(extract_transcript(&html).is_none());
    }

    #[test]
    fn test_transcript_below_threshold() {
        let html = r#"<div class="widget-richtext-hideable">
            <div class="widget-richtext"><p>Too short</p></div>
        </div>"#;
        assert!(extract_transcript(html).is_none());
    }

    #[test]
    fn test_content_blocks_exclude_transcript() {
        let html = format!(
            r#"<div class="widget-richtext">{LONG_PARAGRAPH}</div>
               <div class="widget-richtext-hideable">
                 <div class="widget-richtext">{LONG_PARAGRAPH}</div>
               </div>
               <div class="widget-richtext">{LONG_PARAGRAPH}</div>"#
        );

        let blocks = extract_content_blocks(&html);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_short_blocks_dropped() {
        let html = format!(
            r#"<div class="widget-richtext"><p>tiny</p></div>
               <div class="widget-richtext">{LONG_PARAGRAPH}</div>"#
        );

        let blocks = extract_content_blocks(&html);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_combine_content_blocks() {
        let blocks = vec!["<p>one</p>".to_string(), "<p>two</p>".to_string()];
        assert_eq!(
            combine_content_blocks(&blocks).unwrap(),
            "<p>one</p>\n\n<p>two</p>"
        );
        assert!(combine_content_blocks(&[]).is_none());
    }

    #[test]
    fn test_html_to_text_strips_markup() {
        let text = html_to_text("<p>one <strong>bold</strong></p><p>two</p>");
        assert_eq!(text, "one\nbold\ntwo");
    }

    #[test]
    fn test_blocks_in_document_order() {
        let first = "<p>First block with plenty of text to clear the length threshold.</p>";
        let second = "<p>Second block with plenty of text to clear the length threshold.</p>";
        let html = format!(
            r#"<div class="widget-richtext">{first}</div>
               <div class="widget-richtext">{second}</div>"#
        );

        let blocks = extract_content_blocks(&html);
        assert!(blocks[0].contains("First"));
        assert!(blocks[1].contains("Second"));
    }
}
