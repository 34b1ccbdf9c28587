//! Session and activity link extraction
//!
//! Unit pages link to their sessions as `…/session-{N}`, and session pages
//! link to their activities as `…/activity-{N}`. Pages repeat these links
//! in navigation and body content, so extraction deduplicates by number
//! (last occurrence wins) and returns entries sorted ascending.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use url::Url;

/// A link to a numbered child resource (session or activity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLink {
    /// The session or activity number parsed from the href
    pub number: u32,

    /// Absolute URL of the resource
    pub url: String,

    /// The anchor text
    pub title: String,
}

fn session_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/session-(\d+)$").expect("valid regex"))
}

fn activity_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/activity-(\d+)$").expect("valid regex"))
}

/// Extracts all session links from a unit page
pub fn extract_session_links(html: &str, base_url: &Url) -> Vec<NumberedLink> {
    extract_numbered_links(html, base_url, session_pattern())
}

/// Extracts all activity links from a session page
pub fn extract_activity_links(html: &str, base_url: &Url) -> Vec<NumberedLink> {
    extract_numbered_links(html, base_url, activity_pattern())
}

/// Scans anchors for hrefs matching the given numeric-suffix pattern
///
/// Relative hrefs are resolved against `base_url`. Duplicate numbers keep
/// the last occurrence; results are sorted ascending by number.
fn extract_numbered_links(html: &str, base_url: &Url, pattern: &Regex) -> Vec<NumberedLink> {
    let document = Html::parse_document(html);
    let mut by_number: BTreeMap<u32, NumberedLink> = BTreeMap::new();

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(captures) = pattern.captures(href) else {
            continue;
        };

        let Ok(number) = captures[1].parse::<u32>() else {
            continue;
        };

        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            match base_url.join(href) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => continue,
            }
        };

        let title = element.text().collect::<String>().trim().to_string();

        by_number.insert(number, NumberedLink { number, url, title });
    }

    by_number.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.org/course/intermediate/unit-1").unwrap()
    }

    #[test]
    fn test_extract_session_links() {
        let html = r#"<html><body>
            <a href="/course/intermediate/unit-1/session-1">Session 1</a>
            <a href="/course/intermediate/unit-1/session-2">Session 2</a>
        </body></html>"#;

        let links = extract_session_links(html, &base_url());
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].number, 1);
        assert_eq!(links[0].title, "Session 1");
        assert_eq!(
            links[0].url,
            "https://example.org/course/intermediate/unit-1/session-1"
        );
        assert_eq!(links[1].number, 2);
    }

    #[test]
    fn test_duplicate_numbers_collapse_to_one() {
        let html = r#"<html><body>
            <a href="/unit-1/session-3">Nav</a>
            <a href="/unit-1/session-3">Body link</a>
            <a href="/unit-1/session-1">Session 1</a>
        </body></html>"#;

        let links = extract_session_links(html, &base_url());
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].number, 1);
        assert_eq!(links[1].number, 3);
        // Last occurrence wins
        assert_eq!(links[1].title, "Body link");
    }

    #[test]
    fn test_sorted_ascending_regardless_of_document_order() {
        let html = r#"<html><body>
            <a href="/unit-1/session-4">Four</a>
            <a href="/unit-1/session-2">Two</a>
            <a href="/unit-1/session-1">One</a>
            <a href="/unit-1/session-3">Three</a>
        </body></html>"#;

        let links = extract_session_links(html, &base_url());
        let numbers: Vec<u32> = links.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_absolute_hrefs_kept_as_is() {
        let html = r#"<a href="https://other.example.org/unit-2/session-1">S1</a>"#;
        let links = extract_session_links(html, &base_url());
        assert_eq!(links[0].url, "https://other.example.org/unit-2/session-1");
    }

    #[test]
    fn test_activity_links() {
        let html = r#"<html><body>
            <a href="/unit-1/session-2/activity-1">Activity 1</a>
            <a href="/unit-1/session-2/activity-2">Activity 2</a>
            <a href="/unit-1/session-2">not an activity</a>
        </body></html>"#;

        let links = extract_activity_links(html, &base_url());
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].number, 1);
        assert_eq!(links[1].number, 2);
    }

    #[test]
    fn test_suffix_must_terminate_href() {
        // "/session-1/activity-2" must not register as session 1
        let html = r#"<a href="/unit-1/session-1/activity-2">A2</a>"#;
        assert!(extract_session_links(html, &base_url()).is_empty());
        assert_eq!(extract_activity_links(html, &base_url()).len(), 1);
    }

    #[test]
    fn test_no_links() {
        let html = "<html><body><p>No links here</p></body></html>";
        assert!(extract_session_links(html, &base_url()).is_empty());
    }
}
