//! Audio and download-resource extraction
//!
//! Audio URLs come from `<audio>`/`<source>` elements where the markup
//! cooperates, with a raw regex scan of the HTML as fallback. The per-unit
//! downloads page groups resources into blocks keyed by "Session N" /
//! "Activity N" text.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;

/// One resource block from a unit's downloads page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadBlock {
    pub resource_title: String,
    pub session_number: Option<u32>,
    pub activity_number: Option<u32>,
    pub audio_url: Option<String>,
    /// Human-readable size as printed on the page, e.g. "4.2 MB"
    pub audio_size: Option<String>,
    pub transcript_url: Option<String>,
}

/// All media URLs found by scanning a page's raw HTML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaUrls {
    pub mp3: Vec<String>,
    pub pdf: Vec<String>,
}

fn mp3_url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^"'\s]+\.mp3"#).expect("valid regex"))
}

fn pdf_url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^"'\s]+\.pdf"#).expect("valid regex"))
}

fn session_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Session\s+(\d+)").expect("valid regex"))
}

fn activity_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Activity\s+(\d+)").expect("valid regex"))
}

fn audio_size_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)([\d.]+\s*[KMG]B)").expect("valid regex"))
}

/// Extracts the page's audio URL
///
/// Tries `<audio><source src>` first, then `.mp3` anchors, then a regex
/// scan of the raw HTML.
pub fn extract_audio_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if let Ok(selector) = Selector::parse("audio source[src]") {
        if let Some(source) = document.select(&selector).next() {
            if let Some(src) = source.value().attr("src") {
                return Some(src.to_string());
            }
        }
    }

    if let Ok(selector) = Selector::parse(r#"a[href*=".mp3"]"#) {
        if let Some(anchor) = document.select(&selector).next() {
            if let Some(href) = anchor.value().attr("href") {
                return Some(href.to_string());
            }
        }
    }

    mp3_url_pattern()
        .find(html)
        .map(|m| m.as_str().to_string())
}

/// Scans raw HTML for every `.mp3` and `.pdf` URL
///
/// Duplicates are dropped while preserving first-seen order, so the audio
/// pool hands out each file once.
pub fn scan_media_urls(html: &str) -> MediaUrls {
    MediaUrls {
        mp3: scan_unique(mp3_url_pattern(), html),
        pdf: scan_unique(pdf_url_pattern(), html),
    }
}

fn scan_unique(pattern: &Regex, html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    pattern
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Extracts download-resource blocks from a unit's downloads page
///
/// Blocks without a recognizable title are dropped.
pub fn extract_downloads(html: &str) -> Vec<DownloadBlock> {
    let document = Html::parse_document(html);
    let Ok(section_selector) = Selector::parse(
        r#"div[class*="download"], div[class*="resource"], li[class*="download"], li[class*="resource"]"#,
    ) else {
        return Vec::new();
    };

    let mut downloads = Vec::new();

    for section in document.select(&section_selector) {
        let Some(resource_title) = section_title(&section) else {
            continue;
        };

        let text = section.text().collect::<String>();
        let session_number = capture_number(session_number_pattern(), &text);
        let activity_number = capture_number(activity_number_pattern(), &text);

        let (audio_url, audio_size) = audio_link(&section);
        let transcript_url = transcript_link(&section);

        downloads.push(DownloadBlock {
            resource_title,
            session_number,
            activity_number,
            audio_url,
            audio_size,
            transcript_url,
        });
    }

    downloads
}

fn section_title(section: &ElementRef) -> Option<String> {
    let selector = Selector::parse("h3, h4, strong").ok()?;
    section
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn capture_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// The block's `.mp3` anchor plus a file size parsed from its label
fn audio_link(section: &ElementRef) -> (Option<String>, Option<String>) {
    let Ok(selector) = Selector::parse(r#"a[href*=".mp3"]"#) else {
        return (None, None);
    };

    match section.select(&selector).next() {
        Some(anchor) => {
            let url = anchor.value().attr("href").map(str::to_string);
            let label = anchor.text().collect::<String>();
            let size = audio_size_pattern()
                .captures(&label)
                .map(|caps| caps[1].to_string());
            (url, size)
        }
        None => (None, None),
    }
}

/// An anchor whose text mentions "transcript"
fn transcript_link(section: &ElementRef) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    section
        .select(&selector)
        .find(|anchor| {
            anchor
                .text()
                .collect::<String>()
                .to_lowercase()
                .contains("transcript")
        })
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
}
