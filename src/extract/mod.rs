//! HTML extraction for course pages
//!
//! Everything in this module is pure: functions take an HTML string (plus
//! a base URL where links need resolving) and return structured data,
//! which keeps the parsing heuristics testable without any network.

pub mod downloads;
pub mod keywords;
pub mod links;
pub mod page;
pub mod richtext;
pub mod vocabulary;

pub use downloads::{extract_audio_url, extract_downloads, scan_media_urls, DownloadBlock, MediaUrls};
pub use keywords::{extract_bold_words, BoldWord};
pub use links::{extract_activity_links, extract_session_links, NumberedLink};
pub use page::{
    extract_instruction, extract_overview_titles, extract_page_title, extract_unit_title,
};
pub use richtext::{
    combine_content_blocks, extract_content_blocks, extract_transcript, html_to_text, Transcript,
};
pub use vocabulary::{extract_vocabulary, VocabItem};
