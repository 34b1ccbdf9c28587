//! Crawl orchestration
//!
//! The coordinator walks the course hierarchy strictly sequentially:
//! level → unit → downloads page → sessions → activities. Every step is
//! skip-checked against storage first, so an interrupted run resumes
//! where it stopped. Fetch failures fail the step, never the run; only
//! storage errors abort.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;
use crate::crawler::report::CrawlReport;
use crate::crawler::step::StepState;
use crate::crawler::urls::UrlBuilder;
use crate::extract::{
    self, DownloadBlock, NumberedLink, Transcript, VocabItem,
};
use crate::fetch::Fetcher;
use crate::resolve::{AudioPool, SessionTypeTable};
use crate::storage::{ContentStore, LevelRecord, NewActivity, NewDownload, NewSession, NewUnit};
use crate::{CrawlError, Result};

/// Sessions synthesized when a unit page exposes no session links
const DEFAULT_SESSION_COUNT: u32 = 4;

/// Content collected from an activity for the session roll-up
#[derive(Debug, Default)]
struct ActivityYield {
    transcript: Option<Transcript>,
    vocabulary: Vec<VocabItem>,
    audio_url: Option<String>,
}

/// Drives a crawl over the course hierarchy
pub struct Coordinator<S: ContentStore> {
    config: Config,
    store: S,
    fetcher: Fetcher,
    type_table: SessionTypeTable,
    urls: UrlBuilder,
    report: CrawlReport,
    download_audio: bool,
}

impl<S: ContentStore> Coordinator<S> {
    /// Builds a coordinator and seeds the configured levels
    pub fn new(
        config: Config,
        mut store: S,
        fetcher: Fetcher,
        download_audio: bool,
    ) -> Result<Self> {
        let urls = UrlBuilder::new(&config.site.base_url)?;
        let type_table = SessionTypeTable::from_config(&config.session_types);

        let levels: Vec<LevelRecord> = config
            .levels
            .iter()
            .map(|l| LevelRecord {
                id: l.slug.clone(),
                title: l.title.clone(),
                total_units: l.total_units,
            })
            .collect();
        store.seed_levels(&levels)?;

        Ok(Self {
            config,
            store,
            fetcher,
            type_table,
            urls,
            report: CrawlReport::default(),
            download_audio,
        })
    }

    /// The run's accumulated counters
    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    /// Consumes the coordinator, returning the final report
    pub fn into_report(self) -> CrawlReport {
        self.report
    }

    /// Crawls a range of units within a level
    ///
    /// Bounds default to the level's full unit range. A failed unit does
    /// not abort the level; the crawl moves on to the next unit.
    pub async fn crawl_level(
        &mut self,
        slug: &str,
        from: Option<u32>,
        to: Option<u32>,
    ) -> Result<()> {
        let level = self
            .config
            .level(slug)
            .ok_or_else(|| CrawlError::UnknownLevel(slug.to_string()))?;

        let first = from.unwrap_or(1);
        let last = to.unwrap_or(level.total_units);
        info!(level = slug, first, last, "crawling level");

        for unit_number in first..=last {
            let state = self.crawl_unit(slug, unit_number).await?;
            if state.is_failure() {
                warn!(level = slug, unit_number, "unit failed, continuing with next");
            }
        }

        Ok(())
    }

    /// Crawls one unit and everything beneath it
    pub async fn crawl_unit(&mut self, slug: &str, unit_number: u32) -> Result<StepState> {
        if self.config.level(slug).is_none() {
            return Err(CrawlError::UnknownLevel(slug.to_string()));
        }

        let unit_url = self.urls.unit(slug, unit_number);

        if self.store.url_exists(&unit_url)? {
            info!(url = %unit_url, "unit already crawled, skipping");
            self.report.units.record(StepState::AlreadyPresent);
            return Ok(StepState::AlreadyPresent);
        }

        let html = match self.fetcher.fetch_page(&unit_url).await {
            Ok(html) => html,
            Err(error) => {
                warn!(url = %unit_url, %error, "unit fetch failed");
                self.report.units.record(StepState::Failed);
                return Ok(StepState::Failed);
            }
        };

        let title = extract::extract_unit_title(&html, unit_number);
        let description = extract::extract_content_blocks(&html)
            .first()
            .map(|block| extract::html_to_text(block));

        let unit_id = self.store.upsert_unit(&NewUnit {
            level_id: slug.to_string(),
            unit_number,
            title,
            description,
            url: unit_url,
        })?;

        // The downloads page names the unit's audio files; fetch it first
        // so sessions can claim matching files from the pool.
        let (mut pool, download_blocks) = self.fetch_downloads_page(slug, unit_number).await;

        let overview_titles = extract::extract_overview_titles(&html);
        let session_links = self.session_links(slug, unit_number, &html);

        for link in &session_links {
            let overview_title = overview_titles
                .get((link.number as usize).saturating_sub(1))
                .map(String::as_str);

            let state = self
                .crawl_session(unit_number, unit_id, link, overview_title, &mut pool)
                .await?;
            self.report.sessions.record(state);
        }

        for block in &download_blocks {
            self.store.insert_download(&NewDownload {
                unit_id,
                resource_title: block.resource_title.clone(),
                session_number: block.session_number,
                activity_number: block.activity_number,
                audio_url: block.audio_url.clone(),
                audio_size: block.audio_size.clone(),
                transcript_url: block.transcript_url.clone(),
            })?;
            self.report.downloads += 1;
        }

        if self.download_audio {
            self.download_unit_audio(slug, unit_number, &download_blocks)
                .await?;
        }

        info!(level = slug, unit_number, "unit crawled");
        self.report.units.record(StepState::Persisted);
        Ok(StepState::Persisted)
    }

    /// Fetches the downloads page, returning the audio pool and resource
    /// blocks
    ///
    /// A missing or failing downloads page is not an error; the unit just
    /// has no pooled audio.
    async fn fetch_downloads_page(
        &mut self,
        slug: &str,
        unit_number: u32,
    ) -> (AudioPool, Vec<DownloadBlock>) {
        let url = self.urls.downloads(slug, unit_number);

        match self.fetcher.fetch_page(&url).await {
            Ok(html) => {
                let media = extract::scan_media_urls(&html);
                (AudioPool::new(&media.mp3), extract::extract_downloads(&html))
            }
            Err(error) => {
                warn!(url = %url, %error, "downloads page unavailable");
                (AudioPool::new(&[]), Vec::new())
            }
        }
    }

    /// Session links from the unit page, or the standard four built from
    /// URL templates when the page exposes none
    fn session_links(&self, slug: &str, unit_number: u32, html: &str) -> Vec<NumberedLink> {
        let links = extract::extract_session_links(html, self.urls.base());
        if !links.is_empty() {
            return links;
        }

        (1..=DEFAULT_SESSION_COUNT)
            .map(|number| NumberedLink {
                number,
                url: self.urls.session(slug, unit_number, number),
                title: String::new(),
            })
            .collect()
    }

    async fn crawl_session(
        &mut self,
        unit_number: u32,
        unit_id: i64,
        link: &NumberedLink,
        overview_title: Option<&str>,
        pool: &mut AudioPool,
    ) -> Result<StepState> {
        if self.store.url_exists(&link.url)? {
            info!(url = %link.url, "session already crawled, skipping");
            return Ok(StepState::AlreadyPresent);
        }

        let html = match self.fetcher.fetch_page(&link.url).await {
            Ok(html) => html,
            Err(error) => {
                warn!(url = %link.url, %error, "session fetch failed");
                return Ok(StepState::Failed);
            }
        };

        let title = session_title(&html, link, overview_title);
        let resolved = self
            .type_table
            .resolve(unit_number, link.number, &title, &html);

        // First upsert claims the natural key; audio and transcript are
        // only known after the activities below.
        let session_id = self.store.upsert_session(&NewSession {
            unit_id,
            session_number: link.number,
            title: title.clone(),
            session_type: resolved.kind,
            type_label: resolved.label.clone(),
            url: link.url.clone(),
            audio_url: None,
            transcript_html: None,
            transcript_text: None,
        })?;

        let mut transcript = extract::extract_transcript(&html);
        let mut vocabulary = extract::extract_vocabulary(&html);
        let mut page_audio = extract::extract_audio_url(&html);

        for activity_link in extract::extract_activity_links(&html, self.urls.base()) {
            let (state, yielded) = self.crawl_activity(session_id, &activity_link).await?;
            self.report.activities.record(state);

            if transcript.is_none() {
                transcript = yielded.transcript;
            }
            if !yielded.vocabulary.is_empty() {
                vocabulary = yielded.vocabulary;
            }
            if page_audio.is_none() {
                page_audio = yielded.audio_url;
            }
        }

        let audio_url = pool.claim(resolved.kind, page_audio.as_deref());

        self.store.upsert_session(&NewSession {
            unit_id,
            session_number: link.number,
            title,
            session_type: resolved.kind,
            type_label: resolved.label,
            url: link.url.clone(),
            audio_url,
            transcript_html: transcript.as_ref().map(|t| t.html.clone()),
            transcript_text: transcript.as_ref().map(|t| t.text.clone()),
        })?;

        if !vocabulary.is_empty() {
            self.report.vocabulary_items += vocabulary.len() as u64;
            self.store
                .replace_session_vocabulary(session_id, &vocabulary)?;
        }

        Ok(StepState::Persisted)
    }

    async fn crawl_activity(
        &mut self,
        session_id: i64,
        link: &NumberedLink,
    ) -> Result<(StepState, ActivityYield)> {
        if self.store.url_exists(&link.url)? {
            info!(url = %link.url, "activity already crawled, skipping");
            return Ok((StepState::AlreadyPresent, ActivityYield::default()));
        }

        let html = match self.fetcher.fetch_page(&link.url).await {
            Ok(html) => html,
            Err(error) => {
                warn!(url = %link.url, %error, "activity fetch failed");
                return Ok((StepState::Failed, ActivityYield::default()));
            }
        };

        let blocks = extract::extract_content_blocks(&html);
        let content_html = extract::combine_content_blocks(&blocks);
        let content_text = content_html.as_deref().map(extract::html_to_text);
        let transcript = extract::extract_transcript(&html);
        let audio_url = extract::extract_audio_url(&html);
        let vocabulary = extract::extract_vocabulary(&html);

        let activity_id = self.store.upsert_activity(&NewActivity {
            session_id,
            activity_number: link.number,
            title: extract::extract_page_title(&html),
            url: link.url.clone(),
            instruction: extract::extract_instruction(&html),
            content_html: content_html.clone(),
            content_text,
            audio_url: audio_url.clone(),
            transcript_html: transcript.as_ref().map(|t| t.html.clone()),
        })?;

        // Keywords come from lesson content only; page chrome bolds too
        let bold_words = match &content_html {
            Some(content) => extract::extract_bold_words(content),
            None => Vec::new(),
        };
        if !bold_words.is_empty() {
            self.report.bold_words += bold_words.len() as u64;
            self.store.replace_bold_words(activity_id, &bold_words)?;
        }

        Ok((
            StepState::Persisted,
            ActivityYield {
                transcript,
                vocabulary,
                audio_url,
            },
        ))
    }

    /// Downloads the unit's audio files into the audio cache
    ///
    /// Files already on disk are skipped; a failed download skips the
    /// file, never the unit.
    async fn download_unit_audio(
        &mut self,
        slug: &str,
        unit_number: u32,
        blocks: &[DownloadBlock],
    ) -> Result<()> {
        let dir = PathBuf::from(&self.config.output.audio_root)
            .join(slug)
            .join(format!("unit-{unit_number}"));

        for block in blocks {
            let Some(audio_url) = &block.audio_url else {
                continue;
            };

            let session = block.session_number.unwrap_or(0);
            let activity = block.activity_number.unwrap_or(0);
            let path = dir.join(format!("session-{session}_activity-{activity}.mp3"));

            if path.exists() {
                self.report.audio_skipped += 1;
                continue;
            }

            match self.fetcher.fetch_asset(audio_url).await {
                Ok(bytes) => {
                    std::fs::create_dir_all(&dir)?;
                    std::fs::write(&path, bytes)?;
                    info!(url = %audio_url, path = %path.display(), "audio downloaded");
                    self.report.audio_files += 1;
                }
                Err(error) => {
                    warn!(url = %audio_url, %error, "audio download failed");
                }
            }
        }

        Ok(())
    }
}

/// Picks the session title: page heading, then link text, then the unit
/// overview heading, then a numbered placeholder
fn session_title(html: &str, link: &NumberedLink, overview_title: Option<&str>) -> String {
    if let Some(title) = extract::extract_page_title(html) {
        return title;
    }
    if !link.title.trim().is_empty() {
        return link.title.trim().to_string();
    }
    if let Some(title) = overview_title {
        return title.to_string();
    }
    format!("Session {}", link.number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(number: u32, title: &str) -> NumberedLink {
        NumberedLink {
            number,
            url: format!("https://example.org/unit-1/session-{number}"),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_session_title_prefers_page_heading() {
        let title = session_title("<h1>News Review</h1>", &link(1, "ignored"), Some("also"));
        assert_eq!(title, "News Review");
    }

    #[test]
    fn test_session_title_falls_back_to_link_text() {
        let title = session_title("<p>no heading</p>", &link(2, "Session 2"), None);
        assert_eq!(title, "Session 2");
    }

    #[test]
    fn test_session_title_uses_overview_then_placeholder() {
        let title = session_title("<p></p>", &link(3, "  "), Some("Drama"));
        assert_eq!(title, "Drama");

        let title = session_title("<p></p>", &link(3, ""), None);
        assert_eq!(title, "Session 3");
    }
}
