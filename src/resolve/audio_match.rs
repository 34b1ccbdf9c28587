//! Matching unit-level audio files to sessions
//!
//! A unit's downloads page lists audio files whose names encode which
//! session they belong to ("vocab", "gram"); the rest is usually the
//! listening session's episode. The pool hands each URL out at most once
//! so two sessions never share a file.

use std::collections::HashSet;

use crate::resolve::session_type::SessionType;

/// A unit's audio files, partitioned by filename and claimed one by one
#[derive(Debug, Clone, Default)]
pub struct AudioPool {
    vocab: Vec<String>,
    gram: Vec<String>,
    other: Vec<String>,
    claimed: HashSet<String>,
}

impl AudioPool {
    /// Partitions the unit's `.mp3` URLs into buckets by filename
    pub fn new(mp3_urls: &[String]) -> Self {
        let mut pool = Self::default();

        for url in mp3_urls {
            let filename = url
                .rsplit('/')
                .next()
                .unwrap_or(url.as_str())
                .to_lowercase();

            if filename.contains("vocab") {
                pool.vocab.push(url.clone());
            } else if filename.contains("gram") {
                pool.gram.push(url.clone());
            } else {
                pool.other.push(url.clone());
            }
        }

        pool
    }

    /// Claims an audio URL for a session
    ///
    /// Vocabulary and grammar sessions draw from their named buckets.
    /// Listening draws from the unnamed bucket, falling back to the
    /// session page's own audio if the pool has nothing left. Every other
    /// type gets `None`.
    pub fn claim(
        &mut self,
        session_type: SessionType,
        page_audio: Option<&str>,
    ) -> Option<String> {
        match session_type {
            SessionType::Vocabulary => self.claim_from(BucketName::Vocab),
            SessionType::Grammar => self.claim_from(BucketName::Gram),
            SessionType::Listening => self
                .claim_from(BucketName::Other)
                .or_else(|| self.claim_url(page_audio?)),
            _ => None,
        }
    }

    /// Number of URLs not yet handed out
    pub fn unclaimed(&self) -> usize {
        self.vocab
            .iter()
            .chain(&self.gram)
            .chain(&self.other)
            .filter(|url| !self.claimed.contains(*url))
            .count()
    }

    fn claim_from(&mut self, bucket: BucketName) -> Option<String> {
        let urls = match bucket {
            BucketName::Vocab => &self.vocab,
            BucketName::Gram => &self.gram,
            BucketName::Other => &self.other,
        };

        let url = urls.iter().find(|url| !self.claimed.contains(*url))?.clone();
        self.claimed.insert(url.clone());
        Some(url)
    }

    fn claim_url(&mut self, url: &str) -> Option<String> {
        if self.claimed.contains(url) {
            return None;
        }
        self.claimed.insert(url.to_string());
        Some(url.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
enum BucketName {
    Vocab,
    Gram,
    Other,
}
