//! Page fetching
//!
//! This module handles all network access for the crawler, including:
//! - The `PageFetcher` strategy seam (plain HTTP vs. headless browser)
//! - Retry with exponential backoff
//! - Politeness delays between requests
//! - Error classification

pub mod http;
pub mod politeness;
pub mod rendered;

pub use http::HttpFetcher;
pub use politeness::Politeness;
pub use rendered::RenderedFetcher;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{CrawlerConfig, FetchStrategy, SiteConfig};

/// Errors a fetch can end in
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Request or response timed out
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// Connection-level failure (DNS, refused, TLS)
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// Headless browser failed to launch or render
    #[error("browser error: {0}")]
    Browser(String),

    /// All retry attempts failed
    #[error("giving up on {url} after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },
}

/// A single-attempt fetch strategy
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one URL once, returning the page HTML
    async fn fetch_once(&self, url: &str) -> Result<String, FetchError>;

    /// Fetches one URL once, returning the raw bytes
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Retry schedule for transient fetch failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Backoff before retrying after the given zero-based attempt
    fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl From<&CrawlerConfig> for RetryPolicy {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }
}

/// A fetch strategy wrapped with retry and politeness
pub struct Fetcher {
    strategy: Box<dyn PageFetcher>,
    retry: RetryPolicy,
    politeness: Politeness,
}

impl Fetcher {
    pub fn new(strategy: Box<dyn PageFetcher>, retry: RetryPolicy, politeness: Politeness) -> Self {
        Self {
            strategy,
            retry,
            politeness,
        }
    }

    /// Builds the fetcher selected by config
    pub async fn from_config(
        crawler: &CrawlerConfig,
        site: &SiteConfig,
    ) -> Result<Self, crate::CrawlError> {
        let strategy: Box<dyn PageFetcher> = match crawler.fetch_strategy {
            FetchStrategy::Http => Box::new(HttpFetcher::new(&site.user_agent)?),
            FetchStrategy::Rendered => Box::new(RenderedFetcher::launch(&site.user_agent).await?),
        };

        Ok(Self::new(
            strategy,
            RetryPolicy::from(crawler),
            Politeness::new(crawler.min_delay_secs, crawler.max_delay_secs),
        ))
    }

    /// Fetches a page, retrying transient failures with exponential backoff
    ///
    /// The politeness pause runs after a successful fetch so the next
    /// request never follows immediately.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.with_retry(url, |u| self.strategy.fetch_once(u)).await
    }

    /// Fetches a binary asset with the same retry schedule
    pub async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.with_retry(url, |u| self.strategy.fetch_bytes(u)).await
    }

    async fn with_retry<'a, T, F, Fut>(&'a self, url: &'a str, attempt_fn: F) -> Result<T, FetchError>
    where
        F: Fn(&'a str) -> Fut,
        Fut: std::future::Future<Output = Result<T, FetchError>>,
    {
        for attempt in 0..self.retry.max_attempts {
            match attempt_fn(url).await {
                Ok(result) => {
                    debug!(url, attempt, "fetch succeeded");
                    self.politeness.pause().await;
                    return Ok(result);
                }
                Err(error) => {
                    warn!(url, attempt, %error, "fetch attempt failed");
                    if attempt + 1 < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.backoff(attempt)).await;
                    }
                }
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.retry.max_attempts,
        })
    }
}
