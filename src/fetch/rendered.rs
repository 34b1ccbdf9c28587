//! Headless-browser fetch strategy
//!
//! Some course mirrors hydrate their content client-side; this strategy
//! drives a headless Chromium instance and reads the rendered DOM.
//! Binary assets (audio files) still go over plain HTTP.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::fetch::http::HttpFetcher;
use crate::fetch::{FetchError, PageFetcher};

/// Env var naming an explicit browser binary
const BROWSER_ENV: &str = "COURSECOMB_BROWSER";

/// Selector that must appear before the DOM is read
const CONTENT_SELECTOR: &str = "main, article, body";

const CONTENT_POLL_INTERVAL: Duration = Duration::from_millis(200);
const CONTENT_POLL_ATTEMPTS: u32 = 25;

/// Finds the Chromium/Chrome binary path
pub fn find_browser() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(BROWSER_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    None
}

/// Fetches pages through a headless browser
pub struct RenderedFetcher {
    browser: Browser,
    /// Plain HTTP client for audio and other binary assets
    assets: HttpFetcher,
}

impl RenderedFetcher {
    /// Launches a headless browser instance
    ///
    /// The handler loop runs on a background task for the lifetime of the
    /// browser.
    pub async fn launch(user_agent: &str) -> Result<Self, FetchError> {
        let Some(browser_path) = find_browser() else {
            return Err(FetchError::Browser(format!(
                "no Chromium binary found; set {BROWSER_ENV} or install google-chrome"
            )));
        };

        debug!(path = %browser_path.display(), "launching headless browser");

        let config = BrowserConfig::builder()
            .chrome_executable(browser_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(FetchError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let assets =
            HttpFetcher::new(user_agent).map_err(|e| FetchError::Browser(e.to_string()))?;

        Ok(Self { browser, assets })
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let browser_err = |e: chromiumoxide::error::CdpError| FetchError::Browser(e.to_string());

        let page = self.browser.new_page(url).await.map_err(browser_err)?;
        page.wait_for_navigation().await.map_err(browser_err)?;

        // Hydration may lag navigation; poll for a content element
        let mut found = false;
        for _ in 0..CONTENT_POLL_ATTEMPTS {
            if page.find_element(CONTENT_SELECTOR).await.is_ok() {
                found = true;
                break;
            }
            tokio::time::sleep(CONTENT_POLL_INTERVAL).await;
        }
        if !found {
            warn!(url, "no content element appeared; reading DOM anyway");
        }

        let html = page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(browser_err)?
            .into_value::<String>()
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        if let Err(e) = page.close().await {
            warn!(url, error = %e, "failed to close browser page");
        }

        Ok(html)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.assets.fetch_bytes(url).await
    }
}
