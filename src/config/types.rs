use serde::Deserialize;

/// Main configuration structure for Coursecomb
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub levels: Vec<LevelEntry>,
    #[serde(default, rename = "session-type")]
    pub session_types: Vec<SessionTypeEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Minimum politeness delay between successful fetches (seconds)
    #[serde(rename = "min-delay-secs", default = "default_min_delay")]
    pub min_delay_secs: f64,

    /// Maximum politeness delay between successful fetches (seconds)
    #[serde(rename = "max-delay-secs", default = "default_max_delay")]
    pub max_delay_secs: f64,

    /// Maximum fetch attempts per URL before giving up on the step
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base for the exponential backoff between attempts (milliseconds).
    /// The wait after attempt `n` is `backoff-base-ms * 2^n`.
    #[serde(rename = "backoff-base-ms", default = "default_backoff_base")]
    pub backoff_base_ms: u64,

    /// Fetch strategy: "http" (plain HTTP) or "rendered" (headless browser)
    #[serde(rename = "fetch-strategy", default)]
    pub fetch_strategy: FetchStrategy,
}

/// Which fetch implementation the orchestrator should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Plain HTTP fetch. The course pages carry their content in the
    /// initial payload (hidden via CSS), so this is the default.
    #[default]
    Http,
    /// Headless-browser fetch that waits for a content-bearing selector.
    Rendered,
}

/// Source site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base course URL, e.g. "https://example.org/learning/course"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Root directory for downloaded audio files
    #[serde(rename = "audio-root")]
    pub audio_root: String,
}

/// A course level with its unit count
#[derive(Debug, Clone, Deserialize)]
pub struct LevelEntry {
    /// URL slug, e.g. "intermediate"
    pub slug: String,

    /// Display title
    pub title: String,

    /// Number of units in this level
    #[serde(rename = "total-units")]
    pub total_units: u32,
}

/// Per-unit session type override.
///
/// The site's own session ordering for reading vs. listening varies
/// unit-by-unit; these entries pin the type where content inference is
/// known to be wrong.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTypeEntry {
    pub unit: u32,
    pub session: u32,
    /// One of: vocabulary, grammar, reading, listening, drama, quiz
    #[serde(rename = "type")]
    pub session_type: String,
    /// Display label, e.g. "6 Minute Vocabulary"
    pub label: Option<String>,
}

fn default_min_delay() -> f64 {
    2.0
}

fn default_max_delay() -> f64 {
    5.0
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base() -> u64 {
    1000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
        .to_string()
}

impl Config {
    /// Looks up a level entry by its slug
    pub fn level(&self, slug: &str) -> Option<&LevelEntry> {
        self.levels.iter().find(|l| l.slug == slug)
    }
}
