//! Coursecomb: a polite course-content crawler
//!
//! This crate implements a sequential crawler for a four-level course
//! hierarchy (level → unit → session → activity, plus a per-unit downloads
//! page). It extracts structured learning content from heterogeneous HTML
//! and persists it idempotently into a normalized SQLite store so repeated
//! runs are safe and resumable.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod resolve;
pub mod storage;

use thiserror::Error;

/// Main error type for Coursecomb operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Unknown level: {0}")]
    UnknownLevel(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Coursecomb operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, StepState};
pub use resolve::{SessionType, SessionTypeTable};
