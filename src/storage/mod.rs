//! Content persistence
//!
//! This module provides the storage abstraction and SQLite backend for
//! crawled course content.

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use schema::{get_schema_version, initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStore;
pub use traits::{ContentStore, StorageError, StorageResult};

use crate::resolve::SessionType;

/// A course level row, seeded from config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRecord {
    /// URL slug, e.g. "intermediate"
    pub id: String,
    pub title: String,
    pub total_units: u32,
}

/// Data for inserting or updating a unit
#[derive(Debug, Clone)]
pub struct NewUnit {
    pub level_id: String,
    pub unit_number: u32,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
}

/// Data for inserting or updating a session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub unit_id: i64,
    pub session_number: u32,
    pub title: String,
    pub session_type: SessionType,
    pub type_label: String,
    pub url: String,
    pub audio_url: Option<String>,
    pub transcript_html: Option<String>,
    pub transcript_text: Option<String>,
}

/// Data for inserting or updating an activity
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub session_id: i64,
    pub activity_number: u32,
    pub title: Option<String>,
    pub url: String,
    pub instruction: Option<String>,
    pub content_html: Option<String>,
    pub content_text: Option<String>,
    pub audio_url: Option<String>,
    pub transcript_html: Option<String>,
}

/// Data for one download resource record
#[derive(Debug, Clone)]
pub struct NewDownload {
    pub unit_id: i64,
    pub resource_title: String,
    pub session_number: Option<u32>,
    pub activity_number: Option<u32>,
    pub audio_url: Option<String>,
    pub audio_size: Option<String>,
    pub transcript_url: Option<String>,
}

/// Row counts per content table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub levels: u64,
    pub units: u64,
    pub sessions: u64,
    pub activities: u64,
    pub vocabulary: u64,
    pub bold_words: u64,
    pub downloads: u64,
}
