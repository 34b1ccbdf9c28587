//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use thiserror::Error;

use crate::extract::{BoldWord, VocabItem};
use crate::storage::{LevelRecord, NewActivity, NewDownload, NewSession, NewUnit, TableCounts};

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for content storage backends
///
/// All writes are idempotent: parents are upserted by their natural keys
/// and child collections are replaced wholesale, so re-crawling a page
/// never duplicates rows.
pub trait ContentStore {
    /// Inserts the configured levels, leaving existing rows untouched
    fn seed_levels(&mut self, levels: &[LevelRecord]) -> StorageResult<()>;

    /// Upserts a unit by `(level_id, unit_number)`
    ///
    /// # Returns
    ///
    /// The unit's row id, whether inserted or updated
    fn upsert_unit(&mut self, unit: &NewUnit) -> StorageResult<i64>;

    /// Upserts a session by `(unit_id, session_number)`
    fn upsert_session(&mut self, session: &NewSession) -> StorageResult<i64>;

    /// Upserts an activity by `(session_id, activity_number)`
    fn upsert_activity(&mut self, activity: &NewActivity) -> StorageResult<i64>;

    /// Replaces a session's vocabulary items, preserving their order
    fn replace_session_vocabulary(
        &mut self,
        session_id: i64,
        items: &[VocabItem],
    ) -> StorageResult<()>;

    /// Replaces an activity's bold keywords, preserving their order
    fn replace_bold_words(&mut self, activity_id: i64, words: &[BoldWord]) -> StorageResult<()>;

    /// Appends a download resource record
    fn insert_download(&mut self, download: &NewDownload) -> StorageResult<()>;

    /// Checks whether a URL was already crawled into any content table
    fn url_exists(&self, url: &str) -> StorageResult<bool>;

    /// Row counts per table, for the stats command
    fn table_counts(&self) -> StorageResult<TableCounts>;
}
