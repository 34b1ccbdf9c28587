//! SQLite storage implementation
//!
//! This module provides the SQLite-based implementation of the
//! ContentStore trait.

use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

use crate::extract::{BoldWord, VocabItem};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ContentStore, StorageResult};
use crate::storage::{LevelRecord, NewActivity, NewDownload, NewSession, NewUnit, TableCounts};
use crate::CrawlError;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at the given path
    pub fn new(path: &Path) -> Result<Self, CrawlError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, CrawlError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl ContentStore for SqliteStore {
    fn seed_levels(&mut self, levels: &[LevelRecord]) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        for level in levels {
            tx.execute(
                "INSERT OR IGNORE INTO levels (id, title, total_units, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![level.id, level.title, level.total_units, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_unit(&mut self, unit: &NewUnit) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO units (level_id, unit_number, title, description, url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(level_id, unit_number) DO UPDATE SET
                 title = excluded.title,
                 description = excluded.description,
                 url = excluded.url,
                 updated_at = excluded.updated_at",
            params![
                unit.level_id,
                unit.unit_number,
                unit.title,
                unit.description,
                unit.url,
                now
            ],
        )?;

        let id = tx.query_row(
            "SELECT id FROM units WHERE level_id = ?1 AND unit_number = ?2",
            params![unit.level_id, unit.unit_number],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(id)
    }

    fn upsert_session(&mut self, session: &NewSession) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO sessions (unit_id, session_number, title, session_type, type_label,
                                   url, audio_url, transcript_html, transcript_text,
                                   created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
             ON CONFLICT(unit_id, session_number) DO UPDATE SET
                 title = excluded.title,
                 session_type = excluded.session_type,
                 type_label = excluded.type_label,
                 url = excluded.url,
                 audio_url = excluded.audio_url,
                 transcript_html = excluded.transcript_html,
                 transcript_text = excluded.transcript_text,
                 updated_at = excluded.updated_at",
            params![
                session.unit_id,
                session.session_number,
                session.title,
                session.session_type.to_db_string(),
                session.type_label,
                session.url,
                session.audio_url,
                session.transcript_html,
                session.transcript_text,
                now
            ],
        )?;

        let id = tx.query_row(
            "SELECT id FROM sessions WHERE unit_id = ?1 AND session_number = ?2",
            params![session.unit_id, session.session_number],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(id)
    }

    fn upsert_activity(&mut self, activity: &NewActivity) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO activities (session_id, activity_number, title, url, instruction,
                                     content_html, content_text, audio_url, transcript_html,
                                     created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
             ON CONFLICT(session_id, activity_number) DO UPDATE SET
                 title = excluded.title,
                 url = excluded.url,
                 instruction = excluded.instruction,
                 content_html = excluded.content_html,
                 content_text = excluded.content_text,
                 audio_url = excluded.audio_url,
                 transcript_html = excluded.transcript_html,
                 updated_at = excluded.updated_at",
            params![
                activity.session_id,
                activity.activity_number,
                activity.title,
                activity.url,
                activity.instruction,
                activity.content_html,
                activity.content_text,
                activity.audio_url,
                activity.transcript_html,
                now
            ],
        )?;

        let id = tx.query_row(
            "SELECT id FROM activities WHERE session_id = ?1 AND activity_number = ?2",
            params![activity.session_id, activity.activity_number],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(id)
    }

    fn replace_session_vocabulary(
        &mut self,
        session_id: i64,
        items: &[VocabItem],
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM session_vocabulary WHERE session_id = ?1",
            params![session_id],
        )?;

        for (sort_order, item) in items.iter().enumerate() {
            match item {
                VocabItem::Definition { word, definition } => {
                    tx.execute(
                        "INSERT INTO session_vocabulary
                             (session_id, word, definition, is_example, sort_order)
                         VALUES (?1, ?2, ?3, 0, ?4)",
                        params![session_id, word, definition, sort_order as i64],
                    )?;
                }
                VocabItem::Rule { rule, example } => {
                    tx.execute(
                        "INSERT INTO session_vocabulary
                             (session_id, rule, example, is_example, sort_order)
                         VALUES (?1, ?2, ?3, 1, ?4)",
                        params![session_id, rule, example, sort_order as i64],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn replace_bold_words(&mut self, activity_id: i64, words: &[BoldWord]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM bold_words WHERE activity_id = ?1",
            params![activity_id],
        )?;

        for (sort_order, word) in words.iter().enumerate() {
            tx.execute(
                "INSERT INTO bold_words (activity_id, word, context_sentence, sort_order)
                 VALUES (?1, ?2, ?3, ?4)",
                params![activity_id, word.word, word.context, sort_order as i64],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn insert_download(&mut self, download: &NewDownload) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO downloads (unit_id, resource_title, session_number, activity_number,
                                    audio_url, audio_size, transcript_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                download.unit_id,
                download.resource_title,
                download.session_number,
                download.activity_number,
                download.audio_url,
                download.audio_size,
                download.transcript_url,
                now
            ],
        )?;
        Ok(())
    }

    fn url_exists(&self, url: &str) -> StorageResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM units WHERE url = ?1)
                 OR EXISTS(SELECT 1 FROM sessions WHERE url = ?1)
                 OR EXISTS(SELECT 1 FROM activities WHERE url = ?1)",
            params![url],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn table_counts(&self) -> StorageResult<TableCounts> {
        let count = |table: &str| -> Result<u64, rusqlite::Error> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n as u64)
        };

        Ok(TableCounts {
            levels: count("levels")?,
            units: count("units")?,
            sessions: count("sessions")?,
            activities: count("activities")?,
            vocabulary: count("session_vocabulary")?,
            bold_words: count("bold_words")?,
            downloads: count("downloads")?,
        })
    }
}
