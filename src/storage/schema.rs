//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the content store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Course levels, seeded from config and immutable afterwards
CREATE TABLE IF NOT EXISTS levels (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    total_units INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- Units within a level
CREATE TABLE IF NOT EXISTS units (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    level_id TEXT NOT NULL REFERENCES levels(id),
    unit_number INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    url TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(level_id, unit_number)
);

CREATE INDEX IF NOT EXISTS idx_units_url ON units(url);

-- Sessions within a unit
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    unit_id INTEGER NOT NULL REFERENCES units(id),
    session_number INTEGER NOT NULL,
    title TEXT NOT NULL,
    session_type TEXT NOT NULL,
    type_label TEXT,
    url TEXT NOT NULL,
    audio_url TEXT,
    transcript_html TEXT,
    transcript_text TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(unit_id, session_number)
);

CREATE INDEX IF NOT EXISTS idx_sessions_url ON sessions(url);
CREATE INDEX IF NOT EXISTS idx_sessions_unit ON sessions(unit_id);

-- Activities within a session
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES sessions(id),
    activity_number INTEGER NOT NULL,
    title TEXT,
    url TEXT NOT NULL,
    instruction TEXT,
    content_html TEXT,
    content_text TEXT,
    audio_url TEXT,
    transcript_html TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(session_id, activity_number)
);

CREATE INDEX IF NOT EXISTS idx_activities_url ON activities(url);
CREATE INDEX IF NOT EXISTS idx_activities_session ON activities(session_id);

-- Vocabulary items per session, replaced wholesale on re-crawl
CREATE TABLE IF NOT EXISTS session_vocabulary (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
    word TEXT,
    definition TEXT,
    rule TEXT,
    example TEXT,
    is_example INTEGER NOT NULL DEFAULT 0,
    sort_order INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_vocabulary_session ON session_vocabulary(session_id);

-- Bold keywords per activity, replaced wholesale on re-crawl
CREATE TABLE IF NOT EXISTS bold_words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    activity_id INTEGER NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    word TEXT NOT NULL,
    context_sentence TEXT,
    sort_order INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bold_words_activity ON bold_words(activity_id);

-- Download resources per unit, append-only
CREATE TABLE IF NOT EXISTS downloads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    unit_id INTEGER NOT NULL REFERENCES units(id),
    resource_title TEXT NOT NULL,
    session_number INTEGER,
    activity_number INTEGER,
    audio_url TEXT,
    audio_size TEXT,
    transcript_url TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_downloads_unit ON downloads(unit_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Gets the current schema version
///
/// This can be used for future migrations if the schema changes.
pub fn get_schema_version() -> u32 {
    1
}
