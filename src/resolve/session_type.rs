/// Session type classification
///
/// Sessions within a unit follow a fixed curriculum shape, so the session
/// number alone usually determines the type. Config can override single
/// slots, and a keyword scan over the page catches the rest.
use std::collections::HashMap;
use std::fmt;

use crate::config::SessionTypeEntry;

/// The kind of lesson a session delivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionType {
    Vocabulary,
    Grammar,
    Reading,
    Listening,
    Drama,
    Quiz,

    /// No default, override, or keyword matched
    Unknown,
}

impl SessionType {
    /// Converts the session type to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Vocabulary => "vocabulary",
            Self::Grammar => "grammar",
            Self::Reading => "reading",
            Self::Listening => "listening",
            Self::Drama => "drama",
            Self::Quiz => "quiz",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a session type from a database string representation
    ///
    /// Returns None if the string doesn't match any known type.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "vocabulary" => Some(Self::Vocabulary),
            "grammar" => Some(Self::Grammar),
            "reading" => Some(Self::Reading),
            "listening" => Some(Self::Listening),
            "drama" => Some(Self::Drama),
            "quiz" => Some(Self::Quiz),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Returns all session types
    pub fn all_types() -> Vec<Self> {
        vec![
            Self::Vocabulary,
            Self::Grammar,
            Self::Reading,
            Self::Listening,
            Self::Drama,
            Self::Quiz,
            Self::Unknown,
        ]
    }

    /// The human-readable label used when config supplies none
    fn default_label(&self) -> &'static str {
        match self {
            Self::Vocabulary => "6 Minute Vocabulary",
            Self::Grammar => "6 Minute Grammar",
            Self::Reading => "Reading",
            Self::Listening => "Listening",
            Self::Drama => "Drama",
            Self::Quiz => "Quiz",
            Self::Unknown => "Session",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Keyword lists scanned in order when no table entry applies
///
/// Order matters: "6 Minute Vocabulary" pages also mention listening, so
/// the more specific types come first.
const KEYWORD_TABLE: &[(SessionType, &[&str])] = &[
    (SessionType::Vocabulary, &["vocabulary", "vocab"]),
    (SessionType::Grammar, &["grammar"]),
    (SessionType::Drama, &["drama"]),
    (SessionType::Quiz, &["quiz", "check your learning"]),
    (SessionType::Reading, &["reading", "read the text"]),
    (SessionType::Listening, &["listening", "listen to"]),
];

/// A resolved session type with its display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub kind: SessionType,
    pub label: String,
}

/// Maps session slots to types
///
/// Built once from config at startup and passed to the crawler explicitly.
#[derive(Debug, Clone)]
pub struct SessionTypeTable {
    defaults: HashMap<u32, SessionType>,
    overrides: HashMap<(u32, u32), ResolvedType>,
}

impl SessionTypeTable {
    /// Builds the table from config override entries
    ///
    /// Entries with an unrecognized type string are ignored; config
    /// validation rejects them before this point.
    pub fn from_config(entries: &[SessionTypeEntry]) -> Self {
        let defaults = HashMap::from([
            (1, SessionType::Vocabulary),
            (2, SessionType::Grammar),
            (3, SessionType::Reading),
            (4, SessionType::Listening),
        ]);

        let mut overrides = HashMap::new();
        for entry in entries {
            let Some(kind) = SessionType::from_db_string(&entry.session_type) else {
                continue;
            };
            let label = entry
                .label
                .clone()
                .unwrap_or_else(|| kind.default_label().to_string());
            overrides.insert((entry.unit, entry.session), ResolvedType { kind, label });
        }

        Self {
            defaults,
            overrides,
        }
    }

    /// Resolves a session's type
    ///
    /// Precedence: per-unit config override, then the session-number
    /// default, then a keyword scan over the lowercased title and page
    /// text. Falls back to [`SessionType::Unknown`] with the title as
    /// label.
    pub fn resolve(
        &self,
        unit_number: u32,
        session_number: u32,
        title: &str,
        page_text: &str,
    ) -> ResolvedType {
        if let Some(resolved) = self.overrides.get(&(unit_number, session_number)) {
            return resolved.clone();
        }

        if let Some(kind) = self.defaults.get(&session_number) {
            return ResolvedType {
                kind: *kind,
                label: kind.default_label().to_string(),
            };
        }

        let haystack = format!("{} {}", title, page_text).to_lowercase();
        for (kind, keywords) in KEYWORD_TABLE {
            if keywords.iter().any(|kw| haystack.contains(kw)) {
                return ResolvedType {
                    kind: *kind,
                    label: kind.default_label().to_string(),
                };
            }
        }

        let label = if title.trim().is_empty() {
            format!("Session {session_number}")
        } else {
            title.trim().to_string()
        };

        ResolvedType {
            kind: SessionType::Unknown,
            label,
        }
    }
}
