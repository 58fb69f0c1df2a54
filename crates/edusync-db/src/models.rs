//! Database row types; these map directly to SQLite rows.
//! Distinct from edusync-types API models to keep the DB layer independent.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use edusync_types::models::{Lecture, User};

pub const DEFAULT_LECTURE_TITLE: &str = "Untitled Lecture";

pub struct UserRow {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string, never the plaintext.
    pub password: String,
    pub created_at: String,
}

pub struct LectureRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub transcript: String,
    pub summary: Option<String>,
    pub quiz: Option<String>,
    pub created_at: String,
}

/// Input for `Database::insert_lecture`.
#[derive(Debug, Clone, Default)]
pub struct NewLecture {
    pub user_id: i64,
    pub title: Option<String>,
    pub transcript: String,
    pub summary: Option<String>,
    pub quiz: Option<String>,
}

impl NewLecture {
    /// The stored title: the given one, or the placeholder when absent or blank.
    pub fn resolved_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_LECTURE_TITLE,
        }
    }
}

impl UserRow {
    pub fn into_user(self) -> User {
        User {
            created_at: parse_timestamp(&self.created_at),
            id: self.id,
            username: self.username,
        }
    }
}

impl LectureRow {
    pub fn into_lecture(self) -> Lecture {
        Lecture {
            created_at: parse_timestamp(&self.created_at),
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            transcript: self.transcript,
            summary: self.summary,
            quiz: self.quiz,
        }
    }
}

/// Parse a stored timestamp. Rows written by this crate are RFC 3339; plain
/// `CURRENT_TIMESTAMP` values ("YYYY-MM-DD HH:MM:SS") are accepted as UTC.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}
