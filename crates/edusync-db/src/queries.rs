use rusqlite::{Connection, OptionalExtension, Row, ffi};
use tracing::debug;

use crate::Database;
use crate::credentials::{hash_password, verify_password};
use crate::error::{DbError, Result, constraint_code};
use crate::models::{LectureRow, NewLecture, UserRow};

impl Database {
    // -- Users --

    /// Hash `password` and insert a new user. Returns the assigned id.
    pub fn create_user(&self, username: &str, password: &str) -> Result<i64> {
        // Hash before taking the writer so the lock is not held during Argon2.
        let password_hash = hash_password(password)?;

        self.with_conn_mut(|conn| {
            match conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, &password_hash),
            ) {
                Ok(_) => Ok(conn.last_insert_rowid()),
                Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                    Err(DbError::DuplicateUser(username.to_string()))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, username))
    }

    /// Look up a user by username and check the password against the stored
    /// hash. Unknown usernames and wrong passwords both return `None`.
    pub fn find_user(&self, username: &str, password: &str) -> Result<Option<UserRow>> {
        let Some(user) = self.get_user_by_username(username)? else {
            debug!("Login for unknown username '{}'", username);
            return Ok(None);
        };

        if verify_password(password, &user.password)? {
            Ok(Some(user))
        } else {
            debug!("Password mismatch for user {}", user.id);
            Ok(None)
        }
    }

    // -- Lectures --

    /// Insert a lecture. Returns the assigned id.
    pub fn insert_lecture(&self, lecture: &NewLecture) -> Result<i64> {
        if lecture.user_id <= 0 {
            return Err(DbError::MissingField("user_id"));
        }
        if lecture.transcript.trim().is_empty() {
            return Err(DbError::MissingField("transcript"));
        }

        self.with_conn_mut(|conn| {
            match conn.execute(
                "INSERT INTO lectures (user_id, title, transcript, summary, quiz)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    lecture.user_id,
                    lecture.resolved_title(),
                    lecture.transcript,
                    lecture.summary,
                    lecture.quiz,
                ],
            ) {
                Ok(_) => Ok(conn.last_insert_rowid()),
                Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    Err(DbError::UnknownUser(lecture.user_id))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// All lectures for `user_id`, newest first.
    pub fn list_lectures(&self, user_id: i64) -> Result<Vec<LectureRow>> {
        self.with_conn(|conn| query_lectures(conn, user_id))
    }
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, username, password, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_lectures(conn: &Connection, user_id: i64) -> Result<Vec<LectureRow>> {
    // id breaks ties between rows written within the same millisecond
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, title, transcript, summary, quiz, created_at
         FROM lectures
         WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([user_id], lecture_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn lecture_from_row(row: &Row<'_>) -> rusqlite::Result<LectureRow> {
    Ok(LectureRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        transcript: row.get(3)?,
        summary: row.get(4)?,
        quiz: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_LECTURE_TITLE;
    use tempfile::TempDir;

    fn open_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("edusync.db")).unwrap();
        (dir, db)
    }

    fn lecture(user_id: i64, transcript: &str) -> NewLecture {
        NewLecture {
            user_id,
            transcript: transcript.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let (_dir, db) = open_db();

        let id = db.create_user("a", "p").unwrap();
        assert!(id > 0);

        let err = db.create_user("a", "other").unwrap_err();
        assert!(matches!(err, DbError::DuplicateUser(ref name) if name == "a"));
    }

    #[test]
    fn password_is_stored_hashed() {
        let (_dir, db) = open_db();
        db.create_user("carol", "plaintext").unwrap();

        let row = db.get_user_by_username("carol").unwrap().unwrap();
        assert_ne!(row.password, "plaintext");
        assert!(row.password.starts_with("$argon2"));
    }

    #[test]
    fn find_user_requires_exact_credentials() {
        let (_dir, db) = open_db();
        let id = db.create_user("dave", "pw").unwrap();

        assert_eq!(db.find_user("dave", "pw").unwrap().unwrap().id, id);
        assert!(db.find_user("dave", "PW").unwrap().is_none());
        assert!(db.find_user("dave", "").unwrap().is_none());
        assert!(db.find_user("Dave", "pw").unwrap().is_none());
        assert!(db.find_user("nobody", "pw").unwrap().is_none());
    }

    #[test]
    fn insert_lecture_defaults_title() {
        let (_dir, db) = open_db();
        let uid = db.create_user("erin", "pw").unwrap();

        db.insert_lecture(&lecture(uid, "transcript text")).unwrap();

        let rows = db.list_lectures(uid).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, DEFAULT_LECTURE_TITLE);
        assert_eq!(rows[0].transcript, "transcript text");
        assert!(rows[0].summary.is_none());
        assert!(rows[0].quiz.is_none());
    }

    #[test]
    fn insert_lecture_keeps_all_fields() {
        let (_dir, db) = open_db();
        let uid = db.create_user("fay", "pw").unwrap();

        let id = db
            .insert_lecture(&NewLecture {
                user_id: uid,
                title: Some("Week 1".into()),
                transcript: "Entropy always increases.".into(),
                summary: Some("Entropy goes up.".into()),
                quiz: Some(r#"{"questions":[]}"#.into()),
            })
            .unwrap();

        let row = db.list_lectures(uid).unwrap().remove(0);
        assert_eq!(row.id, id);
        assert_eq!(row.user_id, uid);
        assert_eq!(row.title, "Week 1");
        assert_eq!(row.summary.as_deref(), Some("Entropy goes up."));
        assert_eq!(row.quiz.as_deref(), Some(r#"{"questions":[]}"#));
    }

    #[test]
    fn insert_lecture_requires_transcript_and_user() {
        let (_dir, db) = open_db();
        let uid = db.create_user("gus", "pw").unwrap();

        assert!(matches!(
            db.insert_lecture(&lecture(uid, "  ")),
            Err(DbError::MissingField("transcript"))
        ));
        assert!(matches!(
            db.insert_lecture(&lecture(0, "text")),
            Err(DbError::MissingField("user_id"))
        ));
    }

    #[test]
    fn insert_lecture_for_unknown_user_fails() {
        let (_dir, db) = open_db();
        let err = db.insert_lecture(&lecture(999, "text")).unwrap_err();
        assert!(matches!(err, DbError::UnknownUser(999)));
    }

    #[test]
    fn lectures_are_listed_newest_first_per_user() {
        let (_dir, db) = open_db();
        let uid = db.create_user("hal", "pw").unwrap();
        let other = db.create_user("ivy", "pw").unwrap();

        let ids: Vec<i64> = (0..5)
            .map(|i| db.insert_lecture(&lecture(uid, &format!("lecture {i}"))).unwrap())
            .collect();
        db.insert_lecture(&lecture(other, "not mine")).unwrap();

        let rows = db.list_lectures(uid).unwrap();
        let listed: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut expected = ids.clone();
        expected.reverse();
        assert_eq!(listed, expected);

        for pair in rows.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }

        assert!(db.list_lectures(12345).unwrap().is_empty());
    }
}
