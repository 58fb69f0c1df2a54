use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("username '{0}' is already taken")]
    DuplicateUser(String),

    #[error("user {0} does not exist")]
    UnknownUser(i64),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("credential hashing failed: {0}")]
    Credential(String),

    #[error("connection lock poisoned: {0}")]
    Poisoned(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Extended result code of a failed constraint, if `err` is one.
pub(crate) fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(e.extended_code)
        }
        _ => None,
    }
}
