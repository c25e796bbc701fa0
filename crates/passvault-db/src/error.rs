use rusqlite::ffi;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("user does not exist")]
    UnknownUser,

    #[error("database lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("sqlite: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        // Constraint failures carry domain meaning; everything else is a
        // storage fault.
        if let rusqlite::Error::SqliteFailure(ref e, _) = err {
            match e.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE => return StoreError::DuplicateUsername,
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return StoreError::UnknownUser,
                _ => {}
            }
        }
        StoreError::Sqlite(err)
    }
}
