//! Notes store: connection setup and the `notes` table schema.
//!
//! A connection handed out by [`open_db`] or [`open_db_in_memory`] already
//! carries the latest `notes` schema, so repositories can trust it. Stores
//! written by a newer build are refused instead of being downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// SQLite failure while opening, migrating or querying the store.
    Sqlite(rusqlite::Error),
    /// The store's `user_version` is ahead of the migrations bundled here.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "notes store sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "notes store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use std::error::Error;

    #[test]
    fn sqlite_failures_name_the_notes_store_and_keep_their_source() {
        let err = DbError::from(rusqlite::Error::InvalidQuery);
        assert!(err.to_string().starts_with("notes store sqlite error:"));
        assert!(err.source().is_some());
    }

    #[test]
    fn newer_schema_reports_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "notes store schema version 7 is newer than supported 1"
        );
        assert!(err.source().is_none());
    }
}
