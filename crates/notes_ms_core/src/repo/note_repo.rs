//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide patient-keyed lookup and insert APIs over the `notes` table.
//! - Own the unit-of-work boundary used by write paths.
//!
//! # Invariants
//! - Reads return notes in insertion order (`seq ASC`).
//! - A unit of work commits only when its work returns `Ok`; every other
//!   exit, including unwinding, leaves no partial write visible.
//! - Read paths reject invalid persisted ids instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use log::warn;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    patient_id,
    content
FROM notes";

const REQUIRED_NOTE_COLUMNS: &[&str] = &["seq", "id", "patient_id", "content"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure raised by note repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence capability set for notes.
pub trait NoteRepository {
    /// Returns one note for the patient, or `None` when the patient has none.
    fn find_by_patient_id(&self, patient_id: &str) -> RepoResult<Option<Note>>;
    /// Returns every note for the patient; empty when there are none.
    fn find_all_by_patient_id(&self, patient_id: &str) -> RepoResult<Vec<Note>>;
    /// Persists one note.
    fn insert(&self, note: &Note) -> RepoResult<()>;
}

/// Scoped atomic write boundary.
pub trait UnitOfWork {
    /// Runs `work` against a transactional view of the store.
    ///
    /// Commits when `work` returns `Ok`, rolls back otherwise. The error
    /// returned by `work` is handed back unchanged.
    fn with_unit_of_work<T, F>(&mut self, work: F) -> RepoResult<T>
    where
        F: FnOnce(&dyn NoteRepository) -> RepoResult<T>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema
    ///   does not carry the `notes` shape.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn find_by_patient_id(&self, patient_id: &str) -> RepoResult<Option<Note>> {
        ConnectionNotes::new(&*self.conn).find_by_patient_id(patient_id)
    }

    fn find_all_by_patient_id(&self, patient_id: &str) -> RepoResult<Vec<Note>> {
        ConnectionNotes::new(&*self.conn).find_all_by_patient_id(patient_id)
    }

    fn insert(&self, note: &Note) -> RepoResult<()> {
        ConnectionNotes::new(&*self.conn).insert(note)
    }
}

impl UnitOfWork for SqliteNoteRepository<'_> {
    fn with_unit_of_work<T, F>(&mut self, work: F) -> RepoResult<T>
    where
        F: FnOnce(&dyn NoteRepository) -> RepoResult<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Dropping `tx` without commit rolls back, which covers unwinding.
        let outcome = work(&ConnectionNotes::new(&tx));
        match outcome {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=unit_of_work module=repo status=error action=rollback error={rollback_err}"
                    );
                }
                Err(err)
            }
        }
    }
}

/// Note queries bound to one connection or open transaction.
struct ConnectionNotes<'a> {
    conn: &'a Connection,
}

impl<'a> ConnectionNotes<'a> {
    fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for ConnectionNotes<'_> {
    fn find_by_patient_id(&self, patient_id: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE patient_id = ?1
             ORDER BY seq ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([patient_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn find_all_by_patient_id(&self, patient_id: &str) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE patient_id = ?1
             ORDER BY seq ASC;"
        ))?;

        let mut rows = stmt.query([patient_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn insert(&self, note: &Note) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO notes (id, patient_id, content) VALUES (?1, ?2, ?3);",
            params![
                note.id.to_string(),
                note.patient_id.as_str(),
                note.content.as_str()
            ],
        )?;
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let id = parse_note_id(&id_text)?;
    Ok(Note::with_id(
        id,
        row.get::<_, String>("patient_id")?,
        row.get::<_, String>("content")?,
    ))
}

fn parse_note_id(value: &str) -> RepoResult<NoteId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in notes.id")))
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for &column in REQUIRED_NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
