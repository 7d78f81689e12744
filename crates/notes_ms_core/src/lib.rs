//! Core domain logic for the patient notes service.
//! This crate owns the note record, its SQLite persistence and the notes
//! use-case service that callers construct once at process start.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, normalize_level};
pub use model::note::{Note, NoteId};
pub use repo::note_repo::{
    NoteRepository, RepoError, RepoResult, SqliteNoteRepository, UnitOfWork,
};
pub use service::note_service::NoteService;

/// Minimal health-check API for process smoke checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
