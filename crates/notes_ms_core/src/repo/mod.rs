//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note persistence capability set used by the service.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Absence is a normal `None`/empty result, never a repository error.

pub mod note_repo;
