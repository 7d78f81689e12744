//! Note use-case service.
//!
//! # Responsibility
//! - Translate get/get-all/create into repository calls with no added rules.
//! - Wrap `create` in a single unit of work.
//!
//! # Invariants
//! - Repository errors reach the caller unchanged; there is no retry or
//!   fallback at this layer.
//! - A patient with no notes yields `None` / an empty list, not an error.
//! - Log events carry the operation and counts, never note content.

use crate::model::note::Note;
use crate::repo::note_repo::{NoteRepository, RepoResult, UnitOfWork};
use log::{debug, error, info};
use std::time::Instant;

/// Notes service over an explicitly injected repository.
pub struct NoteService<R: NoteRepository + UnitOfWork> {
    repo: R,
}

impl<R: NoteRepository + UnitOfWork> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets the note associated with `patient_id`, if any.
    pub fn get(&self, patient_id: &str) -> RepoResult<Option<Note>> {
        let result = self.repo.find_by_patient_id(patient_id);
        if let Ok(found) = &result {
            debug!(
                "event=note_get module=service status=ok found={}",
                found.is_some()
            );
        }
        result
    }

    /// Gets all notes for `patient_id` in store order.
    pub fn get_all(&self, patient_id: &str) -> RepoResult<Vec<Note>> {
        let result = self.repo.find_all_by_patient_id(patient_id);
        if let Ok(notes) = &result {
            debug!(
                "event=note_get_all module=service status=ok count={}",
                notes.len()
            );
        }
        result
    }

    /// Persists `note` inside one unit of work.
    ///
    /// # Errors
    /// Any persistence failure aborts the unit of work and is returned as-is.
    pub fn create(&mut self, note: &Note) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.repo.with_unit_of_work(|repo| repo.insert(note));
        match &result {
            Ok(()) => info!(
                "event=note_create module=service status=ok note_id={} duration_ms={}",
                note.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=note_create module=service status=error note_id={} duration_ms={} error={err}",
                note.id,
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    /// Releases the service and returns the wrapped repository.
    pub fn into_inner(self) -> R {
        self.repo
    }
}
