//! Note domain model.
//!
//! # Responsibility
//! - Define the clinical note record keyed by patient identifier.
//!
//! # Invariants
//! - `patient_id` is not unique; one patient may own many notes.
//! - `content` is an opaque payload and is never inspected by core.
//! - `id` is the storage identity and is never reused for another note.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage identity of one persisted note.
pub type NoteId = Uuid;

/// A single clinical note associated with a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Record identity owned by the persistence schema.
    pub id: NoteId,
    /// Patient the note belongs to.
    pub patient_id: String,
    /// Opaque note body.
    pub content: String,
}

impl Note {
    /// Creates a note with a generated storage identity.
    pub fn new(patient_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), patient_id, content)
    }

    /// Creates a note with a caller-provided identity.
    ///
    /// Used by import paths where the record id already exists externally.
    /// No field is validated here.
    pub fn with_id(
        id: NoteId,
        patient_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            patient_id: patient_id.into(),
            content: content.into(),
        }
    }
}
