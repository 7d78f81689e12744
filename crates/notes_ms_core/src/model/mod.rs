//! Domain model for patient notes.
//!
//! # Responsibility
//! - Define the note record handed between callers and persistence.
//!
//! # Invariants
//! - A note carries no rules of its own; persistence constraints are the
//!   only guarantees that hold.

pub mod note;
