//! Core use-case services.
//!
//! # Responsibility
//! - Expose use-case level note APIs over repository implementations.
//! - Keep process bootstrap decoupled from storage details.

pub mod note_service;
