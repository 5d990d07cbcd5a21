//! Domain model for the note board.
//!
//! # Responsibility
//! - Define the single persisted entity (`Note`) and its identifier.
//! - Keep the wire shape (`id`, `content`, `createdAt`, `updatedAt`) stable.
//!
//! # Invariants
//! - Every note is identified by an opaque, immutable `NoteId`.
//! - `updated_at >= created_at` for every valid note.

pub mod note;
