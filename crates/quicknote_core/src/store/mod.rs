//! In-memory note collection.
//!
//! # Responsibility
//! - Own every `Note` instance exclusively.
//! - Enforce id uniqueness and most-recent-first ordering.
//!
//! # Invariants
//! - Add and edit place the affected note at index 0.
//! - Delete removes in place without reordering the others.

pub mod note_store;
