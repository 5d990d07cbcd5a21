//! Persistence adapter between the note store and key-value storage.
//!
//! # Responsibility
//! - Mirror the full note collection into one named slot.
//! - Decode and validate the slot at startup.
//!
//! # Invariants
//! - Saves are whole-collection replacements, never incremental.
//! - Loads reject (rather than repair) duplicate ids and reversed timestamps.

pub mod note_slot;
