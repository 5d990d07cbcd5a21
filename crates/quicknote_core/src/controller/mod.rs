//! Selection and modal state machine.
//!
//! # Responsibility
//! - Track which surface (none, add, edit, view) is active.
//! - Translate user actions into note store mutations.
//!
//! # Invariants
//! - At most one of adding/editing/viewing is active.
//! - `Closed` is both the initial and the resting state.
//! - Stale note references degrade to `Closed`; they never error.

pub mod modal;
