//! Board-level use-case services.
//!
//! # Responsibility
//! - Wire user actions through the controller, the store and persistence.
//! - Project notes into card read models for the presentation layer.
//!
//! # See also
//! - `controller::modal` for the transition table.

pub mod board_service;
pub mod card;
