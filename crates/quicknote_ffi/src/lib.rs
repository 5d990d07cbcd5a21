//! Flutter-facing bridge crate for QuickNote core.

pub mod api;
