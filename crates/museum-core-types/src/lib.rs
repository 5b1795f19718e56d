//! Core types shared across the museum workspace
//!
//! This crate holds the canonical field keys and event names used by the
//! logging facility, so the model, store, and driver all emit the same
//! structured shape.

pub mod schema;
