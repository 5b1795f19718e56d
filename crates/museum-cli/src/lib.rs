//! Museum demonstration driver
//!
//! The scripted examples live here so they can be driven with any reader
//! and writer; `main.rs` wires them to stdin and stdout.

pub mod commands;

pub use commands::{run, RunOptions};
