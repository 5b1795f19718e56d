//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) that
//!   emit the canonical field set from `museum_core_types::schema`
//! - Test capture mode for deterministic assertions
//!
//! The driver owns operation boundaries; the store and model only emit
//! `tracing::debug!` events for internals such as identity-map hits and flushes.
//!
//! ```rust
//! use museum_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
