//! Schema bootstrap
//!
//! - Embedded SQL, applied in order inside a transaction each
//! - Idempotent: applied migrations are recorded in `schema_version`
//! - Checksums recorded on apply and verified on every later run

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration};
pub use runner::apply_migrations;
