//! Museum Core - domain model and query language
//!
//! This crate provides the pieces of the museum ORM demonstration that do not
//! touch a database:
//! - The entity model (Museum, Superintendent, Building, Visitor, MuseumVisit)
//!   with its mapping metadata and association helpers
//! - The entity query language: lexer, parser, and planner lowering to SQL
//! - The error facility (`MuseumError`, `ExError`) and logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod query;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, MuseumError, Result};
pub use model::{
    Building, Entity, EntityKey, EntityKind, Museum, MuseumVisit, Superintendent, Value, Visitor,
};
pub use query::{QueryPlan, SingleResult};
