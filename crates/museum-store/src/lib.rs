//! Museum Store - SQLite-backed persistence context for the museum model
//!
//! Provides:
//! - Persistence units resolved from `persistence.toml` and the environment
//! - SQLite schema with an embedded, checksummed migrations framework
//! - Metadata-driven repository SQL for every entity kind
//! - `EntityManagerFactory` / `EntityManager`: identity map, snapshot-based
//!   dirty tracking, explicit transactions, typed queries, and lazy
//!   association navigation

pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use config::{DatabaseLocation, PersistenceUnit};
pub use context::{EntityManager, EntityManagerFactory, FlushSummary, Managed, TypedQuery};
pub use errors::Result;
