//! Repository layer: metadata-driven SQL for every entity kind

pub mod mapping;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
