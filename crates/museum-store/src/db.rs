//! Database connection management

use crate::config::DatabaseLocation;
use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Open the database a persistence unit points at
pub fn open_location(location: &DatabaseLocation) -> Result<Connection> {
    match location {
        DatabaseLocation::Memory => open_in_memory(),
        DatabaseLocation::File(path) => open(path),
    }
}

/// Configure a connection for the entity model
///
/// Foreign keys must be on for the association cardinalities to hold.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    Ok(())
}
