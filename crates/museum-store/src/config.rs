//! Persistence units
//!
//! A persistence unit names a database and the entity kinds registered
//! against it. Units are read from a TOML file:
//!
//! ```toml
//! [units.museumDb]
//! database = "museum.db"
//! entities = ["Museum", "Superintendent", "Building", "Visitor", "MuseumVisit"]
//! ```
//!
//! `database = ":memory:"` selects a private in-memory database. When
//! `entities` is omitted every kind is registered.

#![allow(clippy::result_large_err)]

use crate::errors::{config_error, io_error, Result};
use museum_core::model::EntityKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Unit used when none is requested
pub const DEFAULT_UNIT: &str = "museumDb";

/// Persistence file looked up in the working directory
pub const DEFAULT_PERSISTENCE_FILE: &str = "persistence.toml";

/// Database file of the built-in unit
pub const DEFAULT_DATABASE: &str = "museum.db";

/// Overrides the persistence file location
pub const ENV_PERSISTENCE_FILE: &str = "MUSEUM_PERSISTENCE_FILE";

/// Overrides the database of the resolved unit
pub const ENV_DB_PATH: &str = "MUSEUM_DB_PATH";

const MEMORY: &str = ":memory:";

/// On-disk shape of the persistence file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistenceFile {
    #[serde(default)]
    pub units: BTreeMap<String, UnitEntry>,
}

/// One `[units.<name>]` table
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitEntry {
    pub database: String,
    pub entities: Option<Vec<String>>,
}

/// Where a unit's database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Interpret a configured database string
    pub fn parse(database: &str) -> Self {
        if database == MEMORY {
            DatabaseLocation::Memory
        } else {
            DatabaseLocation::File(PathBuf::from(database))
        }
    }
}

impl std::fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseLocation::Memory => f.write_str(MEMORY),
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A resolved persistence unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceUnit {
    name: String,
    database: DatabaseLocation,
    entities: Vec<EntityKind>,
}

impl PersistenceUnit {
    /// Create a unit; entity kinds are kept in dependency order without duplicates
    pub fn new(name: impl Into<String>, database: DatabaseLocation, entities: &[EntityKind]) -> Self {
        let entities = EntityKind::ALL
            .into_iter()
            .filter(|kind| entities.contains(kind))
            .collect();
        Self {
            name: name.into(),
            database,
            entities,
        }
    }

    /// A unit over a private in-memory database with every kind registered
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self::new(name, DatabaseLocation::Memory, &EntityKind::ALL)
    }

    /// The unit used when no persistence file is present
    pub fn built_in() -> Self {
        Self::new(
            DEFAULT_UNIT,
            DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE)),
            &EntityKind::ALL,
        )
    }

    /// Resolve a unit by name from the environment
    ///
    /// Reads the file named by `MUSEUM_PERSISTENCE_FILE`, else
    /// `persistence.toml` in the working directory. If neither exists only
    /// the built-in `museumDb` unit resolves. `MUSEUM_DB_PATH` then replaces
    /// the unit's database.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for unknown units or an invalid file, and an
    /// `Io` error if an explicitly configured file cannot be read.
    pub fn resolve(name: &str) -> Result<Self> {
        let unit = match std::env::var_os(ENV_PERSISTENCE_FILE) {
            Some(path) => Self::load(Path::new(&path), name)?,
            None => {
                let path = Path::new(DEFAULT_PERSISTENCE_FILE);
                if path.exists() {
                    Self::load(path, name)?
                } else if name == DEFAULT_UNIT {
                    tracing::debug!("no persistence file, using built-in unit");
                    Self::built_in()
                } else {
                    return Err(config_error(format!(
                        "Unknown persistence unit '{}' (no {} found)",
                        name, DEFAULT_PERSISTENCE_FILE
                    )));
                }
            }
        };

        Ok(match std::env::var(ENV_DB_PATH) {
            Ok(database) if !database.is_empty() => {
                unit.with_database(DatabaseLocation::parse(&database))
            }
            _ => unit,
        })
    }

    /// Load a unit by name from a persistence file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`PersistenceUnit::from_toml_str`].
    pub fn load(path: &Path, name: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error("read_persistence_file", e))?;
        Self::from_toml_str(&text, name)
    }

    /// Parse a persistence file and pick the named unit
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for malformed TOML, unknown units, or entity
    /// names that are not part of the model.
    pub fn from_toml_str(text: &str, name: &str) -> Result<Self> {
        let file: PersistenceFile = toml::from_str(text)
            .map_err(|e| config_error(format!("Invalid persistence file: {}", e)))?;

        let entry = file.units.get(name).ok_or_else(|| {
            let known: Vec<&str> = file.units.keys().map(String::as_str).collect();
            config_error(format!(
                "Unknown persistence unit '{}' (defined: {})",
                name,
                known.join(", ")
            ))
        })?;

        let entities = match &entry.entities {
            None => EntityKind::ALL.to_vec(),
            Some(names) => names
                .iter()
                .map(|entity| {
                    EntityKind::from_entity_name(entity).ok_or_else(|| {
                        config_error(format!(
                            "Unit '{}' lists unknown entity '{}'",
                            name, entity
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(Self::new(
            name,
            DatabaseLocation::parse(&entry.database),
            &entities,
        ))
    }

    /// Replace the database location
    pub fn with_database(mut self, database: DatabaseLocation) -> Self {
        self.database = database;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &DatabaseLocation {
        &self.database
    }

    /// Registered entity kinds, in dependency order
    pub fn entities(&self) -> &[EntityKind] {
        &self.entities
    }

    pub fn registers(&self, kind: EntityKind) -> bool {
        self.entities.contains(&kind)
    }
}
