use std::fmt;
use std::hash::{Hash, Hasher};

use super::meta::{ColumnMeta, EntityMeta};
use super::value::ValueType;
use super::{Entity, EntityKind, Museum, Row};
use crate::errors::Result;

pub(crate) static META: EntityMeta = EntityMeta {
    kind: EntityKind::Building,
    entity_name: "buildings",
    table: "buildings",
    columns: &[
        ColumnMeta::id("id", "id"),
        ColumnMeta::scalar("name", "name", ValueType::Text, false),
        ColumnMeta::scalar("address", "address", ValueType::Text, true),
        ColumnMeta::foreign_key("museum", "museum_id", EntityKind::Museum, false),
    ],
};

/// Building - a site belonging to exactly one museum
///
/// Owning side of the museum/buildings association.
#[derive(Debug, Clone)]
pub struct Building {
    id: i32,
    name: String,
    address: Option<String>,
    museum_id: i32,
}

impl Building {
    /// Create a building belonging to `museum`
    pub fn new(id: i32, name: impl Into<String>, museum: &Museum) -> Self {
        Self {
            id,
            name: name.into(),
            address: None,
            museum_id: museum.museum_id(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn set_address(&mut self, address: Option<String>) {
        self.address = address;
    }

    /// Identity of the owning museum
    pub fn museum_id(&self) -> i32 {
        self.museum_id
    }

    /// Re-home this building under `museum`
    pub fn move_to(&mut self, museum: &Museum) {
        self.museum_id = museum.museum_id();
    }

    /// Whether this building belongs to `museum`
    pub fn belongs_to(&self, museum: &Museum) -> bool {
        self.museum_id == museum.museum_id()
    }
}

impl Entity for Building {
    const KIND: EntityKind = EntityKind::Building;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(
            Self::KIND,
            vec![
                self.id.into(),
                self.name.as_str().into(),
                self.address.clone().into(),
                self.museum_id.into(),
            ],
        )
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.int(0)?,
            name: row.text(1)?,
            address: row.opt_text(2)?,
            museum_id: row.int(3)?,
        })
    }
}

impl PartialEq for Building {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Building {}

impl Hash for Building {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::KIND.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Building {} ({})", self.name, self.id)?;
        if let Some(address) = &self.address {
            write!(f, " at {}", address)?;
        }
        Ok(())
    }
}
