use std::fmt;
use std::hash::{Hash, Hasher};

use super::meta::{ColumnMeta, EntityMeta};
use super::value::ValueType;
use super::{Entity, EntityKind, Row};
use crate::errors::Result;

pub(crate) static META: EntityMeta = EntityMeta {
    kind: EntityKind::Visitor,
    entity_name: "visitors",
    table: "visitors",
    columns: &[
        ColumnMeta::id("id", "id"),
        ColumnMeta::scalar("name", "name", ValueType::Text, false),
    ],
};

/// Visitor - a person who visits museums
///
/// Visits and memberships are both derived from `MuseumVisit` rows.
#[derive(Debug, Clone)]
pub struct Visitor {
    id: i32,
    name: String,
}

impl Visitor {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl Entity for Visitor {
    const KIND: EntityKind = EntityKind::Visitor;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(Self::KIND, vec![self.id.into(), self.name.as_str().into()])
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.int(0)?,
            name: row.text(1)?,
        })
    }
}

impl PartialEq for Visitor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Visitor {}

impl Hash for Visitor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::KIND.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
