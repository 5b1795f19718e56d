use std::fmt;
use std::hash::{Hash, Hasher};

use super::meta::{ColumnMeta, EntityMeta};
use super::value::ValueType;
use super::{Building, Entity, EntityKind, Row, Superintendent};
use crate::errors::Result;

pub(crate) static META: EntityMeta = EntityMeta {
    kind: EntityKind::Museum,
    entity_name: "museums",
    table: "museums",
    columns: &[
        ColumnMeta::id("museumId", "museum_id"),
        ColumnMeta::scalar("name", "name", ValueType::Text, false),
        ColumnMeta::scalar("location", "location", ValueType::Text, false),
        ColumnMeta::foreign_key(
            "superintendent",
            "superintendent_id",
            EntityKind::Superintendent,
            true,
        )
        .unique(),
    ],
};

/// Museum - the aggregate the demonstration revolves around
///
/// A museum owns the one-to-one link to its superintendent. Its buildings,
/// visits, and members are inverse collections resolved through the
/// persistence context.
#[derive(Debug, Clone)]
pub struct Museum {
    museum_id: i32,
    name: String,
    location: String,
    superintendent_id: Option<i32>,
}

impl Museum {
    /// Create a new Museum with no superintendent
    pub fn new(museum_id: i32, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            museum_id,
            name: name.into(),
            location: location.into(),
            superintendent_id: None,
        }
    }

    pub fn museum_id(&self) -> i32 {
        self.museum_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Identity of the superintendent, if one is assigned
    pub fn superintendent_id(&self) -> Option<i32> {
        self.superintendent_id
    }

    /// Assign the superintendent of this museum
    pub fn set_superintendent(&mut self, superintendent: &Superintendent) {
        self.superintendent_id = Some(superintendent.id());
    }

    pub fn clear_superintendent(&mut self) {
        self.superintendent_id = None;
    }

    /// Add a building to this museum
    ///
    /// The building side owns the association, so this re-targets the
    /// building's museum reference; the museum's building set is derived from it.
    pub fn add_building(&self, building: &mut Building) {
        building.move_to(self);
    }
}

impl Entity for Museum {
    const KIND: EntityKind = EntityKind::Museum;

    fn id(&self) -> i32 {
        self.museum_id
    }

    fn to_row(&self) -> Row {
        Row::new(
            Self::KIND,
            vec![
                self.museum_id.into(),
                self.name.as_str().into(),
                self.location.as_str().into(),
                self.superintendent_id.into(),
            ],
        )
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            museum_id: row.int(0)?,
            name: row.text(1)?,
            location: row.text(2)?,
            superintendent_id: row.opt_int(3)?,
        })
    }
}

impl PartialEq for Museum {
    fn eq(&self, other: &Self) -> bool {
        self.museum_id == other.museum_id
    }
}

impl Eq for Museum {}

impl Hash for Museum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::KIND.hash(state);
        self.museum_id.hash(state);
    }
}

impl fmt::Display for Museum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}), located in {}", self.name, self.museum_id, self.location)
    }
}
