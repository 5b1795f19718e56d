//! Domain model: museums, their superintendents, buildings, and visitors
//!
//! Only the owning side of each association is stored on an entity (a foreign
//! key). Inverse collections such as a museum's buildings are derived by the
//! persistence context, so the two sides of an association cannot diverge.

pub mod building;
pub mod meta;
pub mod museum;
pub mod museum_visit;
pub mod row;
pub mod superintendent;
pub mod value;
pub mod visitor;

pub use building::Building;
pub use meta::{ColumnMeta, ColumnRole, EntityMeta};
pub use museum::Museum;
pub use museum_visit::MuseumVisit;
pub use row::Row;
pub use superintendent::Superintendent;
pub use value::{Value, ValueType, DATE_FORMAT};
pub use visitor::Visitor;

use crate::errors::Result;
use std::fmt;

/// The kinds of entity known to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Museum,
    Superintendent,
    Building,
    Visitor,
    MuseumVisit,
}

impl EntityKind {
    /// Every kind, in foreign-key dependency order
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Superintendent,
        EntityKind::Museum,
        EntityKind::Building,
        EntityKind::Visitor,
        EntityKind::MuseumVisit,
    ];

    /// Type name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Museum => "Museum",
            EntityKind::Superintendent => "Superintendent",
            EntityKind::Building => "Building",
            EntityKind::Visitor => "Visitor",
            EntityKind::MuseumVisit => "MuseumVisit",
        }
    }

    /// Mapping metadata for the kind
    pub fn meta(&self) -> &'static EntityMeta {
        match self {
            EntityKind::Museum => &museum::META,
            EntityKind::Superintendent => &superintendent::META,
            EntityKind::Building => &building::META,
            EntityKind::Visitor => &visitor::META,
            EntityKind::MuseumVisit => &museum_visit::META,
        }
    }

    /// Resolve an entity name as written in a FROM clause
    pub fn from_entity_name(name: &str) -> Option<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.meta().answers_to(name))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity-map key: entity kind plus identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: i32,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: i32) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// A persistable entity
///
/// Equality of implementors is identity-based; `to_row` exposes the full
/// column state so the persistence context can detect modifications.
pub trait Entity: Clone + fmt::Debug + fmt::Display + 'static {
    const KIND: EntityKind;

    /// Identity of this entity
    fn id(&self) -> i32;

    /// Column values in `Self::KIND.meta().columns` order
    fn to_row(&self) -> Row;

    /// Rebuild an entity from column values in metadata order
    ///
    /// # Errors
    ///
    /// Returns `CorruptRow` if a value is missing or has the wrong type.
    fn from_row(row: &Row) -> Result<Self>;

    fn key(&self) -> EntityKey {
        EntityKey::new(Self::KIND, self.id())
    }
}
