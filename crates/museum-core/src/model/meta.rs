//! Mapping metadata: how each entity kind lands in a table
//!
//! This is the declarative counterpart of ORM mapping annotations. The query
//! planner resolves entity names and attribute paths against it, and the store
//! generates its row SQL from it.

use super::value::ValueType;
use super::EntityKind;

/// Role a column plays in its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Primary key
    Id,
    /// Plain attribute
    Scalar,
    /// To-one association; the column holds the target's identity
    ForeignKey(EntityKind),
}

/// One mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMeta {
    /// Name used in query paths (`m.location`, `b.museum`)
    pub attribute: &'static str,
    /// Name of the SQL column
    pub column: &'static str,
    pub ty: ValueType,
    pub nullable: bool,
    /// Backed by a UNIQUE constraint
    pub unique: bool,
    pub role: ColumnRole,
}

impl ColumnMeta {
    pub const fn id(attribute: &'static str, column: &'static str) -> Self {
        Self {
            attribute,
            column,
            ty: ValueType::Integer,
            nullable: false,
            unique: true,
            role: ColumnRole::Id,
        }
    }

    pub const fn scalar(
        attribute: &'static str,
        column: &'static str,
        ty: ValueType,
        nullable: bool,
    ) -> Self {
        Self {
            attribute,
            column,
            ty,
            nullable,
            unique: false,
            role: ColumnRole::Scalar,
        }
    }

    pub const fn foreign_key(
        attribute: &'static str,
        column: &'static str,
        target: EntityKind,
        nullable: bool,
    ) -> Self {
        Self {
            attribute,
            column,
            ty: ValueType::Integer,
            nullable,
            unique: false,
            role: ColumnRole::ForeignKey(target),
        }
    }

    /// Mark the column as backed by a UNIQUE constraint
    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    pub fn is_association(&self) -> bool {
        matches!(self.role, ColumnRole::ForeignKey(_))
    }
}

/// Table mapping for one entity kind
///
/// `columns` always starts with the identity column, and entities produce
/// their rows in exactly this order.
#[derive(Debug)]
pub struct EntityMeta {
    pub kind: EntityKind,
    /// Entity name as registered for the query language
    pub entity_name: &'static str,
    pub table: &'static str,
    pub columns: &'static [ColumnMeta],
}

impl EntityMeta {
    /// The identity column
    pub fn id_column(&self) -> &ColumnMeta {
        &self.columns[0]
    }

    /// Look up a non-association attribute by its query name
    pub fn attribute(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns
            .iter()
            .find(|c| c.attribute == name && !c.is_association())
    }

    /// Look up a to-one association by its query name
    pub fn association(&self, name: &str) -> Option<(&ColumnMeta, EntityKind)> {
        self.columns.iter().find_map(|c| match c.role {
            ColumnRole::ForeignKey(target) if c.attribute == name => Some((c, target)),
            _ => None,
        })
    }

    /// Whether `name` refers to this entity in a FROM clause
    ///
    /// Matching is case-insensitive and accepts both the registered entity
    /// name (`museums`) and the type name (`Museum`).
    pub fn answers_to(&self, name: &str) -> bool {
        self.entity_name.eq_ignore_ascii_case(name) || self.kind.name().eq_ignore_ascii_case(name)
    }

    /// Comma separated column list, each qualified with `alias`
    pub fn select_list(&self, alias: &str) -> String {
        self.columns
            .iter()
            .map(|c| format!("{}.{}", alias, c.column))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
