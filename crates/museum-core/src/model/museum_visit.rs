use chrono::NaiveDate;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::meta::{ColumnMeta, EntityMeta};
use super::value::{ValueType, DATE_FORMAT};
use super::{Entity, EntityKind, Museum, Row, Visitor};
use crate::errors::Result;

pub(crate) static META: EntityMeta = EntityMeta {
    kind: EntityKind::MuseumVisit,
    entity_name: "museum_visits",
    table: "museum_visits",
    columns: &[
        ColumnMeta::id("id", "id"),
        ColumnMeta::foreign_key("museum", "museum_id", EntityKind::Museum, false),
        ColumnMeta::foreign_key("visitor", "visitor_id", EntityKind::Visitor, false),
        ColumnMeta::scalar("visitDate", "visit_date", ValueType::Date, false),
    ],
};

/// MuseumVisit - association entity for the visitor/museum many-to-many
///
/// Carries the visit date on the relation itself. Uses a surrogate identity;
/// (museum, visitor, visit date) is unique in the schema.
#[derive(Debug, Clone)]
pub struct MuseumVisit {
    id: i32,
    museum_id: i32,
    visitor_id: i32,
    visit_date: NaiveDate,
}

impl MuseumVisit {
    /// Record that `visitor` went to `museum` on `visit_date`
    pub fn record(id: i32, museum: &Museum, visitor: &Visitor, visit_date: NaiveDate) -> Self {
        Self {
            id,
            museum_id: museum.museum_id(),
            visitor_id: visitor.id(),
            visit_date,
        }
    }

    pub fn museum_id(&self) -> i32 {
        self.museum_id
    }

    pub fn visitor_id(&self) -> i32 {
        self.visitor_id
    }

    pub fn visit_date(&self) -> NaiveDate {
        self.visit_date
    }

    pub fn set_visit_date(&mut self, visit_date: NaiveDate) {
        self.visit_date = visit_date;
    }

    /// Whether this visit links `visitor` and `museum`
    pub fn links(&self, museum: &Museum, visitor: &Visitor) -> bool {
        self.museum_id == museum.museum_id() && self.visitor_id == visitor.id()
    }
}

impl Entity for MuseumVisit {
    const KIND: EntityKind = EntityKind::MuseumVisit;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(
            Self::KIND,
            vec![
                self.id.into(),
                self.museum_id.into(),
                self.visitor_id.into(),
                self.visit_date.into(),
            ],
        )
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.int(0)?,
            museum_id: row.int(1)?,
            visitor_id: row.int(2)?,
            visit_date: row.date(3)?,
        })
    }
}

impl PartialEq for MuseumVisit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MuseumVisit {}

impl Hash for MuseumVisit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::KIND.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for MuseumVisit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Visit {}: visitor {} at museum {} on {}",
            self.id,
            self.visitor_id,
            self.museum_id,
            self.visit_date.format(DATE_FORMAT)
        )
    }
}
