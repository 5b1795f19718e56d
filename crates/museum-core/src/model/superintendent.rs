use std::fmt;
use std::hash::{Hash, Hasher};

use super::meta::{ColumnMeta, EntityMeta};
use super::value::ValueType;
use super::{Entity, EntityKind, Row};
use crate::errors::Result;

pub(crate) static META: EntityMeta = EntityMeta {
    kind: EntityKind::Superintendent,
    entity_name: "superintendents",
    table: "superintendents",
    columns: &[
        ColumnMeta::id("id", "id"),
        ColumnMeta::scalar("name", "name", ValueType::Text, false),
        ColumnMeta::scalar("title", "title", ValueType::Text, true),
    ],
};

/// Superintendent - the person in charge of exactly one museum
///
/// The museum row holds the foreign key; the reverse lookup goes through
/// the persistence context.
#[derive(Debug, Clone)]
pub struct Superintendent {
    id: i32,
    name: String,
    title: Option<String>,
}

impl Superintendent {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Professional title, e.g. "Executive Director"
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }
}

impl Entity for Superintendent {
    const KIND: EntityKind = EntityKind::Superintendent;

    fn id(&self) -> i32 {
        self.id
    }

    fn to_row(&self) -> Row {
        Row::new(
            Self::KIND,
            vec![
                self.id.into(),
                self.name.as_str().into(),
                self.title.clone().into(),
            ],
        )
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.int(0)?,
            name: row.text(1)?,
            title: row.opt_text(2)?,
        })
    }
}

impl PartialEq for Superintendent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Superintendent {}

impl Hash for Superintendent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::KIND.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for Superintendent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{}, {} ({})", self.name, title, self.id),
            None => write!(f, "{} ({})", self.name, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_title() {
        let plain = Superintendent::new(1, "Lourdes Ramos");
        assert_eq!(plain.to_string(), "Lourdes Ramos (1)");

        let titled = plain.with_title("President & CEO");
        assert_eq!(titled.to_string(), "Lourdes Ramos, President & CEO (1)");
    }
}
