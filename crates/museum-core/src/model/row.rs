use chrono::NaiveDate;

use super::value::{Value, DATE_FORMAT};
use super::EntityKind;
use crate::errors::{MuseumError, Result};

/// Column values of one entity, in metadata order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    kind: EntityKind,
    values: Vec<Value>,
}

impl Row {
    pub fn new(kind: EntityKind, values: Vec<Value>) -> Self {
        Self { kind, values }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn get(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| self.corrupt(index, "missing"))
    }

    fn corrupt(&self, index: usize, reason: &str) -> MuseumError {
        let column = self
            .kind
            .meta()
            .columns
            .get(index)
            .map(|c| c.column)
            .unwrap_or("?");
        MuseumError::CorruptRow {
            kind: self.kind,
            reason: format!("column {} is {}", column, reason),
        }
    }

    /// # Errors
    ///
    /// Returns `CorruptRow` if the column is null, not an integer, or out of range.
    pub fn int(&self, index: usize) -> Result<i32> {
        self.opt_int(index)?
            .ok_or_else(|| self.corrupt(index, "null"))
    }

    /// # Errors
    ///
    /// Returns `CorruptRow` if the column is not an integer or out of range.
    pub fn opt_int(&self, index: usize) -> Result<Option<i32>> {
        match self.get(index)? {
            Value::Null => Ok(None),
            Value::Integer(i) => i32::try_from(*i)
                .map(Some)
                .map_err(|_| self.corrupt(index, "out of range")),
            _ => Err(self.corrupt(index, "not an integer")),
        }
    }

    /// # Errors
    ///
    /// Returns `CorruptRow` if the column is null or not text.
    pub fn text(&self, index: usize) -> Result<String> {
        self.opt_text(index)?
            .ok_or_else(|| self.corrupt(index, "null"))
    }

    /// # Errors
    ///
    /// Returns `CorruptRow` if the column is not text.
    pub fn opt_text(&self, index: usize) -> Result<Option<String>> {
        match self.get(index)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            _ => Err(self.corrupt(index, "not text")),
        }
    }

    /// # Errors
    ///
    /// Returns `CorruptRow` if the column is null or not a valid date.
    pub fn date(&self, index: usize) -> Result<NaiveDate> {
        match self.get(index)? {
            Value::Date(d) => Ok(*d),
            Value::Text(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|_| self.corrupt(index, "not a date")),
            Value::Null => Err(self.corrupt(index, "null")),
            Value::Integer(_) => Err(self.corrupt(index, "not a date")),
        }
    }
}
