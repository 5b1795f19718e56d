//! Conversion between model values and SQLite values

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use chrono::NaiveDate;
use museum_core::errors::MuseumError;
use museum_core::model::{EntityKind, Row, Value, ValueType, DATE_FORMAT};
use rusqlite::types::{Value as SqlValue, ValueRef};

/// Convert a model value for binding; dates are stored as ISO text
pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Date(d) => SqlValue::Text(d.format(DATE_FORMAT).to_string()),
    }
}

/// Read the entity columns of a result row, in metadata order
pub fn read_row(row: &rusqlite::Row<'_>, kind: EntityKind) -> Result<Row> {
    let meta = kind.meta();
    let mut values = Vec::with_capacity(meta.columns.len());

    for (index, column) in meta.columns.iter().enumerate() {
        let raw = row.get_ref(index).map_err(from_rusqlite)?;
        let corrupt = |reason: &str| MuseumError::CorruptRow {
            kind,
            reason: format!("column {} {}", column.column, reason),
        };

        let value = match (raw, column.ty) {
            (ValueRef::Null, _) => Value::Null,
            (ValueRef::Integer(i), ValueType::Integer) => Value::Integer(i),
            (ValueRef::Text(bytes), ValueType::Text) => Value::Text(
                std::str::from_utf8(bytes)
                    .map_err(|_| corrupt("is not valid UTF-8"))?
                    .to_string(),
            ),
            (ValueRef::Text(bytes), ValueType::Date) => {
                let text =
                    std::str::from_utf8(bytes).map_err(|_| corrupt("is not valid UTF-8"))?;
                Value::Date(
                    NaiveDate::parse_from_str(text, DATE_FORMAT)
                        .map_err(|_| corrupt(&format!("holds '{}', not a date", text)))?,
                )
            }
            (other, ty) => {
                return Err(corrupt(&format!(
                    "holds {:?} where {} was expected",
                    other.data_type(),
                    ty
                ))
                .into())
            }
        };
        values.push(value);
    }

    Ok(Row::new(kind, values))
}
