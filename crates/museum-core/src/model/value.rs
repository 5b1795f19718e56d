use chrono::NaiveDate;
use std::fmt;

/// Storage format for calendar dates (ISO-8601, e.g. `2024-03-09`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Type of a mapped column, used to type-check query operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Text,
    Date,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Integer => "integer",
            ValueType::Text => "text",
            ValueType::Date => "date",
        };
        f.write_str(name)
    }
}

/// A single column value crossing the boundary between entities and rows
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Type of this value, or `None` for `Null`
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Null => None,
            Value::Integer(_) => Some(ValueType::Integer),
            Value::Text(_) => Some(ValueType::Text),
            Value::Date(_) => Some(ValueType::Date),
        }
    }

    /// Whether this value may be compared with a column of type `ty`
    ///
    /// Text is accepted for date columns when it parses as a date, so
    /// `v.visitDate = '2024-03-09'` works with a string literal.
    pub fn is_compatible_with(&self, ty: ValueType) -> bool {
        match (self, ty) {
            (Value::Null, _) => true,
            (Value::Text(s), ValueType::Date) => {
                NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
            }
            (v, ty) => v.value_type() == Some(ty),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Normalize to the representation used for a column of type `ty`
    ///
    /// Text compared with a date column is parsed, so `'2024-3-9'` matches
    /// the stored `2024-03-09`. Other values are returned unchanged.
    pub fn coerce_to(self, ty: ValueType) -> Value {
        match (self, ty) {
            (Value::Text(s), ValueType::Date) => match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
                Ok(date) => Value::Date(date),
                Err(_) => Value::Text(s),
            },
            (value, _) => value,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Date(d) => write!(f, "'{}'", d.format(DATE_FORMAT)),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
