//! Entity query language
//!
//! A small subset of an object-oriented SQL dialect: one entity in the FROM
//! clause, a conjunction of equality comparisons in WHERE, string and integer
//! literals, positional parameters, and single-hop association paths.
//!
//! ```
//! use museum_core::model::EntityKind;
//! use museum_core::query::compile;
//!
//! let plan = compile(
//!     "SELECT b FROM BUILDINGS b WHERE b.museum.museumId = 1",
//!     &EntityKind::ALL,
//! )
//! .unwrap();
//! assert_eq!(plan.kind, EntityKind::Building);
//! ```

pub mod lexer;
pub mod parser;
pub mod plan;

pub use parser::{parse, Comparison, Operand, SelectStatement};
pub use plan::{compile, Bind, QueryPlan};

/// Outcome of a single-result query
///
/// The three cases are data rather than errors so callers can branch on them;
/// `into_result` converts to the error form when absence is exceptional.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleResult<T> {
    None,
    One(T),
    /// More than one row matched; carries the row count
    Many(usize),
}

impl<T> SingleResult<T> {
    /// Classify a result list
    pub fn from_vec(mut items: Vec<T>) -> Self {
        match items.len() {
            0 => SingleResult::None,
            1 => match items.pop() {
                Some(item) => SingleResult::One(item),
                None => SingleResult::None,
            },
            n => SingleResult::Many(n),
        }
    }

    /// Convert to `Ok(item)`, `NoResult`, or `NonUniqueResult`
    ///
    /// # Errors
    ///
    /// `NoResult` for zero rows, `NonUniqueResult` for more than one.
    pub fn into_result(self, query: &str) -> crate::errors::Result<T> {
        match self {
            SingleResult::One(item) => Ok(item),
            SingleResult::None => Err(crate::errors::MuseumError::NoResult {
                query: query.to_string(),
            }),
            SingleResult::Many(count) => Err(crate::errors::MuseumError::NonUniqueResult {
                query: query.to_string(),
                count,
            }),
        }
    }

    /// The single item, if exactly one matched
    pub fn one(self) -> Option<T> {
        match self {
            SingleResult::One(item) => Some(item),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MuseumError;

    #[test]
    fn test_single_result_classification() {
        assert_eq!(SingleResult::from_vec(Vec::<i32>::new()), SingleResult::None);
        assert_eq!(SingleResult::from_vec(vec![7]), SingleResult::One(7));
        assert_eq!(SingleResult::from_vec(vec![1, 2, 3]), SingleResult::Many(3));
    }

    #[test]
    fn test_into_result_errors() {
        let err = SingleResult::<i32>::None.into_result("q").unwrap_err();
        assert!(matches!(err, MuseumError::NoResult { .. }));

        let err = SingleResult::<i32>::Many(2).into_result("q").unwrap_err();
        assert_eq!(
            err,
            MuseumError::NonUniqueResult {
                query: "q".to_string(),
                count: 2
            }
        );
    }
}
