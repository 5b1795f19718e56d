//! Type-checking and lowering of parsed statements to SQL
//!
//! Paths resolve against entity metadata. A single association hop is
//! supported: comparing the target's identity reads the foreign key directly,
//! any other target attribute adds an inner join.

use super::parser::{parse, Comparison, Operand, SelectStatement};
use crate::errors::{MuseumError, Result};
use crate::model::{ColumnMeta, ColumnRole, EntityKind, EntityMeta, Value, ValueType};

/// A value slot in the generated SQL, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Literal(Value),
    Parameter {
        index: usize,
        expected: ValueType,
        /// Path text, for diagnostics
        path: String,
    },
}

/// Executable form of a query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// Original query text
    pub query: String,
    /// Entity kind produced by the query
    pub kind: EntityKind,
    /// SQL selecting the entity's columns in metadata order
    pub sql: String,
    /// One entry per `?` placeholder in `sql`
    pub binds: Vec<Bind>,
}

impl QueryPlan {
    /// Distinct parameter positions referenced by the query, ascending
    pub fn parameters(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .binds
            .iter()
            .filter_map(|b| match b {
                Bind::Parameter { index, .. } => Some(*index),
                Bind::Literal(_) => None,
            })
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// Expected type of parameter `index`, if the query uses it
    pub fn parameter_type(&self, index: usize) -> Option<ValueType> {
        self.binds.iter().find_map(|b| match b {
            Bind::Parameter {
                index: i, expected, ..
            } if *i == index => Some(*expected),
            _ => None,
        })
    }
}

/// Parse and plan `query` against the entity kinds in `registry`
///
/// # Errors
///
/// Returns `QueryMalformed` for syntax or path errors and `UnknownEntity`
/// when the FROM clause names an entity outside `registry`.
pub fn compile(query: &str, registry: &[EntityKind]) -> Result<QueryPlan> {
    let stmt = parse(query)?;
    plan(query, &stmt, registry)
}

/// Plan an already parsed statement
///
/// # Errors
///
/// See [`compile`].
pub fn plan(query: &str, stmt: &SelectStatement, registry: &[EntityKind]) -> Result<QueryPlan> {
    let malformed = |reason: String| MuseumError::QueryMalformed {
        query: query.to_string(),
        reason,
    };

    let kind = registry
        .iter()
        .copied()
        .find(|k| k.meta().answers_to(&stmt.entity))
        .ok_or_else(|| MuseumError::UnknownEntity {
            name: stmt.entity.clone(),
        })?;
    let meta = kind.meta();

    if stmt.projection != stmt.alias {
        return Err(malformed(format!(
            "SELECT names '{}' but the FROM clause declares '{}'",
            stmt.projection, stmt.alias
        )));
    }

    let mut joins: Vec<Join> = Vec::new();
    let mut predicates = Vec::new();
    let mut binds = Vec::new();

    for cmp in &stmt.conditions {
        let (column_sql, column) = resolve_path(stmt, meta, cmp, &mut joins, registry)
            .map_err(&malformed)?;
        let path = cmp.path.join(".");

        match &cmp.operand {
            Operand::Literal(value) => {
                if !value.is_compatible_with(column.ty) {
                    return Err(malformed(format!(
                        "{} is {} but was compared with {}",
                        path, column.ty, value
                    )));
                }
                binds.push(Bind::Literal(value.clone().coerce_to(column.ty)));
            }
            Operand::Parameter(index) => {
                let earlier = binds.iter().find_map(|b| match b {
                    Bind::Parameter {
                        index: i,
                        expected,
                        path,
                    } if i == index => Some((*expected, path.clone())),
                    _ => None,
                });
                if let Some((ty, other)) = earlier {
                    if ty != column.ty {
                        return Err(malformed(format!(
                            "?{} is compared with {} ({}) and {} ({})",
                            index, other, ty, path, column.ty
                        )));
                    }
                }
                binds.push(Bind::Parameter {
                    index: *index,
                    expected: column.ty,
                    path,
                });
            }
        }
        predicates.push(format!("{} = ?", column_sql));
    }

    let mut sql = format!(
        "SELECT {} FROM {} t0",
        meta.select_list("t0"),
        meta.table
    );
    for join in &joins {
        let target = join.target.meta();
        sql.push_str(&format!(
            " JOIN {} {} ON {}.{} = t0.{}",
            target.table,
            join.alias,
            join.alias,
            target.id_column().column,
            join.fk_column
        ));
    }
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    sql.push_str(&format!(" ORDER BY t0.{}", meta.id_column().column));

    Ok(QueryPlan {
        query: query.to_string(),
        kind,
        sql,
        binds,
    })
}

struct Join {
    attribute: String,
    alias: String,
    target: EntityKind,
    fk_column: &'static str,
}

fn resolve_path(
    stmt: &SelectStatement,
    meta: &'static EntityMeta,
    cmp: &Comparison,
    joins: &mut Vec<Join>,
    registry: &[EntityKind],
) -> std::result::Result<(String, &'static ColumnMeta), String> {
    let root = &cmp.path[0];
    if root != &stmt.alias {
        return Err(format!("unknown range variable '{}'", root));
    }

    match &cmp.path[1..] {
        [attribute] => {
            if let Some(column) = meta.attribute(attribute) {
                return Ok((format!("t0.{}", column.column), column));
            }
            if meta.association(attribute).is_some() {
                return Err(format!(
                    "'{}.{}' is an association; compare one of its attributes instead",
                    root, attribute
                ));
            }
            Err(format!("{} has no attribute '{}'", meta.kind, attribute))
        }
        [association, attribute] => {
            let (fk, target) = meta.association(association).ok_or_else(|| {
                format!("{} has no association '{}'", meta.kind, association)
            })?;
            if !registry.contains(&target) {
                return Err(format!("{} is not registered in this unit", target));
            }
            let target_meta = target.meta();
            let column = target_meta
                .attribute(attribute)
                .ok_or_else(|| format!("{} has no attribute '{}'", target, attribute))?;

            if column.role == ColumnRole::Id {
                // The foreign key already holds the target identity.
                return Ok((format!("t0.{}", fk.column), column));
            }

            let alias = match joins.iter().find(|j| j.attribute == *association) {
                Some(join) => join.alias.clone(),
                None => {
                    let alias = format!("t{}", joins.len() + 1);
                    joins.push(Join {
                        attribute: association.clone(),
                        alias: alias.clone(),
                        target,
                        fk_column: fk.column,
                    });
                    alias
                }
            };
            Ok((format!("{}.{}", alias, column.column), column))
        }
        _ => Err(format!(
            "path '{}' navigates more than one association",
            cmp.path.join(".")
        )),
    }
}
