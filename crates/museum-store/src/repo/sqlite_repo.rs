//! SQLite repository implementation
//!
//! Statements are generated from entity metadata, so one set of functions
//! serves every kind. All functions take a `Connection`; a `Transaction`
//! derefs to one, which is how the unit of work flushes atomically.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::mapping::{read_row, to_sql};
use museum_core::model::{EntityKey, EntityKind, Row, Value};
use rusqlite::{params_from_iter, Connection, OptionalExtension};

/// SQLite repository for all entity kinds
pub struct SqliteRepo;

impl SqliteRepo {
    /// Load one row by identity
    pub fn find_row(conn: &Connection, key: EntityKey) -> Result<Option<Row>> {
        let meta = key.kind.meta();
        let sql = format!(
            "SELECT {} FROM {} t0 WHERE t0.{} = ?1",
            meta.select_list("t0"),
            meta.table,
            meta.id_column().column
        );
        tracing::debug!(%key, sql = %sql, "load by identity");

        let mut rows = Self::query(conn, key.kind, &sql, &[Value::from(key.id)])?;
        Ok(rows.pop())
    }

    /// Whether a row with this identity exists
    pub fn exists(conn: &Connection, key: EntityKey) -> Result<bool> {
        let meta = key.kind.meta();
        let sql = format!(
            "SELECT 1 FROM {} WHERE {} = ?1",
            meta.table,
            meta.id_column().column
        );
        let found = conn
            .query_row(&sql, [key.id], |_| Ok(true))
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.unwrap_or(false))
    }

    /// Insert a full row
    pub fn insert(conn: &Connection, row: &Row) -> Result<()> {
        let meta = row.kind().meta();
        let columns: Vec<&str> = meta.columns.iter().map(|c| c.column).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            meta.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        tracing::debug!(sql = %sql, "insert");

        conn.execute(&sql, params_from_iter(row.values().iter().map(to_sql)))
            .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Overwrite every non-identity column of the row's entity
    pub fn update(conn: &Connection, row: &Row) -> Result<()> {
        let meta = row.kind().meta();
        let assignments: Vec<String> = meta.columns[1..]
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ?{}", c.column, i + 2))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?1",
            meta.table,
            assignments.join(", "),
            meta.id_column().column
        );
        tracing::debug!(sql = %sql, "update");

        conn.execute(&sql, params_from_iter(row.values().iter().map(to_sql)))
            .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Delete by identity
    pub fn delete(conn: &Connection, key: EntityKey) -> Result<()> {
        let meta = key.kind.meta();
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            meta.table,
            meta.id_column().column
        );
        tracing::debug!(%key, sql = %sql, "delete");

        conn.execute(&sql, [key.id]).map_err(from_rusqlite)?;
        Ok(())
    }

    /// Rows whose `column` equals `value`, ordered by identity
    pub fn select_where(
        conn: &Connection,
        kind: EntityKind,
        column: &str,
        value: &Value,
    ) -> Result<Vec<Row>> {
        let meta = kind.meta();
        let sql = format!(
            "SELECT {} FROM {} t0 WHERE t0.{} = ?1 ORDER BY t0.{}",
            meta.select_list("t0"),
            meta.table,
            column,
            meta.id_column().column
        );
        Self::query(conn, kind, &sql, std::slice::from_ref(value))
    }

    /// Run a statement selecting the columns of `kind` in metadata order
    pub fn query(conn: &Connection, kind: EntityKind, sql: &str, values: &[Value]) -> Result<Vec<Row>> {
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let mut rows = stmt
            .query(params_from_iter(values.iter().map(to_sql)))
            .map_err(from_rusqlite)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(from_rusqlite)? {
            out.push(read_row(row, kind)?);
        }
        Ok(out)
    }
}
