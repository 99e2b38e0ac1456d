//! Statement execution over SQLite.
//!
//! # Responsibility
//! - Run `BoundStatement`s with their parameters bound by the driver.
//! - Convert result rows into string cells for display.
//!
//! # Invariants
//! - Statement text is passed to the driver unchanged; values only travel as
//!   bound parameters.
//! - Driver failures surface as `ExecError::Execution` without retry.

use crate::statement::{BoundStatement, SqlValue};
use log::{debug, warn};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Cell text used for SQL `NULL`.
pub const NULL_CELL: &str = "NULL";

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    Execution(String),
}

impl Display for ExecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Execution(message) => write!(f, "statement execution failed: {message}"),
        }
    }
}

impl Error for ExecError {}

impl From<rusqlite::Error> for ExecError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Execution(value.to_string())
    }
}

/// Query result with ordered column names and string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns one row as ordered column-name/value pairs.
    pub fn row_pairs(&self, index: usize) -> Option<Vec<(&str, &str)>> {
        self.rows.get(index).map(|row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect()
        })
    }

    /// Returns the cell under `column` in row `index`.
    pub fn cell(&self, index: usize, column: &str) -> Option<&str> {
        let position = self.columns.iter().position(|name| name == column)?;
        self.rows
            .get(index)
            .and_then(|row| row.get(position))
            .map(String::as_str)
    }
}

/// Executor contract consumed by repositories.
pub trait StatementExecutor {
    /// Runs a mutating statement and returns the affected row count.
    fn execute(&self, statement: &BoundStatement) -> ExecResult<usize>;
    /// Runs a query and collects all rows.
    fn query(&self, statement: &BoundStatement) -> ExecResult<RowSet>;
}

/// SQLite-backed executor borrowing one connection.
pub struct SqliteExecutor<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExecutor<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StatementExecutor for SqliteExecutor<'_> {
    fn execute(&self, statement: &BoundStatement) -> ExecResult<usize> {
        let started_at = Instant::now();
        let result = self
            .conn
            .execute(statement.sql(), params_from_iter(bind_values(statement)));

        match result {
            Ok(changed) => {
                debug!(
                    "event=stmt_execute module=executor status=ok params={} rows={} duration_ms={}",
                    statement.params().len(),
                    changed,
                    started_at.elapsed().as_millis()
                );
                Ok(changed)
            }
            Err(err) => {
                warn!(
                    "event=stmt_execute module=executor status=error params={} duration_ms={} error={}",
                    statement.params().len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn query(&self, statement: &BoundStatement) -> ExecResult<RowSet> {
        let started_at = Instant::now();
        let result = collect_rows(self.conn, statement);

        match &result {
            Ok(rows) => debug!(
                "event=stmt_query module=executor status=ok params={} rows={} duration_ms={}",
                statement.params().len(),
                rows.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=stmt_query module=executor status=error params={} duration_ms={} error={}",
                statement.params().len(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn collect_rows(conn: &Connection, statement: &BoundStatement) -> ExecResult<RowSet> {
    let mut stmt = conn.prepare(statement.sql())?;
    let columns = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = stmt.query(params_from_iter(bind_values(statement)))?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            cells.push(cell_to_string(row.get_ref(index)?));
        }
        collected.push(cells);
    }

    Ok(RowSet {
        columns,
        rows: collected,
    })
}

fn bind_values(statement: &BoundStatement) -> Vec<Value> {
    statement.params().iter().map(to_driver_value).collect()
}

/// Maps a tagged value onto the driver's storage classes.
///
/// Dates bind as ISO text and booleans as 0/1 integers.
pub fn to_driver_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Integer(value) => Value::Integer(*value),
        SqlValue::Text(value) => Value::Text(value.clone()),
        SqlValue::Decimal(value) => Value::Real(*value),
        SqlValue::Date(value) => Value::Text(value.to_string()),
        SqlValue::Boolean(value) => Value::Integer(i64::from(*value)),
    }
}

fn cell_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => NULL_CELL.to_string(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}
