/// Query Execution Module
///
/// This module provides functionality for executing parameterized SQL
/// queries and converting their rows into display strings.

use crate::core::{HospitalError, Result};
use rusqlite::{types::ValueRef, Connection, Params};
use tracing::debug;

/// Represents the result of a SQL query execution
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Column names from the query result
    pub columns: Vec<String>,
    /// Rows of data as string values
    pub rows: Vec<Vec<String>>,
    /// Number of rows returned
    pub row_count: usize,
}

impl QueryResult {
    /// Creates a new QueryResult from column names and row data
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let row_count = rows.len();
        QueryResult {
            columns,
            rows,
            row_count,
        }
    }

    /// True when the query matched no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the values of the named column, matched case-insensitively.
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let index = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }
}

/// Query execution service that operates on a database connection
pub struct QueryExecutor<'a> {
    connection: &'a Connection,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new QueryExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        QueryExecutor { connection }
    }

    /// Executes a SQL query without parameters
    pub fn execute(&self, sql: &str) -> Result<QueryResult> {
        self.execute_with_params(sql, [])
    }

    /// Executes a parameterized SQL query and returns formatted results
    ///
    /// # Arguments
    ///
    /// * `sql` - The SQL query to execute, using `?N` placeholders
    /// * `params` - Values bound to the placeholders
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::Query` if the statement cannot be prepared or
    /// a row cannot be read.
    pub fn execute_with_params<P: Params>(&self, sql: &str, params: P) -> Result<QueryResult> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .map_err(|e| HospitalError::Query(format!("Failed to prepare statement: {}", e)))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = stmt.column_count();

        let rows = stmt
            .query_map(params, |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(format_value(row.get_ref(i)?));
                }
                Ok(values)
            })
            .map_err(|e| HospitalError::Query(format!("Query execution failed: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| HospitalError::Query(format!("Result processing failed: {}", e)))?;

        debug!(rows = rows.len(), "executed: {}", sql.trim());
        Ok(QueryResult::new(columns, rows))
    }
}

/// Convenience function to execute a parameterized query on a connection
pub fn query_on_connection<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<QueryResult> {
    QueryExecutor::new(conn).execute_with_params(sql, params)
}

/// Formats a SQLite value for display
///
/// Reals always keep a fractional part so that `5000.0` does not print as
/// an integer.
pub fn format_value(value: ValueRef) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => format!("{:?}", f),
        ValueRef::Text(t) => String::from_utf8_lossy(t).to_string(),
        ValueRef::Blob(b) => format!("<BLOB: {} bytes>", b.len()),
    }
}

/// Quotes an SQL identifier for interpolation into a statement.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
