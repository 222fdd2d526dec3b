/// Schema Introspection Module
///
/// This module lists the user tables of the database together with their
/// columns and foreign keys, and can dump a table's full contents for the
/// diagnostic overview printed after connecting.

use super::query::{quote_identifier, QueryExecutor, QueryResult};
use crate::core::Result;
use rusqlite::{Connection, Row};

/// Represents a foreign key relationship
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// The table this foreign key references
    pub referenced_table: String,
    /// The column in this table that is the foreign key
    pub from_column: String,
    /// The referenced column in the foreign table
    pub to_column: String,
}

/// Represents a database column with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type (e.g., "INTEGER", "TEXT", "REAL"); empty when undeclared
    pub type_name: String,
    /// Whether the column has a NOT NULL constraint
    pub notnull: bool,
    /// Whether this column is part of the primary key
    pub pk: bool,
    /// Default value expression (if any)
    pub dflt_value: Option<String>,
}

impl Column {
    /// Creates a Column from a PRAGMA table_info result row
    fn from_pragma_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Column {
            name: row.get(1)?,
            type_name: row.get(2)?,
            notnull: row.get(3)?,
            pk: row.get::<_, i64>(5)? > 0,
            dflt_value: row.get(4)?,
        })
    }
}

/// Structure and contents of one table
#[derive(Debug, Clone)]
pub struct TableDump {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    pub contents: QueryResult,
}

impl TableDump {
    /// Column names and declared types as a two-column result
    pub fn column_summary(&self) -> QueryResult {
        QueryResult::new(
            vec!["name".to_string(), "type".to_string()],
            self.columns
                .iter()
                .map(|c| vec![c.name.clone(), c.type_name.clone()])
                .collect(),
        )
    }
}

/// Returns the names of all user-defined tables, in schema order.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type='table' AND name NOT LIKE 'sqlite_%'
         ORDER BY rowid",
    )?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(names)
}

/// Retrieves column information for a specific table
pub fn table_columns(conn: &Connection, table_name: &str) -> Result<Vec<Column>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table_name)))?;
    let columns = stmt
        .query_map([], |row| Column::from_pragma_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(columns)
}

/// Retrieves foreign key information for a specific table
pub fn table_foreign_keys(conn: &Connection, table_name: &str) -> Result<Vec<ForeignKey>> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA foreign_key_list({})",
        quote_identifier(table_name)
    ))?;
    let foreign_keys = stmt
        .query_map([], |row| {
            Ok(ForeignKey {
                referenced_table: row.get(2)?,
                from_column: row.get(3)?,
                // NULL when the key references the parent's primary key implicitly
                to_column: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(foreign_keys)
}

/// Dumps the structure and every row of one table
pub fn dump_table(conn: &Connection, table_name: &str) -> Result<TableDump> {
    let columns = table_columns(conn, table_name)?;
    let foreign_keys = table_foreign_keys(conn, table_name)?;
    let contents = QueryExecutor::new(conn)
        .execute(&format!("SELECT * FROM {}", quote_identifier(table_name)))?;

    Ok(TableDump {
        name: table_name.to_string(),
        columns,
        foreign_keys,
        contents,
    })
}

/// Dumps every user table in schema order
pub fn dump_tables(conn: &Connection) -> Result<Vec<TableDump>> {
    list_tables(conn)?
        .iter()
        .map(|name| dump_table(conn, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_test_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE Hospital (
                ID INTEGER PRIMARY KEY,
                Name TEXT NOT NULL,
                BedCount INTEGER
            );
            CREATE TABLE Doctor (
                DocID INTEGER PRIMARY KEY AUTOINCREMENT,
                Name TEXT NOT NULL,
                HospitalID INTEGER,
                salary REAL DEFAULT 0,
                FOREIGN KEY (HospitalID) REFERENCES Hospital(ID)
            );
            INSERT INTO Hospital VALUES (1, 'Mayo Clinic', 200);
            INSERT INTO Doctor (Name, HospitalID, salary) VALUES ('Linda', 1, 12000);
        ",
        )
    }

    #[test]
    fn test_list_tables_skips_internal_tables() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_schema(&conn).unwrap();

        // AUTOINCREMENT creates sqlite_sequence
        let tables = list_tables(&conn).unwrap();
        assert_eq!(tables, vec!["Hospital", "Doctor"]);
    }

    #[test]
    fn test_column_metadata() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_schema(&conn).unwrap();

        let columns = table_columns(&conn, "Doctor").unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["DocID", "Name", "HospitalID", "salary"]);

        assert_eq!(columns[0].type_name, "INTEGER");
        assert!(columns[0].pk);
        assert!(columns[1].notnull);
        assert!(!columns[2].notnull);
        assert_eq!(columns[3].type_name, "REAL");
        assert_eq!(columns[3].dflt_value.as_deref(), Some("0"));
    }

    #[test]
    fn test_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_schema(&conn).unwrap();

        let fks = table_foreign_keys(&conn, "Doctor").unwrap();
        assert_eq!(
            fks,
            vec![ForeignKey {
                referenced_table: "Hospital".to_string(),
                from_column: "HospitalID".to_string(),
                to_column: "ID".to_string(),
            }]
        );
        assert!(table_foreign_keys(&conn, "Hospital").unwrap().is_empty());
    }

    #[test]
    fn test_dump_tables() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_schema(&conn).unwrap();

        let dumps = dump_tables(&conn).unwrap();
        assert_eq!(dumps.len(), 2);

        let hospital = &dumps[0];
        assert_eq!(hospital.name, "Hospital");
        assert_eq!(hospital.contents.rows, vec![vec!["1", "Mayo Clinic", "200"]]);

        let summary = hospital.column_summary();
        assert_eq!(summary.columns, vec!["name", "type"]);
        assert_eq!(summary.rows[1], vec!["Name", "TEXT"]);
    }

    #[test]
    fn test_unusual_table_name_is_quoted() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE \"Staff List\" (id INTEGER); INSERT INTO \"Staff List\" VALUES (7);")
            .unwrap();

        let dump = dump_table(&conn, "Staff List").unwrap();
        assert_eq!(dump.columns.len(), 1);
        assert_eq!(dump.contents.rows, vec![vec!["7"]]);
    }
}
