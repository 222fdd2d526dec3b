/// # Test Utilities Module
///
/// Fixtures shared by the unit tests: an isolated in-memory database
/// populated with the sample Hospital / Doctor schema.

use crate::core::db::{query_on_connection, ConnectionManager, QueryResult};
use crate::core::Result;
use rusqlite::Connection;

/// Schema and rows loaded into every fixture
pub const SAMPLE_DATA_SQL: &str = include_str!("../tests/fixtures/hospital.sql");

/// Isolated database test fixture
pub struct HospitalFixture {
    manager: ConnectionManager,
}

impl HospitalFixture {
    /// Creates an in-memory database with the sample schema and data
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SAMPLE_DATA_SQL)?;

        Ok(HospitalFixture {
            manager: ConnectionManager::from_connection(conn)?,
        })
    }

    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ConnectionManager {
        &mut self.manager
    }

    /// The open connection; panics if the fixture was closed
    pub fn connection(&self) -> &Connection {
        self.manager
            .connection()
            .expect("fixture connection is closed")
    }

    /// Runs arbitrary SQL against the fixture
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.connection().execute_batch(sql)?;
        Ok(())
    }

    /// Full contents of the Doctor table in key order
    pub fn doctor_snapshot(&self) -> Result<QueryResult> {
        query_on_connection(self.connection(), "SELECT * FROM Doctor ORDER BY DocID", [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_has_sample_rows() {
        let fixture = HospitalFixture::new().unwrap();
        let doctors = fixture.doctor_snapshot().unwrap();
        assert_eq!(doctors.row_count, 8);

        let hospitals =
            query_on_connection(fixture.connection(), "SELECT COUNT(*) FROM Hospital", []).unwrap();
        assert_eq!(hospitals.rows[0][0], "4");
    }

    #[test]
    fn test_fixtures_are_isolated() {
        let a = HospitalFixture::new().unwrap();
        let b = HospitalFixture::new().unwrap();
        a.execute("DELETE FROM Doctor").unwrap();

        assert_eq!(a.doctor_snapshot().unwrap().row_count, 0);
        assert_eq!(b.doctor_snapshot().unwrap().row_count, 8);
    }
}
