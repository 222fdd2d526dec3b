//! Queries against the Hospital and Doctor tables.
//!
//! Each function issues parameterized statements on a borrowed connection and
//! returns the raw result set; deciding what "no rows" means is left to the
//! caller.

use crate::core::db::{query_on_connection, QueryResult};
use crate::core::Result;
use crate::model::{DoctorId, Experience, HospitalId, Salary, Speciality};
use rusqlite::{params, Connection};
use tracing::{debug, info};

const HOSPITAL_BY_ID: &str = "SELECT * FROM Hospital WHERE ID = ?1";

const DOCTOR_BY_ID: &str = "SELECT * FROM Doctor WHERE DocID = ?1";

const DOCTORS_BY_SPECIALITY_AND_SALARY: &str =
    "SELECT * FROM Doctor WHERE LOWER(Speciality) = ?1 AND salary = ?2";

const DOCTORS_BY_HOSPITAL: &str = r#"
SELECT D.*
FROM Doctor D
JOIN Hospital H ON D.HospitalID = H.ID
WHERE H.ID = ?1"#;

const UPDATE_EXPERIENCE: &str = "UPDATE Doctor SET Exp = ?1 WHERE DocID = ?2";

/// Full rows of a doctor read around an experience change.
///
/// `after` is empty if the row was deleted between the write and the re-read.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceUpdate {
    pub before: QueryResult,
    pub after: QueryResult,
}

/// Fetches the hospital row with the given ID (zero or one row).
pub fn find_hospital(conn: &Connection, id: HospitalId) -> Result<QueryResult> {
    query_on_connection(conn, HOSPITAL_BY_ID, [id.0])
}

/// Fetches the doctor row with the given ID (zero or one row).
pub fn find_doctor(conn: &Connection, id: DoctorId) -> Result<QueryResult> {
    query_on_connection(conn, DOCTOR_BY_ID, [id.0])
}

/// Doctors whose specialty matches case-insensitively and whose salary is
/// exactly `salary`.
pub fn doctors_by_speciality_and_salary(
    conn: &Connection,
    speciality: &Speciality,
    salary: Salary,
) -> Result<QueryResult> {
    query_on_connection(
        conn,
        DOCTORS_BY_SPECIALITY_AND_SALARY,
        params![speciality.as_str(), salary.0],
    )
}

/// All Doctor columns of the doctors attached to the given hospital.
pub fn doctors_by_hospital(conn: &Connection, id: HospitalId) -> Result<QueryResult> {
    query_on_connection(conn, DOCTORS_BY_HOSPITAL, [id.0])
}

/// Sets the experience of one doctor.
///
/// Returns `None` without writing when the doctor does not exist. The write
/// runs in its own transaction and is committed before the row is re-read.
pub fn update_doctor_experience(
    conn: &Connection,
    id: DoctorId,
    experience: &Experience,
) -> Result<Option<ExperienceUpdate>> {
    let before = find_doctor(conn, id)?;
    if before.is_empty() {
        debug!("doctor {} not found, skipping update", id);
        return Ok(None);
    }

    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(UPDATE_EXPERIENCE, params![experience, id.0])?;
    tx.commit()?;
    info!(doctor = id.0, changed, "updated experience to {}", experience);

    let after = find_doctor(conn, id)?;
    Ok(Some(ExperienceUpdate { before, after }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::HospitalFixture;
    use rusqlite::types::Value;

    #[test]
    fn test_find_existing_and_missing_hospital() {
        let fixture = HospitalFixture::new().unwrap();
        let conn = fixture.connection();

        let found = find_hospital(conn, HospitalId(1)).unwrap();
        assert_eq!(found.row_count, 1);
        assert_eq!(found.column_values("ID"), Some(vec!["1"]));

        let missing = find_hospital(conn, HospitalId(99)).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_find_existing_and_missing_doctor() {
        let fixture = HospitalFixture::new().unwrap();
        let conn = fixture.connection();

        let found = find_doctor(conn, DoctorId(101)).unwrap();
        assert_eq!(found.row_count, 1);
        assert_eq!(found.column_values("Name"), Some(vec!["David"]));

        assert!(find_doctor(conn, DoctorId(-5)).unwrap().is_empty());
    }

    #[test]
    fn test_speciality_match_ignores_case() {
        let fixture = HospitalFixture::new().unwrap();
        let conn = fixture.connection();

        let lower =
            doctors_by_speciality_and_salary(conn, &Speciality::new("garnacologist"), Salary(25000.0))
                .unwrap();
        let mixed =
            doctors_by_speciality_and_salary(conn, &Speciality::new("Garnacologist"), Salary(25000.0))
                .unwrap();

        assert_eq!(lower, mixed);
        assert_eq!(lower.column_values("DocID"), Some(vec!["101", "105"]));
    }

    #[test]
    fn test_salary_match_is_exact() {
        let fixture = HospitalFixture::new().unwrap();
        let conn = fixture.connection();
        let pediatric = Speciality::new("Pediatric");

        let exact = doctors_by_speciality_and_salary(conn, &pediatric, Salary(5000.0)).unwrap();
        assert_eq!(exact.column_values("DocID"), Some(vec!["108"]));

        let near = doctors_by_speciality_and_salary(conn, &pediatric, Salary(5000.5)).unwrap();
        assert!(near.is_empty());
    }

    #[test]
    fn test_doctors_by_hospital_returns_only_doctor_columns() {
        let fixture = HospitalFixture::new().unwrap();
        let conn = fixture.connection();

        let result = doctors_by_hospital(conn, HospitalId(2)).unwrap();
        let doctor_columns = find_doctor(conn, DoctorId(101)).unwrap().columns;
        assert_eq!(result.columns, doctor_columns);
        assert_eq!(result.column_values("DocID"), Some(vec!["103", "104"]));
        assert!(result
            .column_values("HospitalID")
            .unwrap()
            .iter()
            .all(|id| *id == "2"));

        assert!(doctors_by_hospital(conn, HospitalId(42)).unwrap().is_empty());
    }

    #[test]
    fn test_update_experience_existing_doctor() {
        let fixture = HospitalFixture::new().unwrap();
        let conn = fixture.connection();

        let update = update_doctor_experience(conn, DoctorId(101), &Experience::Years(15))
            .unwrap()
            .expect("doctor 101 exists");
        assert_eq!(update.before.column_values("Exp"), Some(vec!["12"]));
        assert_eq!(update.after.column_values("Exp"), Some(vec!["15"]));
        assert_eq!(update.after.column_values("Name"), Some(vec!["David"]));

        let reread = find_doctor(conn, DoctorId(101)).unwrap();
        assert_eq!(reread, update.after);
    }

    #[test]
    fn test_update_experience_missing_doctor_writes_nothing() {
        let fixture = HospitalFixture::new().unwrap();
        let conn = fixture.connection();
        let before = fixture.doctor_snapshot().unwrap();

        let result = update_doctor_experience(conn, DoctorId(999), &Experience::Years(3)).unwrap();
        assert!(result.is_none());
        assert_eq!(fixture.doctor_snapshot().unwrap(), before);
    }

    #[test]
    fn test_update_experience_with_free_text() {
        let fixture = HospitalFixture::new().unwrap();
        let conn = fixture.connection();

        let update = update_doctor_experience(
            conn,
            DoctorId(102),
            &Experience::Text("a decade".to_string()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(update.after.column_values("Exp"), Some(vec!["a decade"]));
    }

    #[test]
    fn test_update_experience_ignores_column_affinity() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE Doctor (DocID INTEGER PRIMARY KEY, Name TEXT, salary TEXT, Exp INTEGER);
            INSERT INTO Doctor VALUES (101, 'David', '25000', 12);
            ",
        )
        .unwrap();

        let update = update_doctor_experience(&conn, DoctorId(101), &Experience::Years(15))
            .unwrap()
            .unwrap();
        assert_eq!(update.before.column_values("salary"), Some(vec!["25000"]));
        let exp: Value = conn
            .query_row("SELECT Exp FROM Doctor WHERE DocID = 101", [], |row| row.get(0))
            .unwrap();
        assert_eq!(exp, Value::Integer(15));
    }

    #[test]
    fn test_update_experience_reports_deleted_row() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE Doctor (DocID INTEGER PRIMARY KEY, Exp INTEGER);
            INSERT INTO Doctor VALUES (101, 12);
            CREATE TRIGGER drop_on_update AFTER UPDATE ON Doctor
            BEGIN DELETE FROM Doctor WHERE DocID = NEW.DocID; END;
            ",
        )
        .unwrap();

        let update = update_doctor_experience(&conn, DoctorId(101), &Experience::Years(15))
            .unwrap()
            .unwrap();
        assert_eq!(update.before.row_count, 1);
        assert!(update.after.is_empty());
    }
}
