//! Typed inputs and records for the Hospital / Doctor schema.
//!
//! Console input is parsed into these types before any statement runs, so a
//! malformed value never reaches SQLite.

use crate::core::{HospitalError, Result};
use rusqlite::types::{ToSql, ToSqlOutput};
use std::fmt;

/// Primary key of a row in `Hospital` (column `ID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HospitalId(pub i64);

impl HospitalId {
    pub fn parse(input: &str) -> Result<Self> {
        input
            .trim()
            .parse()
            .map(HospitalId)
            .map_err(|_| HospitalError::invalid_input("hospital ID", input))
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of a row in `Doctor` (column `DocID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoctorId(pub i64);

impl DoctorId {
    pub fn parse(input: &str) -> Result<Self> {
        input
            .trim()
            .parse()
            .map(DoctorId)
            .map_err(|_| HospitalError::invalid_input("doctor ID", input))
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A specialty, normalized to lowercase for case-insensitive matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speciality(String);

impl Speciality {
    pub fn new(input: &str) -> Self {
        Speciality(input.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Speciality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Salary compared by exact equality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Salary(pub f64);

impl Salary {
    /// Parses a finite floating point salary. `inf` and `NaN` are rejected
    /// since they can never equal a stored value.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Salary(value)),
            _ => Err(HospitalError::invalid_input("salary", input)),
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// New value for the `Exp` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Experience {
    /// Whole number of years, stored as an INTEGER
    Years(u32),
    /// Unvalidated text, stored verbatim
    Text(String),
}

impl Experience {
    /// Parses experience as a whole number of years.
    pub fn parse_strict(input: &str) -> Result<Self> {
        input
            .trim()
            .parse()
            .map(Experience::Years)
            .map_err(|_| HospitalError::invalid_input("experience", input))
    }

    /// Accepts any text; numeric input is still stored as an integer.
    pub fn parse_lenient(input: &str) -> Self {
        Self::parse_strict(input).unwrap_or_else(|_| Experience::Text(input.to_string()))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Experience::Years(_))
    }
}

impl ToSql for Experience {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Experience::Years(years) => years.to_sql(),
            Experience::Text(text) => text.to_sql(),
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Experience::Years(years) => write!(f, "{}", years),
            Experience::Text(text) => f.write_str(text),
        }
    }
}
